//! Component E — LR(0) kernel construction (`spec.md` §4.6).

use std::collections::{BTreeMap, BTreeSet};

use super::item::CoreItem;
use crate::grammar::{Grammar, AUGMENTED_START_RULE};
use crate::symbol::{is_nonterminal, SymbolId};

#[derive(Debug, Clone, Default)]
pub struct State {
  pub kernel: BTreeSet<CoreItem>,
  pub goto:   BTreeMap<SymbolId, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Lr0Automaton {
  pub states: Vec<State>,
}

/// Adds, for every item `A -> α·Bβ` with `B` a nonterminal, every
/// kernel-less item `B -> ·γ`, to a worklist-based fixed point
/// (`spec.md` §4.6).
pub fn closure_0(grammar: &Grammar, items: &BTreeSet<CoreItem>) -> BTreeSet<CoreItem> {
  let mut closure = items.clone();
  let mut worklist: Vec<CoreItem> = items.iter().copied().collect();
  while let Some(item) = worklist.pop() {
    if let Some(b) = item.symbol_after_dot(grammar) {
      if is_nonterminal(b) {
        for (rule_id, _) in grammar.rules_for(b) {
          let start = CoreItem::start(rule_id);
          if closure.insert(start) {
            worklist.push(start);
          }
        }
      }
    }
  }
  closure
}

/// Advances the dot past every `X`-item in `closure` and discards every
/// other item (`spec.md` §4.6).
pub fn goto_0(grammar: &Grammar, closure: &BTreeSet<CoreItem>, x: SymbolId) -> BTreeSet<CoreItem> {
  closure
    .iter()
    .filter(|item| item.symbol_after_dot(grammar) == Some(x))
    .map(|item| item.advanced())
    .collect()
}

/// Discards non-kernel items (dot=0), keeping the augmented start item
/// (`spec.md` §4.6).
pub fn kernel_filter(items: &BTreeSet<CoreItem>) -> BTreeSet<CoreItem> {
  items.iter().copied().filter(|item| item.is_kernel(AUGMENTED_START_RULE)).collect()
}

/// Builds the full LR(0) state space by BFS over goto edges, starting
/// from the augmented start item with `{eos}` seeded separately by the
/// LALR lookahead pass (`spec.md` §4.6, §4.7).
pub fn build_lr0(grammar: &Grammar) -> Lr0Automaton {
  let start_kernel: BTreeSet<CoreItem> = BTreeSet::from([CoreItem::start(AUGMENTED_START_RULE)]);
  let mut automaton = Lr0Automaton { states: vec![State { kernel: start_kernel.clone(), goto: BTreeMap::new() }] };
  let mut index_of: BTreeMap<BTreeSet<CoreItem>, usize> = BTreeMap::from([(start_kernel, 0)]);

  let mut worklist = vec![0usize];
  while let Some(state_idx) = worklist.pop() {
    let closure = closure_0(grammar, &automaton.states[state_idx].kernel);
    let mut symbols: BTreeSet<SymbolId> = BTreeSet::new();
    for item in &closure {
      if let Some(x) = item.symbol_after_dot(grammar) {
        symbols.insert(x);
      }
    }
    for x in symbols {
      let target_kernel = goto_0(grammar, &closure, x);
      if target_kernel.is_empty() {
        continue;
      }
      let target_idx = if let Some(&idx) = index_of.get(&target_kernel) {
        idx
      } else {
        let idx = automaton.states.len();
        automaton.states.push(State { kernel: target_kernel.clone(), goto: BTreeMap::new() });
        index_of.insert(target_kernel, idx);
        worklist.push(idx);
        idx
      };
      automaton.states[state_idx].goto.insert(x, target_idx);
    }
  }
  automaton
}
