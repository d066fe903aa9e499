//! Component F — the LALR lookahead engine (`spec.md` §4.7), built on top
//! of FIRST-set computation with nullable tracking.

use std::collections::{BTreeMap, BTreeSet};

use super::item::CoreItem;
use super::kernel::Lr0Automaton;
use crate::grammar::{Grammar, AUGMENTED_START_RULE};
use crate::symbol::{is_nonterminal, is_terminal, SymbolId, DUMMY, EOS};

/// FIRST set and nullability per nonterminal.
#[derive(Debug, Clone, Default)]
pub struct FirstSets {
  pub sets: BTreeMap<SymbolId, (BTreeSet<SymbolId>, bool)>,
}

impl FirstSets {
  pub fn first_of(&self, nonterminal: SymbolId) -> (&BTreeSet<SymbolId>, bool) {
    match self.sets.get(&nonterminal) {
      Some((set, nullable)) => (set, *nullable),
      None => {
        static EMPTY: BTreeSet<SymbolId> = BTreeSet::new();
        (&EMPTY, false)
      }
    }
  }
}

fn seq_first(
  sets: &BTreeMap<SymbolId, (BTreeSet<SymbolId>, bool)>,
  symbols: &[SymbolId],
) -> (BTreeSet<SymbolId>, bool) {
  let mut result = BTreeSet::new();
  for &sym in symbols {
    if is_terminal(sym) {
      result.insert(sym);
      return (result, false);
    }
    let (set, nullable) = sets.get(&sym).cloned().unwrap_or_default();
    result.extend(set);
    if !nullable {
      return (result, false);
    }
  }
  (result, true)
}

/// Worklist fixed point over every production's RHS (`spec.md` §4.7's
/// FIRST-set prerequisite, grounded alongside the closure algorithm).
pub fn compute_first_sets(grammar: &Grammar) -> FirstSets {
  let mut sets: BTreeMap<SymbolId, (BTreeSet<SymbolId>, bool)> = BTreeMap::new();
  for lhs in grammar.by_lhs.keys() {
    sets.entry(*lhs).or_default();
  }
  loop {
    let mut changed = false;
    for rule in &grammar.rules {
      let (seq_set, seq_nullable) = seq_first(&sets, &rule.rhs.symbols);
      let entry = sets.entry(rule.lhs).or_default();
      let before_len = entry.0.len();
      let before_nullable = entry.1;
      entry.0.extend(seq_set);
      entry.1 |= seq_nullable;
      if entry.0.len() != before_len || entry.1 != before_nullable {
        changed = true;
      }
    }
    if !changed {
      break;
    }
  }
  FirstSets { sets }
}

/// FIRST of a bare grammar-symbol sequence (no trailing lookahead symbol).
pub fn first_of_sequence(firsts: &FirstSets, symbols: &[SymbolId]) -> (BTreeSet<SymbolId>, bool) {
  seq_first(&firsts.sets, symbols)
}

/// Full LR(1) closure: seeds map core items to their current lookahead
/// sets; returns the closed-over map, merging lookaheads for items that
/// recur with different lookahead terminals (`spec.md` §4.6's `closure_0`
/// generalized to carry lookaheads, used both directly and as the `#`-seeded
/// probe in `spec.md` §4.7).
pub fn closure_1(
  grammar: &Grammar,
  firsts: &FirstSets,
  seeds: BTreeMap<CoreItem, BTreeSet<SymbolId>>,
) -> BTreeMap<CoreItem, BTreeSet<SymbolId>> {
  let mut items = seeds;
  loop {
    let mut additions: Vec<(CoreItem, SymbolId)> = Vec::new();
    for (&core, la_set) in items.iter() {
      let Some(b) = core.symbol_after_dot(grammar) else { continue };
      if !is_nonterminal(b) {
        continue;
      }
      let beta = &grammar.rule(core.rule_id).rhs.symbols[core.dot + 1..];
      for &la in la_set {
        let (mut beta_first, beta_nullable) = first_of_sequence(firsts, beta);
        if beta_nullable {
          beta_first.insert(la);
        }
        for (rule_id2, _) in grammar.rules_for(b) {
          let new_core = CoreItem::start(rule_id2);
          for &t in &beta_first {
            let already = items.get(&new_core).is_some_and(|s| s.contains(&t));
            if !already {
              additions.push((new_core, t));
            }
          }
        }
      }
    }
    if additions.is_empty() {
      break;
    }
    for (core, t) in additions {
      items.entry(core).or_default().insert(t);
    }
  }
  items
}

/// Per-state, per-kernel-item lookahead sets, computed by the spontaneous
/// / propagated algorithm of `spec.md` §4.7 (Dragon Book Algorithm 4.63).
pub fn compute_lalr_lookaheads(
  grammar: &Grammar,
  automaton: &Lr0Automaton,
  firsts: &FirstSets,
) -> BTreeMap<(usize, CoreItem), BTreeSet<SymbolId>> {
  let mut lookaheads: BTreeMap<(usize, CoreItem), BTreeSet<SymbolId>> = BTreeMap::new();
  lookaheads.entry((0, CoreItem::start(AUGMENTED_START_RULE))).or_default().insert(EOS);

  let mut propagates: Vec<((usize, CoreItem), (usize, CoreItem))> = Vec::new();

  for (state_idx, state) in automaton.states.iter().enumerate() {
    for &core in &state.kernel {
      let seed: BTreeMap<CoreItem, BTreeSet<SymbolId>> = BTreeMap::from([(core, BTreeSet::from([DUMMY]))]);
      let closure = closure_1(grammar, firsts, seed);
      for (&item_core, item_la) in &closure {
        let Some(x) = item_core.symbol_after_dot(grammar) else { continue };
        let Some(&to_state) = state.goto.get(&x) else { continue };
        let advanced = item_core.advanced();
        let to_key = (to_state, advanced);
        for &la in item_la {
          if la == DUMMY {
            propagates.push(((state_idx, core), to_key));
          } else {
            lookaheads.entry(to_key).or_default().insert(la);
          }
        }
      }
    }
  }

  let mut changed = true;
  while changed {
    changed = false;
    for (from, to) in &propagates {
      let Some(from_set) = lookaheads.get(from).cloned() else { continue };
      let entry = lookaheads.entry(*to).or_default();
      let before = entry.len();
      entry.extend(from_set);
      if entry.len() != before {
        changed = true;
      }
    }
  }
  lookaheads
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar::{Grammar, Rhs, Rule};
  use crate::lr::kernel::build_lr0;
  use crate::symbol::SymbolTable;

  // E -> E plus E | NUM
  fn expr_grammar() -> (Grammar, SymbolTable) {
    let mut st = SymbolTable::new();
    let e = st.intern_nonterminal("E");
    let plus = st.intern_terminal("plus");
    let num = st.intern_terminal("NUM");
    let s_prime = st.intern_nonterminal("$start");
    let mut g = Grammar::new(e, s_prime);
    g.push_rule(Rule { lhs: e, rhs: Rhs { symbols: vec![e, plus, e], action: None, tag: None, arg_to_element: vec![] } });
    g.push_rule(Rule { lhs: e, rhs: Rhs { symbols: vec![num], action: None, tag: None, arg_to_element: vec![] } });
    (g, st)
  }

  #[test]
  fn first_set_of_a_left_recursive_nonterminal_includes_its_own_terminal_start() {
    let (g, _) = expr_grammar();
    let firsts = compute_first_sets(&g);
    let (set, nullable) = firsts.first_of(g.start);
    assert!(!nullable);
    assert!(set.contains(&2)); // NUM is the only terminal E can start with
  }

  #[test]
  fn augmented_start_item_seeds_eos_as_a_lookahead() {
    let (g, _) = expr_grammar();
    let automaton = build_lr0(&g);
    let firsts = compute_first_sets(&g);
    let las = compute_lalr_lookaheads(&g, &automaton, &firsts);
    let start_item = (0, CoreItem::start(AUGMENTED_START_RULE));
    assert!(las[&start_item].contains(&EOS));
  }

  #[test]
  fn reduce_item_for_num_gets_plus_and_eos_as_lookaheads() {
    let (g, _) = expr_grammar();
    let automaton = build_lr0(&g);
    let firsts = compute_first_sets(&g);
    let las = compute_lalr_lookaheads(&g, &automaton, &firsts);
    // Find the state reached after shifting NUM from the start state.
    let num_id = 2;
    let shift_state = automaton.states[0].goto[&num_id];
    let rule_for_num = g.rules_for(g.start).find(|(_, r)| r.rhs.symbols == vec![num_id]).unwrap().0;
    let reduce_item = (shift_state, CoreItem { rule_id: rule_for_num, dot: 1 });
    let set = &las[&reduce_item];
    assert!(set.contains(&EOS));
  }
}
