//! Component G — action/goto table assembly with precedence-driven
//! conflict resolution (`spec.md` §4.8).

use std::collections::BTreeMap;

use super::item::CoreItem;
use super::kernel::Lr0Automaton;
use super::lookahead::{closure_1, FirstSets};
use crate::grammar::{Assoc, Grammar, AUGMENTED_START_RULE};
use crate::symbol::{is_nonterminal, is_terminal, SymbolId, EOS};
use crate::types::ConflictKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Shift(usize),
  Reduce(usize),
  Accept,
}

#[derive(Debug, Clone)]
pub struct Conflict {
  pub state:    usize,
  pub terminal: SymbolId,
  pub kind:     ConflictKind,
  pub left:     Action,
  pub right:    Action,
}

#[derive(Debug, Clone, Default)]
pub struct ParseTable {
  pub action:    Vec<BTreeMap<SymbolId, Action>>,
  pub goto:      Vec<BTreeMap<SymbolId, usize>>,
  pub conflicts: Vec<Conflict>,
}

/// Assembles the action/goto table for every LR(1) state: kernel +
/// closure, one action per `(state, lookahead-terminal)` pair
/// (`spec.md` §4.8).
pub fn build_table(
  grammar: &Grammar,
  automaton: &Lr0Automaton,
  firsts: &FirstSets,
  lookaheads: &BTreeMap<(usize, CoreItem), std::collections::BTreeSet<SymbolId>>,
) -> ParseTable {
  let n = automaton.states.len();
  let mut table = ParseTable { action: vec![BTreeMap::new(); n], goto: vec![BTreeMap::new(); n], conflicts: Vec::new() };

  for (idx, state) in automaton.states.iter().enumerate() {
    for (&sym, &target) in &state.goto {
      if is_nonterminal(sym) {
        table.goto[idx].insert(sym, target);
      }
    }

    let seeds: BTreeMap<CoreItem, std::collections::BTreeSet<SymbolId>> = state
      .kernel
      .iter()
      .map(|&core| (core, lookaheads.get(&(idx, core)).cloned().unwrap_or_default()))
      .collect();
    let items = closure_1(grammar, firsts, seeds);

    for (&core, la_set) in &items {
      if core.is_complete(grammar) {
        if core.rule_id == AUGMENTED_START_RULE {
          insert_action(&mut table, idx, EOS, Action::Accept, grammar);
        } else {
          for &la in la_set {
            insert_action(&mut table, idx, la, Action::Reduce(core.rule_id), grammar);
          }
        }
      } else if let Some(x) = core.symbol_after_dot(grammar) {
        if is_terminal(x) {
          if let Some(&target) = state.goto.get(&x) {
            insert_action(&mut table, idx, x, Action::Shift(target), grammar);
          }
        }
      }
    }
  }
  table
}

fn insert_action(table: &mut ParseTable, state: usize, terminal: SymbolId, new_action: Action, grammar: &Grammar) {
  let existing = table.action[state].get(&terminal).copied();
  match existing {
    None => {
      table.action[state].insert(terminal, new_action);
    }
    Some(existing) if existing == new_action => {}
    Some(existing) => {
      let resolved = resolve(grammar, terminal, existing, new_action);
      match resolved {
        Some(action) => {
          table.action[state].insert(terminal, action);
        }
        None => {
          let kind =
            if matches!((existing, new_action), (Action::Reduce(_), Action::Reduce(_))) {
              ConflictKind::ReduceReduce
            } else {
              ConflictKind::ShiftReduce
            };
          table.conflicts.push(Conflict { state, terminal, kind, left: existing, right: new_action });
        }
      }
    }
  }
}

/// `None` means the conflict could not be resolved and must be recorded.
fn resolve(grammar: &Grammar, terminal: SymbolId, a: Action, b: Action) -> Option<Action> {
  match (a, b) {
    (Action::Shift(target), Action::Reduce(rule)) | (Action::Reduce(rule), Action::Shift(target)) => {
      let shift_prec = grammar.precedence.get(terminal);
      let reduce_prec = grammar.effective_precedence(rule);
      match (shift_prec, reduce_prec) {
        (Some(sp), Some(rp)) if sp.priority > rp.priority => Some(Action::Shift(target)),
        (Some(sp), Some(rp)) if sp.priority < rp.priority => Some(Action::Reduce(rule)),
        (Some(sp), Some(rp)) if sp.priority == rp.priority => match rp.assoc {
          Assoc::Left => Some(Action::Reduce(rule)),
          Assoc::Right => Some(Action::Shift(target)),
          Assoc::None => None,
        },
        _ => None,
      }
    }
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar::{Grammar, Rhs, Rule};
  use crate::lr::kernel::build_lr0;
  use crate::lr::lookahead::{compute_first_sets, compute_lalr_lookaheads};
  use crate::symbol::SymbolTable;

  fn build_full(grammar: &Grammar) -> ParseTable {
    let automaton = build_lr0(grammar);
    let firsts = compute_first_sets(grammar);
    let lookaheads = compute_lalr_lookaheads(grammar, &automaton, &firsts);
    build_table(grammar, &automaton, &firsts, &lookaheads)
  }

  #[test]
  fn precedence_resolves_the_expression_grammar_without_conflicts() {
    let mut st = SymbolTable::new();
    let e = st.intern_nonterminal("E");
    let plus = st.intern_terminal("plus");
    let star = st.intern_terminal("star");
    let num = st.intern_terminal("NUM");
    let s_prime = st.intern_nonterminal("$start");
    let mut g = Grammar::new(e, s_prime);
    g.precedence.declare_block(Assoc::Left, &[plus]);
    g.precedence.declare_block(Assoc::Left, &[star]); // declared second: binds tighter
    g.push_rule(Rule { lhs: e, rhs: Rhs { symbols: vec![e, plus, e], action: None, tag: None, arg_to_element: vec![] } });
    g.push_rule(Rule { lhs: e, rhs: Rhs { symbols: vec![e, star, e], action: None, tag: None, arg_to_element: vec![] } });
    g.push_rule(Rule { lhs: e, rhs: Rhs { symbols: vec![num], action: None, tag: None, arg_to_element: vec![] } });

    let table = build_full(&g);
    assert!(table.conflicts.is_empty());
  }

  #[test]
  fn right_associative_assignment_shifts_on_tie() {
    let mut st = SymbolTable::new();
    let e = st.intern_nonterminal("E");
    let id = st.intern_terminal("ID");
    let eq = st.intern_terminal("eq");
    let s_prime = st.intern_nonterminal("$start");
    let mut g = Grammar::new(e, s_prime);
    g.precedence.declare_block(Assoc::Right, &[eq]);
    g.push_rule(Rule { lhs: e, rhs: Rhs { symbols: vec![id, eq, e], action: None, tag: None, arg_to_element: vec![] } });
    g.push_rule(Rule { lhs: e, rhs: Rhs { symbols: vec![id], action: None, tag: None, arg_to_element: vec![] } });

    let table = build_full(&g);
    assert!(table.conflicts.is_empty());
  }

  #[test]
  fn unreachable_ambiguity_without_declared_precedence_is_a_conflict() {
    // S : A | B ; A : x ; B : x ; — classic reduce/reduce.
    let mut st = SymbolTable::new();
    let s = st.intern_nonterminal("S");
    let a = st.intern_nonterminal("A");
    let b = st.intern_nonterminal("B");
    let x = st.intern_terminal("x");
    let s_prime = st.intern_nonterminal("$start");
    let mut g = Grammar::new(s, s_prime);
    g.push_rule(Rule { lhs: s, rhs: Rhs { symbols: vec![a], action: None, tag: None, arg_to_element: vec![] } });
    g.push_rule(Rule { lhs: s, rhs: Rhs { symbols: vec![b], action: None, tag: None, arg_to_element: vec![] } });
    g.push_rule(Rule { lhs: a, rhs: Rhs { symbols: vec![x], action: None, tag: None, arg_to_element: vec![] } });
    g.push_rule(Rule { lhs: b, rhs: Rhs { symbols: vec![x], action: None, tag: None, arg_to_element: vec![] } });

    let table = build_full(&g);
    assert!(!table.conflicts.is_empty());
    assert!(table.conflicts.iter().any(|c| c.kind == ConflictKind::ReduceReduce));
  }
}
