//! Component C — subset (powerset) construction from NFA to DFA
//! (`spec.md` §4.4).

use std::collections::{BTreeMap, BTreeSet};

use crate::nfa::{AcceptTag, Label, Nfa};

#[derive(Debug, Clone, Default)]
pub struct DfaState {
  /// The NFA states folded into this DFA state; kept for debugging and for
  /// the minimizer's initial partition.
  pub nfa_states:    BTreeSet<usize>,
  pub transitions:   BTreeMap<u8, usize>,
  pub eos_transition: Option<usize>,
  pub accept:        Option<AcceptTag>,
}

#[derive(Debug, Clone, Default)]
pub struct Dfa {
  pub states: Vec<DfaState>,
}

/// Builds a DFA from an NFA pool by the standard worklist powerset
/// construction. Ties between regexes matching the same subset are broken
/// by earliest declaration order (`spec.md` §4.4).
pub fn build_dfa(nfa: &Nfa) -> Dfa {
  let start_set = nfa.epsilon_closure(&BTreeSet::from([0]));
  let mut dfa = Dfa { states: Vec::new() };
  let mut index_of: BTreeMap<BTreeSet<usize>, usize> = BTreeMap::new();

  let start_idx = intern_state(&mut dfa, &mut index_of, nfa, start_set);
  let _ = start_idx; // state 0 is always the DFA start state

  let mut worklist = vec![0usize];
  while let Some(idx) = worklist.pop() {
    let nfa_states = dfa.states[idx].nfa_states.clone();
    for byte in nfa.alphabet() {
      let moved = nfa.mov(&nfa_states, Label::Byte(byte));
      if moved.is_empty() {
        continue;
      }
      let is_new = !index_of.contains_key(&moved);
      let target = intern_state(&mut dfa, &mut index_of, nfa, moved);
      dfa.states[idx].transitions.insert(byte, target);
      if is_new {
        worklist.push(target);
      }
    }
    let eos_moved = nfa.mov(&nfa_states, Label::Eos);
    if !eos_moved.is_empty() {
      let is_new = !index_of.contains_key(&eos_moved);
      let target = intern_state(&mut dfa, &mut index_of, nfa, eos_moved);
      dfa.states[idx].eos_transition = Some(target);
      if is_new {
        worklist.push(target);
      }
    }
  }
  dfa
}

fn intern_state(
  dfa: &mut Dfa,
  index_of: &mut BTreeMap<BTreeSet<usize>, usize>,
  nfa: &Nfa,
  states: BTreeSet<usize>,
) -> usize {
  if let Some(&idx) = index_of.get(&states) {
    return idx;
  }
  let accept = nfa.earliest_accept(states.iter());
  let idx = dfa.states.len();
  dfa.states.push(DfaState { nfa_states: states.clone(), transitions: BTreeMap::new(), eos_transition: None, accept });
  index_of.insert(states, idx);
  idx
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::nfa::AcceptTag;
  use crate::regex;

  fn two_rule_nfa() -> Nfa {
    let mut nfa = Nfa::new();
    let end_if = nfa.build(0, &regex::parse("if").unwrap());
    nfa.set_accept(end_if, AcceptTag { token: "IF".into(), action: None, priority: 0 });
    let end_id = nfa.build(0, &regex::parse("[a-z]+").unwrap());
    nfa.set_accept(end_id, AcceptTag { token: "ID".into(), action: None, priority: 1 });
    nfa
  }

  #[test]
  fn subset_construction_is_deterministic_per_byte() {
    let nfa = two_rule_nfa();
    let dfa = build_dfa(&nfa);
    for state in &dfa.states {
      // BTreeMap<u8, usize> already guarantees at most one target per byte;
      // this asserts we never accidentally insert stale duplicate bytes.
      assert_eq!(state.transitions.len(), state.transitions.keys().collect::<BTreeSet<_>>().len());
    }
  }

  #[test]
  fn longest_shared_prefix_resolves_by_priority_at_the_branch_state() {
    let nfa = two_rule_nfa();
    let dfa = build_dfa(&nfa);
    let mut cur = 0usize;
    for b in b"if" {
      cur = dfa.states[cur].transitions[b];
    }
    // after "if" both IF and ID are live; IF wins as the earlier declaration
    assert_eq!(dfa.states[cur].accept.as_ref().map(|t| t.token.as_str()), Some("IF"));
  }
}
