//! Component D — DFA minimization by partition refinement
//! (`spec.md` §4.5: "table-filling with inequality marking, iterated to a
//! worklist fixed point").

use std::collections::BTreeMap;

use super::subset::{Dfa, DfaState};

/// Refines the trivial two-way partition (accepting vs. non-accepting,
/// further split by token identity) until no class can be split further,
/// then folds every class down to one representative state.
pub fn minimize(dfa: &Dfa) -> Dfa {
  let mut class_of = initial_partition(dfa);
  loop {
    let (next_class_of, num_classes) = refine(dfa, &class_of);
    if num_classes == count_classes(&class_of) {
      class_of = next_class_of;
      break;
    }
    class_of = next_class_of;
  }
  fold(dfa, &class_of)
}

fn count_classes(class_of: &[usize]) -> usize {
  class_of.iter().copied().collect::<std::collections::BTreeSet<_>>().len()
}

/// Groups states by accepted token identity; all non-accepting states start
/// in one class, since they are indistinguishable until a refinement pass
/// proves otherwise.
fn initial_partition(dfa: &Dfa) -> Vec<usize> {
  let mut signature_to_class: BTreeMap<Option<String>, usize> = BTreeMap::new();
  let mut class_of = Vec::with_capacity(dfa.states.len());
  let mut next_class = 0usize;
  for state in &dfa.states {
    let sig = state.accept.as_ref().map(|t| t.token.clone());
    let class = *signature_to_class.entry(sig).or_insert_with(|| {
      let c = next_class;
      next_class += 1;
      c
    });
    class_of.push(class);
  }
  class_of
}

/// One refinement pass: split every class by the tuple of destination
/// classes each of its members transitions to, across the shared alphabet
/// plus the eos pseudo-symbol.
fn refine(dfa: &Dfa, class_of: &[usize]) -> (Vec<usize>, usize) {
  type Signature = (usize, Vec<(u8, usize)>, Option<usize>);

  let mut signature_to_class: BTreeMap<Signature, usize> = BTreeMap::new();
  let mut next_class = 0usize;
  let mut next_class_of = Vec::with_capacity(dfa.states.len());

  for (idx, state) in dfa.states.iter().enumerate() {
    let transitions: Vec<(u8, usize)> =
      state.transitions.iter().map(|(&b, &to)| (b, class_of[to])).collect();
    let eos = state.eos_transition.map(|to| class_of[to]);
    let sig: Signature = (class_of[idx], transitions, eos);
    let class = *signature_to_class.entry(sig).or_insert_with(|| {
      let c = next_class;
      next_class += 1;
      c
    });
    next_class_of.push(class);
  }
  (next_class_of, next_class)
}

fn fold(dfa: &Dfa, class_of: &[usize]) -> Dfa {
  let num_classes = count_classes(class_of);
  let mut representative = vec![usize::MAX; num_classes];
  for (idx, &class) in class_of.iter().enumerate() {
    representative[class] = representative[class].min(idx);
  }

  let start_class = class_of[0];
  let mut remap: BTreeMap<usize, usize> = BTreeMap::new();
  remap.insert(start_class, 0);
  let mut order = vec![start_class];
  for class in 0..num_classes {
    if class != start_class {
      let next_idx = remap.len();
      remap.insert(class, next_idx);
      order.push(class);
    }
  }

  let mut states = Vec::with_capacity(num_classes);
  for &class in &order {
    let rep = &dfa.states[representative[class]];
    let transitions = rep.transitions.iter().map(|(&b, &to)| (b, remap[&class_of[to]])).collect();
    let eos_transition = rep.eos_transition.map(|to| remap[&class_of[to]]);
    states.push(DfaState {
      nfa_states: rep.nfa_states.clone(),
      transitions,
      eos_transition,
      accept: rep.accept.clone(),
    });
  }
  Dfa { states }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dfa::subset::build_dfa;
  use crate::nfa::{AcceptTag, Nfa};
  use crate::regex;

  #[test]
  fn merges_equivalent_accepting_states() {
    // "a|b" produces two distinct accepting NFA paths that collapse to one
    // DFA state under subset construction already; minimization must not
    // grow the state count, and the result must still accept both letters.
    let mut nfa = Nfa::new();
    let end = nfa.build(0, &regex::parse("a|b").unwrap());
    nfa.set_accept(end, AcceptTag { token: "AB".into(), action: None, priority: 0 });
    let dfa = build_dfa(&nfa);
    let min = minimize(&dfa);
    assert!(min.states.len() <= dfa.states.len());
    assert!(min.states[0].transitions.contains_key(&b'a'));
    assert!(min.states[0].transitions.contains_key(&b'b'));
  }

  #[test]
  fn distinguishes_states_with_different_accepted_tokens() {
    let mut nfa = Nfa::new();
    let end_a = nfa.build(0, &regex::parse("aa").unwrap());
    nfa.set_accept(end_a, AcceptTag { token: "AA".into(), action: None, priority: 0 });
    let end_b = nfa.build(0, &regex::parse("bb").unwrap());
    nfa.set_accept(end_b, AcceptTag { token: "BB".into(), action: None, priority: 1 });
    let dfa = build_dfa(&nfa);
    let min = minimize(&dfa);

    let after_aa = min.states[min.states[0].transitions[&b'a']].transitions[&b'a'];
    let after_bb = min.states[min.states[0].transitions[&b'b']].transitions[&b'b'];
    assert_ne!(min.states[after_aa].accept.as_ref().unwrap().token, min.states[after_bb].accept.as_ref().unwrap().token);
  }
}
