//! Components B/C — the NFA state pool and the regex-AST-to-NFA translator
//! (`spec.md` §3, §4.3).

use std::collections::BTreeSet;

use crate::regex::{ClassItem, RepeatBound, Regex};

/// An NFA edge label: a concrete byte, the synthetic end-of-stream marker,
/// or epsilon. The zero byte is reserved for epsilon and never appears as
/// `Label::Byte(0)` (`spec.md` §3: "A class never matches the zero byte").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
  Byte(u8),
  Eos,
  Epsilon,
}

/// What an NFA/DFA accepting state produces: the declared token name, the
/// optional semantic-action name, and the declaration order used to break
/// ties between regexes that match the same text (`spec.md` §4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptTag {
  pub token:    String,
  pub action:   Option<String>,
  pub priority: usize,
}

#[derive(Debug, Clone, Default)]
pub struct NfaState {
  pub edges:  Vec<(Label, usize)>,
  pub accept: Option<AcceptTag>,
}

/// An ordered pool of NFA states. State 0 is the global entry point; every
/// regex rule is translated starting from state 0, so the pool naturally
/// represents the alternation of every rule in the lexer block.
#[derive(Debug, Clone, Default)]
pub struct Nfa {
  pub states: Vec<NfaState>,
}

impl Nfa {
  pub fn new() -> Self {
    let mut nfa = Self { states: Vec::new() };
    nfa.new_state(); // state 0, the global entry
    nfa
  }

  pub fn new_state(&mut self) -> usize {
    self.states.push(NfaState::default());
    self.states.len() - 1
  }

  pub fn add_edge(&mut self, from: usize, label: Label, to: usize) {
    self.states[from].edges.push((label, to));
  }

  pub fn set_accept(&mut self, state: usize, tag: AcceptTag) {
    self.states[state].accept = Some(tag);
  }

  /// Every concrete byte that appears as an edge label anywhere in the pool.
  pub fn alphabet(&self) -> BTreeSet<u8> {
    self
      .states
      .iter()
      .flat_map(|s| s.edges.iter())
      .filter_map(|(l, _)| match l {
        Label::Byte(b) => Some(*b),
        _ => None,
      })
      .collect()
  }

  pub fn epsilon_closure(&self, states: &BTreeSet<usize>) -> BTreeSet<usize> {
    let mut closure = states.clone();
    let mut worklist: Vec<usize> = states.iter().copied().collect();
    while let Some(s) = worklist.pop() {
      for &(label, to) in &self.states[s].edges {
        if label == Label::Epsilon && closure.insert(to) {
          worklist.push(to);
        }
      }
    }
    closure
  }

  pub fn mov(&self, states: &BTreeSet<usize>, label: Label) -> BTreeSet<usize> {
    let mut reached = BTreeSet::new();
    for &s in states {
      for &(l, to) in &self.states[s].edges {
        if l == label {
          reached.insert(to);
        }
      }
    }
    self.epsilon_closure(&reached)
  }

  /// The accept tag of lowest `priority` (earliest-declared regex) among a
  /// set of NFA states (`spec.md` §4.4).
  pub fn earliest_accept<'a>(&self, states: impl IntoIterator<Item = &'a usize>) -> Option<AcceptTag> {
    states.into_iter().filter_map(|&s| self.states[s].accept.clone()).min_by_key(|t| t.priority)
  }

  /// Naive NFA simulation used by tests to check the minimizer's
  /// language-preservation invariant (`spec.md` §8). Not part of the
  /// generated lexer; the generated lexer runs the minimized DFA instead.
  pub fn accepts(&self, input: &[u8], at_eos: bool) -> Option<AcceptTag> {
    let mut current = self.epsilon_closure(&BTreeSet::from([0]));
    for &b in input {
      current = self.mov(&current, Label::Byte(b));
      if current.is_empty() {
        return None;
      }
    }
    if at_eos {
      let eos_reached = self.mov(&current, Label::Eos);
      if let Some(tag) = self.earliest_accept(eos_reached.iter()) {
        return Some(tag);
      }
    }
    self.earliest_accept(current.iter())
  }

  /// Translates a regex AST into NFA states and edges reachable from
  /// `start`, returning the accepting state for the translation
  /// (`spec.md` §4.3's translation-rule table).
  pub fn build(&mut self, start: usize, re: &Regex) -> usize {
    match re {
      Regex::Char(c) => {
        let t = self.new_state();
        self.add_edge(start, Label::Byte(*c), t);
        t
      }
      Regex::AnyByte => {
        let t = self.new_state();
        for c in 1u16..=255 {
          self.add_edge(start, Label::Byte(c as u8), t);
        }
        t
      }
      Regex::Range(lo, hi) => {
        let t = self.new_state();
        for c in *lo..=*hi {
          if c != 0 {
            self.add_edge(start, Label::Byte(c), t);
          }
        }
        t
      }
      Regex::CharClass { items, negated } => {
        let t = self.new_state();
        let mut included = [false; 256];
        for item in items {
          match *item {
            ClassItem::Byte(b) => included[b as usize] = true,
            ClassItem::Range(lo, hi) => {
              for c in lo..=hi {
                included[c as usize] = true;
              }
            }
          }
        }
        for c in 1usize..=255 {
          if included[c] != *negated {
            self.add_edge(start, Label::Byte(c as u8), t);
          }
        }
        t
      }
      Regex::Concat(l, r) => {
        let m = self.build(start, l);
        self.build(m, r)
      }
      Regex::Alt(l, r) => {
        let ml = self.build(start, l);
        let mr = self.build(start, r);
        let t = self.new_state();
        self.add_edge(ml, Label::Epsilon, t);
        self.add_edge(mr, Label::Epsilon, t);
        t
      }
      Regex::Star(x) => {
        let mx = self.build(start, x);
        self.add_edge(mx, Label::Epsilon, start);
        self.add_edge(start, Label::Epsilon, mx);
        mx
      }
      Regex::Plus(x) => {
        let q = self.build(start, x);
        let r = self.build(q, x);
        self.add_edge(q, Label::Epsilon, r);
        self.add_edge(r, Label::Epsilon, q);
        r
      }
      Regex::Optional(x) => {
        let t = self.new_state();
        let mx = self.build(start, x);
        self.add_edge(mx, Label::Epsilon, t);
        self.add_edge(start, Label::Epsilon, t);
        t
      }
      Regex::Repeat { inner, n, m } => self.build_repeat(start, inner, *n, *m),
      Regex::EndOfStream => {
        let t = self.new_state();
        self.add_edge(start, Label::Eos, t);
        t
      }
      Regex::AfterNewline(x) => {
        let t = self.new_state();
        self.add_edge(start, Label::Byte(b'\n'), t);
        self.build(t, x)
      }
      Regex::Group(x) => self.build(start, x),
      Regex::StringLiteral(bytes) => {
        let mut cur = start;
        for &b in bytes {
          let t = self.new_state();
          self.add_edge(cur, Label::Byte(b), t);
          cur = t;
        }
        cur
      }
    }
  }

  fn build_repeat(&mut self, start: usize, inner: &Regex, n: u32, m: RepeatBound) -> usize {
    let mut cur = start;
    for _ in 0..n {
      cur = self.build(cur, inner);
    }
    match m {
      RepeatBound::Bounded(mm) => {
        let t = self.new_state();
        self.add_edge(cur, Label::Epsilon, t);
        for _ in 0..mm.saturating_sub(n) {
          cur = self.build(cur, inner);
          self.add_edge(cur, Label::Epsilon, t);
        }
        t
      }
      RepeatBound::Unbounded => {
        // n mandatory copies, then one more copy with a back-epsilon to
        // allow the unbounded suffix (`spec.md` §4.3).
        let q = cur;
        let r = self.build(q, inner);
        self.add_edge(r, Label::Epsilon, q);
        self.add_edge(q, Label::Epsilon, r);
        r
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::regex;

  fn build_one(pattern: &str, token: &str) -> Nfa {
    let ast = regex::parse(pattern).unwrap();
    let mut nfa = Nfa::new();
    let end = nfa.build(0, &ast);
    nfa.set_accept(end, AcceptTag { token: token.to_string(), action: None, priority: 0 });
    nfa
  }

  #[test]
  fn matches_a_literal() {
    let nfa = build_one("abc", "ABC");
    assert_eq!(nfa.accepts(b"abc", false).map(|t| t.token), Some("ABC".to_string()));
    assert!(nfa.accepts(b"abd", false).is_none());
  }

  #[test]
  fn star_matches_zero_or_more() {
    let nfa = build_one("a*", "AS");
    assert!(nfa.accepts(b"", false).is_some());
    assert!(nfa.accepts(b"aaaa", false).is_some());
  }

  #[test]
  fn plus_requires_at_least_one() {
    let nfa = build_one("a+", "AP");
    assert!(nfa.accepts(b"", false).is_none());
    assert!(nfa.accepts(b"aaa", false).is_some());
  }

  #[test]
  fn bounded_repeat_respects_the_range() {
    let nfa = build_one("a{2,3}", "AR");
    assert!(nfa.accepts(b"a", false).is_none());
    assert!(nfa.accepts(b"aa", false).is_some());
    assert!(nfa.accepts(b"aaa", false).is_some());
    assert!(nfa.accepts(b"aaaa", false).is_none());
  }

  #[test]
  fn end_of_stream_marker_only_matches_at_eos() {
    let nfa = build_one("a$", "AE");
    assert!(nfa.accepts(b"a", false).is_none());
    assert!(nfa.accepts(b"a", true).is_some());
  }

  #[test]
  fn regex_priority_earliest_declaration_wins() {
    let ast_if = regex::parse("if").unwrap();
    let ast_id = regex::parse("[a-z]+").unwrap();
    let mut nfa = Nfa::new();
    let end_if = nfa.build(0, &ast_if);
    nfa.set_accept(end_if, AcceptTag { token: "IF".into(), action: None, priority: 0 });
    let end_id = nfa.build(0, &ast_id);
    nfa.set_accept(end_id, AcceptTag { token: "ID".into(), action: None, priority: 1 });

    assert_eq!(nfa.accepts(b"if", true).map(|t| t.token), Some("IF".to_string()));
    assert_eq!(nfa.accepts(b"ifx", true).map(|t| t.token), Some("ID".to_string()));
  }
}
