//! Grammar data model (`spec.md` §3 "Grammar", "Precedence table").

use std::collections::BTreeMap;

use crate::symbol::{is_terminal, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
  None,
  Left,
  Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precedence {
  pub priority: u32,
  pub assoc:    Assoc,
}

/// Maps terminal id to declared precedence. Priority rises from the first
/// declared `<dir>{...}` block to the last; the final block is highest
/// priority (`spec.md` §3).
#[derive(Debug, Clone, Default)]
pub struct PrecedenceTable {
  entries:      BTreeMap<SymbolId, Precedence>,
  next_priority: u32,
}

impl PrecedenceTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers one `<dir>{a,b;}` block; every terminal in the block gets
  /// the same priority, one higher than every block declared before it.
  pub fn declare_block(&mut self, assoc: Assoc, terminals: &[SymbolId]) {
    let priority = self.next_priority;
    self.next_priority += 1;
    for &t in terminals {
      self.entries.insert(t, Precedence { priority, assoc });
    }
  }

  pub fn get(&self, id: SymbolId) -> Option<Precedence> {
    self.entries.get(&id).copied()
  }
}

/// One alternative on the right-hand side of a rule.
#[derive(Debug, Clone, Default)]
pub struct Rhs {
  pub symbols:         Vec<SymbolId>,
  pub action:          Option<String>,
  /// An explicit terminal whose precedence resolves shift/reduce conflicts
  /// for this RHS, overriding the "highest-priority terminal in the RHS"
  /// default (`spec.md` §4.8).
  pub tag:             Option<SymbolId>,
  /// Action parameter index -> RHS symbol position, so actions receive
  /// reduced children in a user-chosen order (`spec.md` §3).
  pub arg_to_element:  Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Rule {
  pub lhs: SymbolId,
  pub rhs: Rhs,
}

/// Rule 0 is always the augmented start rule `S' -> S`, `spec.md` §4.6.
pub const AUGMENTED_START_RULE: usize = 0;

#[derive(Debug, Clone)]
pub struct Grammar {
  /// Indexed by rule id; rule 0 is the augmented start rule.
  pub rules:          Vec<Rule>,
  pub by_lhs:          BTreeMap<SymbolId, Vec<usize>>,
  pub start:           SymbolId,
  pub augmented_start: SymbolId,
  pub precedence:      PrecedenceTable,
}

impl Grammar {
  /// `augmented_start` must already be a freshly-interned nonterminal id
  /// distinct from every user-declared nonterminal.
  pub fn new(start: SymbolId, augmented_start: SymbolId) -> Self {
    let mut g = Self {
      rules:          Vec::new(),
      by_lhs:          BTreeMap::new(),
      start,
      augmented_start,
      precedence:      PrecedenceTable::new(),
    };
    let augmented_rhs =
      Rhs { symbols: vec![start], action: None, tag: None, arg_to_element: vec![0] };
    g.push_rule(Rule { lhs: augmented_start, rhs: augmented_rhs });
    g
  }

  /// Appends a rule and returns its rule id. Does not check for
  /// duplicate (lhs, rhs) pairs; that cross-validation belongs to the
  /// spec-file loader (`spec.md` §4.9).
  pub fn push_rule(&mut self, rule: Rule) -> usize {
    let id = self.rules.len();
    self.by_lhs.entry(rule.lhs).or_default().push(id);
    self.rules.push(rule);
    id
  }

  /// Every existing rule id for `lhs` whose RHS symbol sequence equals
  /// `symbols`, used by the spec-file loader to detect `DuplicateRhs`.
  pub fn find_duplicate(&self, lhs: SymbolId, symbols: &[SymbolId]) -> Option<usize> {
    self.by_lhs.get(&lhs)?.iter().copied().find(|&id| self.rules[id].rhs.symbols == symbols)
  }

  pub fn rules_for(&self, lhs: SymbolId) -> impl Iterator<Item = (usize, &Rule)> {
    self.by_lhs.get(&lhs).into_iter().flatten().map(move |&id| (id, &self.rules[id]))
  }

  pub fn rule(&self, id: usize) -> &Rule {
    &self.rules[id]
  }

  /// The precedence used to resolve a shift/reduce conflict against this
  /// rule's reduction: the RHS's explicit tag if present, otherwise the
  /// highest-priority terminal appearing anywhere in the RHS
  /// (`spec.md` §4.8).
  pub fn effective_precedence(&self, rule_id: usize) -> Option<Precedence> {
    let rule = &self.rules[rule_id];
    if let Some(tag) = rule.rhs.tag {
      return self.precedence.get(tag);
    }
    rule
      .rhs
      .symbols
      .iter()
      .copied()
      .filter(|&s| is_terminal(s))
      .filter_map(|s| self.precedence.get(s))
      .max_by_key(|p| p.priority)
  }
}
