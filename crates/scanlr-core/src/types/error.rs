//! Every error kind a `scanlr_core` pipeline stage can produce, plus the
//! batch wrapper the caller sees. Grounded on the teacher's `SherpaError`
//! (`source/lib/sherpa-core/types/error.rs`): a single closed enum, a
//! hand-written `Display` impl, and no unwinding across subsystem
//! boundaries (`spec.md` §7).

use super::Pos;

/// The kind of LR conflict recorded by the action/goto table builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
  ShiftReduce,
  ReduceReduce,
}

impl std::fmt::Display for ConflictKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::ShiftReduce => f.write_str("shift/reduce"),
      Self::ReduceReduce => f.write_str("reduce/reduce"),
    }
  }
}

/// Stores every error kind that can be generated while compiling a
/// specification, mirroring `spec.md` §7.
#[derive(Debug, Clone)]
pub enum Diagnostic {
  /// A regex source string could not be parsed.
  RegexSyntax { pos: Pos, msg: String },
  /// The specification file itself failed to parse.
  SpecSyntax { pos: Pos, msg: String },
  /// A terminal or nonterminal name was referenced but never declared.
  UnknownSymbol { pos: Pos, name: String },
  /// The same (lhs) rule header was declared more than once.
  DuplicateRule { name: String, pos: Pos, first: Pos },
  /// The same (lhs, rhs) pair was declared more than once.
  DuplicateRhs { name: String, pos: Pos, first: Pos },
  /// An RHS's action argument indices skip a value, e.g. `(0) (2)` with no `(1)`.
  NonSequentialArgs { action: String, pos: Pos, indices: Vec<usize> },
  /// A regex was declared in `[lexer]` but no matching name appears in `[token]`.
  UnusedRegex { name: String, pos: Pos },
  /// A name was declared in `[token]` but no matching regex appears in `[lexer]`.
  UndeclaredToken { name: String, pos: Pos },
  /// A terminal is bound to an action argument but its regex rule captures no data.
  MissingAction { name: String, pos: Pos },
  /// An unresolved shift/reduce or reduce/reduce conflict.
  Conflict { kind: ConflictKind, state: usize, terminal: String, left: String, right: String },
  /// A file could not be read or written.
  Io(String),
}

impl std::fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    use Diagnostic::*;
    match self {
      RegexSyntax { pos, msg } => write!(f, "[{pos}] regex syntax error: {msg}"),
      SpecSyntax { pos, msg } => write!(f, "[{pos}] specification syntax error: {msg}"),
      UnknownSymbol { pos, name } => write!(f, "[{pos}] undeclared symbol `{name}`"),
      DuplicateRule { name, pos, first } => {
        write!(f, "[{pos}] rule `{name}` redeclared (first declared at {first})")
      }
      DuplicateRhs { name, pos, first } => {
        write!(f, "[{pos}] duplicate right-hand side for `{name}` (first declared at {first})")
      }
      NonSequentialArgs { action, pos, indices } => {
        write!(f, "[{pos}] action `{action}` argument indices {indices:?} are not contiguous from 0")
      }
      UnusedRegex { name, pos } => {
        write!(f, "[{pos}] regex `{name}` is declared but no token of that name is declared")
      }
      UndeclaredToken { name, pos } => {
        write!(f, "[{pos}] token `{name}` is declared but no regex of that name is declared")
      }
      MissingAction { name, pos } => {
        write!(f, "[{pos}] terminal `{name}` is used as an action argument but its regex rule captures no data")
      }
      Conflict { kind, state, terminal, left, right } => write!(
        f,
        "{kind} conflict in state {state} on `{terminal}`: between {left} and {right}"
      ),
      Io(msg) => write!(f, "io error: {msg}"),
    }
  }
}

impl std::error::Error for Diagnostic {}

impl From<std::io::Error> for Diagnostic {
  fn from(err: std::io::Error) -> Self {
    Diagnostic::Io(err.to_string())
  }
}

/// A non-empty-on-failure batch of [`Diagnostic`]s.
///
/// Semantic validation and LR construction collect every error they find
/// before returning (`spec.md` §7), rather than failing on the first one;
/// this type is the vessel for that batch.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
  pub fn new() -> Self {
    Self(Vec::new())
  }

  pub fn push(&mut self, d: Diagnostic) {
    self.0.push(d);
  }

  pub fn has_errors(&self) -> bool {
    !self.0.is_empty()
  }

  pub fn into_vec(self) -> Vec<Diagnostic> {
    self.0
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
    self.0.iter()
  }

  /// Returns `Err(self)` if any diagnostics were collected, else `Ok(value)`.
  pub fn into_result<T>(self, value: T) -> Result<T, Diagnostics> {
    if self.has_errors() {
      Err(self)
    } else {
      Ok(value)
    }
  }
}

impl From<Diagnostic> for Diagnostics {
  fn from(d: Diagnostic) -> Self {
    Diagnostics(vec![d])
  }
}

impl Extend<Diagnostic> for Diagnostics {
  fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
    self.0.extend(iter);
  }
}

impl IntoIterator for Diagnostics {
  type Item = Diagnostic;
  type IntoIter = std::vec::IntoIter<Diagnostic>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

impl std::fmt::Display for Diagnostics {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (i, d) in self.0.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{d}")?;
    }
    Ok(())
  }
}

impl std::error::Error for Diagnostics {}
