//! Component H — the parsed shape of a specification file, before
//! cross-validation (`spec.md` §6's grammar sketch).

use crate::types::Pos;

#[derive(Debug, Clone)]
pub struct RegexRule {
  /// The bracketed tag before the name, e.g. `[skip] WS = "...";`. `skip`
  /// marks a regex whose matches are lexed and discarded, never promoted
  /// to a token (`spec.md` §8 scenario 1: "whitespace dropped").
  pub class:   Option<String>,
  pub name:    String,
  pub pattern: String,
  pub pos:     Pos,
}

#[derive(Debug, Clone)]
pub struct PrecBlockDecl {
  pub assoc:   String,
  pub idents:  Vec<(String, Pos)>,
  pub pos:     Pos,
}

#[derive(Debug, Clone)]
pub struct RhsSymbol {
  pub name:      String,
  pub arg_index: Option<usize>,
  pub pos:       Pos,
}

#[derive(Debug, Clone)]
pub struct RhsDecl {
  pub action:  Option<String>,
  pub tag:     Option<(String, Pos)>,
  pub symbols: Vec<RhsSymbol>,
  pub pos:     Pos,
}

#[derive(Debug, Clone)]
pub struct RuleDecl {
  pub lhs:     String,
  pub lhs_pos: Pos,
  pub rhs:     Vec<RhsDecl>,
}

#[derive(Debug, Clone)]
pub struct SpecFile {
  pub lexer_ns:    String,
  pub regex_rules: Vec<RegexRule>,
  pub token_ns:    String,
  /// Names promoted from `regex_rules` into actual parser terminals
  /// (`spec.md` §4.9's `tok_stmt`; a regex not listed here, and not
  /// tagged `skip`, triggers `UnusedRegex`).
  pub tok_decls:   Vec<(String, Pos)>,
  pub prec_blocks: Vec<PrecBlockDecl>,
  pub parser_ns:   String,
  pub rules:       Vec<RuleDecl>,
}

impl RegexRule {
  /// `[skip]` is the one reserved bracket tag: the regex is lexed and its
  /// match discarded, never promoted to a token.
  pub fn is_skip(&self) -> bool {
    self.class.as_deref() == Some("skip")
  }

  /// Any other bracket tag names the lexer-side capture action attached to
  /// this regex's accept tag (`spec.md` §3's NFA "(token name,
  /// semantic-action name)"), used by validation's `MissingAction` check.
  pub fn action(&self) -> Option<&str> {
    self.class.as_deref().filter(|c| *c != "skip")
  }
}
