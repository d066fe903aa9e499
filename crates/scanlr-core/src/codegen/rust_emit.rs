//! The Rust code emitter (`spec.md` §1: "the code emitter is pure table
//! walking, no design content beyond printing"). Three files come out of
//! one [`GeneratedArtifact`]: shared header types, the lexer driver, and
//! the LALR(1) parser driver. Grounded on the teacher's
//! `radlr-rust-build::compile_rust_bytecode_parser`: one function per
//! output file, built up with `writer.stmt(...)`/`.line(...)` calls over
//! the compiled tables, no AST-level templating.

use super::writer::CodeWriter;
use super::{CodeEmitter, EmittedSources};
use crate::lr::Action;
use crate::pipeline::GeneratedArtifact;
use crate::types::Pos;

#[derive(Debug, Default)]
pub struct RustEmitter;

impl RustEmitter {
  pub fn new() -> Self {
    Self
  }
}

impl CodeEmitter for RustEmitter {
  fn emit(&self, artifact: &GeneratedArtifact) -> EmittedSources {
    EmittedSources {
      header: emit_header(artifact),
      lexer:  emit_lexer(artifact),
      parser: emit_parser(artifact),
    }
  }
}

/// Turns a declared symbol name into a valid upper-camel Rust identifier.
/// Non-alphanumeric characters (spec-file names are otherwise free-form)
/// are dropped; an empty or digit-leading result is prefixed with `Sym`.
fn ident(name: &str) -> String {
  let cleaned: String = name.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_').collect();
  if cleaned.is_empty() || cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
    format!("Sym{cleaned}")
  } else {
    cleaned
  }
}

/// Every token name the lexer can actually produce, i.e. every non-`$skip`
/// accept tag reachable in the minimized DFA, in sorted order so emission
/// is deterministic run to run.
fn declared_tokens(artifact: &GeneratedArtifact) -> Vec<String> {
  let mut names: Vec<String> = artifact
    .lexer_dfa
    .states
    .iter()
    .filter_map(|s| s.accept.as_ref())
    .map(|tag| tag.token.clone())
    .filter(|t| t != "$skip")
    .collect();
  names.sort();
  names.dedup();
  names
}

fn terminal_id(artifact: &GeneratedArtifact, name: &str) -> i32 {
  artifact.symbols.lookup(name, Pos::zero()).expect("declared token name is interned during spec validation")
}

fn emit_header(artifact: &GeneratedArtifact) -> String {
  let mut w = CodeWriter::new();
  let tokens = declared_tokens(artifact);

  w.line("// Generated by scanlr. Do not edit by hand.").blank();
  w.line("#[derive(Debug, Clone, Copy, PartialEq, Eq)]");
  w.line("pub enum TokenKind {");
  w.indent();
  for name in &tokens {
    w.line(format!("{},", ident(name)));
  }
  w.dedent();
  w.line("}").blank();

  w.line("impl TokenKind {");
  w.indent();
  w.line("pub fn terminal_id(self) -> i32 {");
  w.indent();
  w.line("match self {");
  w.indent();
  for name in &tokens {
    w.line(format!("TokenKind::{} => {},", ident(name), terminal_id(artifact, name)));
  }
  w.dedent();
  w.line("}");
  w.dedent();
  w.line("}");
  w.dedent();
  w.line("}").blank();

  w.line("#[derive(Debug, Clone, Copy, PartialEq, Eq)]");
  w.line("pub enum Action {");
  w.indent();
  w.line("Shift(usize),");
  w.line("Reduce(usize),");
  w.line("Accept,");
  w.dedent();
  w.line("}").blank();

  w.line("pub struct RuleMeta {");
  w.indent();
  w.line("pub lhs: i32,");
  w.line("pub len: usize,");
  w.line("pub action: Option<&'static str>,");
  w.line("pub arg_to_element: &'static [usize],");
  w.dedent();
  w.line("}");
  w.into_string()
}

fn emit_lexer(artifact: &GeneratedArtifact) -> String {
  let mut w = CodeWriter::new();
  let dfa = &artifact.lexer_dfa;

  w.line(format!("// Lexer for namespace `{}`. Generated by scanlr.", artifact.lexer_ns)).blank();
  w.line("use super::TokenKind;").blank();

  w.line("fn dfa_transition(state: usize, byte: u8) -> Option<usize> {");
  w.indent();
  w.line("match state {");
  w.indent();
  for (idx, s) in dfa.states.iter().enumerate() {
    if s.transitions.is_empty() {
      continue;
    }
    w.line(format!("{idx} => match byte {{"));
    w.indent();
    for (&byte, &target) in &s.transitions {
      w.line(format!("{byte} => Some({target}),"));
    }
    w.line("_ => None,");
    w.dedent();
    w.line("},");
  }
  w.line("_ => None,");
  w.dedent();
  w.line("}");
  w.dedent();
  w.line("}").blank();

  w.line("fn dfa_eos_transition(state: usize) -> Option<usize> {");
  w.indent();
  w.line("match state {");
  w.indent();
  for (idx, s) in dfa.states.iter().enumerate() {
    if let Some(target) = s.eos_transition {
      w.line(format!("{idx} => Some({target}),"));
    }
  }
  w.line("_ => None,");
  w.dedent();
  w.line("}");
  w.dedent();
  w.line("}").blank();

  // Longest-match wins on conflict; ties are already resolved by
  // declaration-order priority during DFA construction, so each state
  // carries at most one accept tag (`spec.md` §4.4).
  w.line("fn dfa_accept(state: usize) -> Option<(bool, Option<TokenKind>, Option<&'static str>)> {");
  w.indent();
  w.line("match state {");
  w.indent();
  for (idx, s) in dfa.states.iter().enumerate() {
    if let Some(tag) = &s.accept {
      if tag.token == "$skip" {
        w.line(format!("{idx} => Some((true, None, None)),"));
      } else {
        let action = match &tag.action {
          Some(a) => format!("Some({a:?})"),
          None => "None".to_string(),
        };
        w.line(format!("{idx} => Some((false, Some(TokenKind::{}), {action})),", ident(&tag.token)));
      }
    }
  }
  w.line("_ => None,");
  w.dedent();
  w.line("}");
  w.dedent();
  w.line("}").blank();

  w.line("/// Maximal-munch scan: advances the DFA one byte at a time, remembering");
  w.line("/// the last state that carried an accept tag, and resets to state 0 once");
  w.line("/// no further transition exists.");
  w.line("pub fn tokenize(input: &[u8]) -> Result<Vec<(TokenKind, usize, usize)>, usize> {");
  w.indent();
  w.line("let mut out = Vec::new();");
  w.line("let mut pos = 0usize;");
  w.line("while pos < input.len() {");
  w.indent();
  w.line("let mut state = 0usize;");
  w.line("let mut cursor = pos;");
  w.line("let mut last_accept: Option<(usize, bool, Option<TokenKind>, Option<&'static str>)> = None;");
  w.line("loop {");
  w.indent();
  w.line("if let Some(tag) = dfa_accept(state) { last_accept = Some((cursor, tag.0, tag.1, tag.2)); }");
  w.line("let Some(&byte) = input.get(cursor) else {");
  w.indent();
  w.line("if let Some(target) = dfa_eos_transition(state) {");
  w.indent();
  w.line("if let Some(tag) = dfa_accept(target) { last_accept = Some((cursor, tag.0, tag.1, tag.2)); }");
  w.dedent();
  w.line("}");
  w.line("break;");
  w.dedent();
  w.line("};");
  w.line("match dfa_transition(state, byte) {");
  w.indent();
  w.line("Some(next) => { state = next; cursor += 1; }");
  w.line("None => break,");
  w.dedent();
  w.line("}");
  w.dedent();
  w.line("}");
  w.line("match last_accept {");
  w.indent();
  w.line("Some((end, true, _, _)) if end > pos => { pos = end; }");
  w.line("Some((end, false, Some(kind), _)) if end > pos => { out.push((kind, pos, end)); pos = end; }");
  w.line("_ => return Err(pos),");
  w.dedent();
  w.line("}");
  w.dedent();
  w.line("}");
  w.line("Ok(out)");
  w.dedent();
  w.line("}");
  w.into_string()
}

fn emit_parser(artifact: &GeneratedArtifact) -> String {
  let mut w = CodeWriter::new();
  w.line(format!("// Parser for namespace `{}`. Generated by scanlr.", artifact.parser_ns)).blank();
  w.line("use super::{Action, RuleMeta};").blank();

  let table = &artifact.parsing_tables;
  w.line(format!("pub static ACTION: [&[(i32, Action)]; {}] = [", table.action.len()));
  w.indent();
  for row in &table.action {
    let entries: Vec<String> = row.iter().map(|(&t, &a)| format!("({t}, {})", action_literal(a))).collect();
    w.line(format!("&[{}],", entries.join(", ")));
  }
  w.dedent();
  w.line("];").blank();

  w.line(format!("pub static GOTO: [&[(i32, usize)]; {}] = [", table.goto.len()));
  w.indent();
  for row in &table.goto {
    let entries: Vec<String> = row.iter().map(|(&nt, &target)| format!("({nt}, {target})")).collect();
    w.line(format!("&[{}],", entries.join(", ")));
  }
  w.dedent();
  w.line("];").blank();

  w.line(format!("pub static RULES: [RuleMeta; {}] = [", artifact.grammar.rules.len()));
  w.indent();
  for rule in &artifact.grammar.rules {
    let action = match &rule.rhs.action {
      Some(a) => format!("Some({a:?})"),
      None => "None".to_string(),
    };
    let args: Vec<String> = rule.rhs.arg_to_element.iter().map(|i| i.to_string()).collect();
    w.line(format!(
      "RuleMeta {{ lhs: {}, len: {}, action: {}, arg_to_element: &[{}] }},",
      rule.lhs,
      rule.rhs.symbols.len(),
      action,
      args.join(", ")
    ));
  }
  w.dedent();
  w.line("];");
  w.into_string()
}

fn action_literal(action: Action) -> String {
  match action {
    Action::Shift(s) => format!("Action::Shift({s})"),
    Action::Reduce(r) => format!("Action::Reduce({r})"),
    Action::Accept => "Action::Accept".to_string(),
  }
}
