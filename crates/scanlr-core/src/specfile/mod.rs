//! Component H — the specification-file loader (`spec.md` §4.9, §6).

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod validate;

pub use ast::SpecFile;
pub use validate::ValidatedSpec;

use crate::types::Diagnostics;

/// Lexes, parses, and cross-validates a specification file in one call.
/// A malformed token stream or grammar sketch violation aborts immediately
/// with a single [`Diagnostic`] (`spec.md` §7); cross-validation failures
/// are collected into a [`Diagnostics`] batch.
pub fn load(spec_text: &str) -> Result<ValidatedSpec, Diagnostics> {
  let tokens = lexer::lex(spec_text).map_err(Diagnostics::from)?;
  let spec_file = parser::parse(&tokens).map_err(Diagnostics::from)?;
  validate::validate(&spec_file)
}
