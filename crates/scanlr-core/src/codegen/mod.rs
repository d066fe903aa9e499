//! Component I — the code emitter (`spec.md` §1, §6). Walks the tables a
//! [`crate::pipeline::build`] run produced and prints target-language
//! source; deliberately thin, per `spec.md` §1: "no design content beyond
//! walk the tables and print."

pub mod rust_emit;
pub mod writer;

pub use rust_emit::RustEmitter;

use crate::pipeline::GeneratedArtifact;

/// The three files one emission pass produces: shared header types, the
/// lexer driver, and the LALR(1) parser driver.
pub struct EmittedSources {
  pub header: String,
  pub lexer:  String,
  pub parser: String,
}

pub trait CodeEmitter {
  fn emit(&self, artifact: &GeneratedArtifact) -> EmittedSources;
}
