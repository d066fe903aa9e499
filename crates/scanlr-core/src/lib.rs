//! `scanlr_core` — regex -> NFA -> DFA compilation and LALR(1) table
//! construction for the `scanlr` lexer/parser generator (`spec.md` §1).
//!
//! The crate is organized by pipeline stage, each module named after the
//! component it implements in `spec.md` §3-§4:
//!
//! - [`symbol`] — name <-> id interning (Component A).
//! - [`regex`] / [`nfa`] — regex source to NFA fragments (Components B).
//! - [`dfa`] — subset construction and minimization (Components C, D).
//! - [`grammar`] — the grammar and precedence data model.
//! - [`lr`] — LR(0) kernels, LALR(1) lookahead, action/goto tables (E, F, G).
//! - [`specfile`] — the specification-file loader (Component H).
//! - [`codegen`] — the Rust code emitter (Component I).
//! - [`pipeline`] — ties every stage together behind one [`pipeline::build`] call.
//! - [`journal`], [`config`], [`debug`], [`types`] — the ambient stack.

pub mod codegen;
pub mod config;
pub mod debug;
pub mod dfa;
pub mod grammar;
pub mod journal;
pub mod lr;
pub mod nfa;
pub mod pipeline;
pub mod regex;
pub mod specfile;
pub mod symbol;
pub mod types;

pub use pipeline::{build, GeneratedArtifact};
pub use types::{Diagnostic, Diagnostics, ScanlrResult};
