//! Cross-cutting types shared by every stage of the pipeline: source
//! positions, the closed diagnostic enum, and the `ScanlrResult` alias.

mod error;
mod pos;

pub use error::{ConflictKind, Diagnostic, Diagnostics};
pub use pos::Pos;

/// The result type returned by every fallible stage of the pipeline.
///
/// Matches `spec.md` §7's propagation policy: a single `Diagnostic` aborts
/// the stage that produced it (regex/spec syntax errors), while a batch of
/// them is returned together by stages that collect errors before failing
/// (semantic validation, LR table assembly).
pub type ScanlrResult<T> = Result<T, Diagnostics>;
