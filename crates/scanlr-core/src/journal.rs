//! The ambient logging/reporting stack (`spec.md` §5's single-threaded
//! model). Grounded in the teacher's `Journal`/`Report` types, trimmed to
//! drop the `Arc<RwLock<..>>` scratch pad and thread transfer that single-
//! threaded execution makes unnecessary.

use std::time::Duration;

use crate::types::Diagnostic;

/// Records stage timings and any diagnostics emitted along the way.
/// `verbose` gates whether stage completions are also printed to stderr.
#[derive(Debug, Default)]
pub struct Journal {
  pub stages:      Vec<(&'static str, Duration)>,
  pub diagnostics: Vec<Diagnostic>,
  verbose:         bool,
}

impl Journal {
  pub fn new(verbose: bool) -> Self {
    Self { stages: Vec::new(), diagnostics: Vec::new(), verbose }
  }

  /// Runs `f`, timing it under `name`. Mirrors the teacher's
  /// `Journal::debug_print_reports` style of reporting.
  pub fn stage<T>(&mut self, name: &'static str, f: impl FnOnce() -> T) -> T {
    let start = std::time::Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    if self.verbose {
      eprintln!("[scanlr] {name} ({elapsed:?})");
    }
    self.stages.push((name, elapsed));
    result
  }

  pub fn record(&mut self, diagnostic: Diagnostic) {
    self.diagnostics.push(diagnostic);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stage_runs_the_closure_and_records_its_timing() {
    let mut j = Journal::new(false);
    let result = j.stage("noop", || 1 + 1);
    assert_eq!(result, 2);
    assert_eq!(j.stages.len(), 1);
    assert_eq!(j.stages[0].0, "noop");
  }
}
