//! Build configuration (`spec.md` §6, SPEC_FULL.md §3.3). Grounded on the
//! teacher's `ParserConfig`: a small builder-style struct, no config-file
//! parsing, since every knob here is a CLI flag.

#[derive(Debug, Clone, Default)]
pub struct Config {
  /// Mirrors the CLI's `--disassemble`: emit a text dump of the DFA and
  /// parse tables instead of (or alongside) generated source.
  pub emit_disassembly: bool,
  /// Gates `Journal`'s stage-timing `eprintln!`s.
  pub verbose: bool,
}

impl Config {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_disassembly(mut self, emit_disassembly: bool) -> Self {
    self.emit_disassembly = emit_disassembly;
    self
  }

  pub fn with_verbose(mut self, verbose: bool) -> Self {
    self.verbose = verbose;
    self
  }
}
