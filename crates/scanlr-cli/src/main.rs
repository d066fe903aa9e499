//! The `scanlr` command line driver (`spec.md` §6). Grounded on the
//! teacher's `src/app/cli/main.rs`: one subcommand per mode, diagnostics
//! printed with `eprintln!`, exit code 1 on any reported error. Uses
//! clap's derive API rather than the teacher's builder calls, matching the
//! `derive` feature already pinned in `Cargo.toml`.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use scanlr_core::codegen::{CodeEmitter, RustEmitter};
use scanlr_core::config::Config;
use scanlr_core::debug::{dump_dfa, dump_tables};
use scanlr_core::pipeline::build;

#[derive(Parser)]
#[command(name = "scanlr", version, about = "Lexer and LALR(1) parser table generator")]
struct Cli {
  #[command(subcommand)]
  command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
  /// Compiles a specification file into a generated Rust lexer and parser.
  Gen {
    spec_path: PathBuf,
    out_dir:   Option<PathBuf>,
    /// Also write a text disassembly of the DFA and parse tables alongside
    /// the generated source.
    #[arg(long)]
    disassemble: bool,
    #[arg(long)]
    verbose: bool,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  match cli.command {
    Cmd::Gen { spec_path, out_dir, disassemble, verbose } => run_gen(&spec_path, out_dir, disassemble, verbose),
  }
}

fn run_gen(spec_path: &PathBuf, out_dir: Option<PathBuf>, disassemble: bool, verbose: bool) -> ExitCode {
  let spec_text = match fs::read_to_string(spec_path) {
    Ok(text) => text,
    Err(err) => {
      eprintln!("error: could not read `{}`: {err}", spec_path.display());
      return ExitCode::FAILURE;
    }
  };

  let config = Config::new().with_disassembly(disassemble).with_verbose(verbose);
  let artifact = match build(&spec_text, &config) {
    Ok(artifact) => artifact,
    Err(diagnostics) => {
      for diagnostic in diagnostics.iter() {
        eprintln!("error: {diagnostic}");
      }
      return ExitCode::FAILURE;
    }
  };

  let out_dir = out_dir.unwrap_or_else(|| PathBuf::from("."));
  if let Err(err) = fs::create_dir_all(&out_dir) {
    eprintln!("error: could not create `{}`: {err}", out_dir.display());
    return ExitCode::FAILURE;
  }

  let sources = RustEmitter::new().emit(&artifact);
  // Filenames derive from the namespaces declared in the spec (`spec.md`
  // §6), not from a fixed literal per file kind.
  let header_name = format!("{}_header.rs", artifact.token_ns);
  let lexer_name = format!("{}_lexer.rs", artifact.lexer_ns);
  let parser_name = format!("{}_parser.rs", artifact.parser_ns);
  let files = [(header_name, &sources.header), (lexer_name, &sources.lexer), (parser_name, &sources.parser)];
  for (name, contents) in files {
    if let Err(err) = fs::write(out_dir.join(&name), contents) {
      eprintln!("error: could not write `{name}`: {err}");
      return ExitCode::FAILURE;
    }
  }

  if config.emit_disassembly {
    let dasm = format!("{}\n{}", dump_dfa(&artifact), dump_tables(&artifact));
    if let Err(err) = fs::write(out_dir.join("disassembly.txt"), dasm) {
      eprintln!("error: could not write `disassembly.txt`: {err}");
      return ExitCode::FAILURE;
    }
  }

  ExitCode::SUCCESS
}
