//! Text disassembly of the compiled tables, for the CLI's `--disassemble`
//! flag. Grounded on the teacher's `generate_disassembly`
//! (`source/lib/hctk-compile/builder/disassembly.rs`): a flat, grep-able
//! text dump of the compiled structures, not meant for reparsing.

use crate::pipeline::GeneratedArtifact;
use crate::symbol::is_nonterminal;

pub fn dump_dfa(artifact: &GeneratedArtifact) -> String {
  let mut out = String::new();
  for (idx, state) in artifact.lexer_dfa.states.iter().enumerate() {
    out.push_str(&format!("state {idx}:\n"));
    for (&byte, &target) in &state.transitions {
      out.push_str(&format!("  {byte:>3} (0x{byte:02x}) -> {target}\n"));
    }
    if let Some(target) = state.eos_transition {
      out.push_str(&format!("  $eos -> {target}\n"));
    }
    if let Some(tag) = &state.accept {
      match &tag.action {
        Some(action) => out.push_str(&format!("  accept: {} [{action}] (priority {})\n", tag.token, tag.priority)),
        None => out.push_str(&format!("  accept: {} (priority {})\n", tag.token, tag.priority)),
      }
    }
  }
  out
}

pub fn dump_tables(artifact: &GeneratedArtifact) -> String {
  let mut out = String::new();
  let symbols = &artifact.symbols;
  for (idx, row) in artifact.parsing_tables.action.iter().enumerate() {
    out.push_str(&format!("state {idx}:\n"));
    for (&terminal, action) in row {
      out.push_str(&format!("  on {:<12} {}\n", symbols.display_name(terminal), describe_action(artifact, *action)));
    }
    for (&nt, &target) in &artifact.parsing_tables.goto[idx] {
      if is_nonterminal(nt) {
        out.push_str(&format!("  goto {:<10} -> {target}\n", symbols.display_name(nt)));
      }
    }
  }
  out
}

fn describe_action(artifact: &GeneratedArtifact, action: crate::lr::Action) -> String {
  use crate::lr::Action;
  match action {
    Action::Shift(s) => format!("shift {s}"),
    Action::Reduce(r) => {
      let rule = artifact.grammar.rule(r);
      format!("reduce {r} ({} : {} symbols)", artifact.symbols.display_name(rule.lhs), rule.rhs.symbols.len())
    }
    Action::Accept => "accept".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Config;
  use crate::pipeline::build;

  const SPEC: &str = r#"
    [lexer] main { INT = "[0-9]+"; }
    [token] main { INT; }
    [parser] main { S : [] INT ; }
  "#;

  #[test]
  fn dumps_mention_every_dfa_state() {
    let artifact = build(SPEC, &Config::new()).unwrap();
    let dump = dump_dfa(&artifact);
    for idx in 0..artifact.lexer_dfa.states.len() {
      assert!(dump.contains(&format!("state {idx}:")));
    }
  }

  #[test]
  fn table_dump_shows_the_accept_action() {
    let artifact = build(SPEC, &Config::new()).unwrap();
    let dump = dump_tables(&artifact);
    assert!(dump.contains("accept"));
  }
}
