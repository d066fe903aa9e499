//! End-to-end scenarios straight out of `spec.md` §8: literal specs in,
//! either a generated artifact or a diagnostic out.

use scanlr_core::config::Config;
use scanlr_core::dfa::Dfa;
use scanlr_core::pipeline::build;
use scanlr_core::types::Diagnostic;

/// Walks a DFA by maximal munch, mirroring what the emitted lexer driver
/// does (`crate::codegen::rust_emit::emit_lexer`). `$skip` matches are
/// consumed and dropped rather than returned as tokens.
fn tokenize(dfa: &Dfa, input: &[u8]) -> Result<Vec<(String, usize, usize)>, usize> {
  let mut out = Vec::new();
  let mut pos = 0usize;
  while pos < input.len() {
    let mut state = 0usize;
    let mut cursor = pos;
    let mut last_accept: Option<(usize, String)> = None;
    loop {
      if let Some(tag) = &dfa.states[state].accept {
        last_accept = Some((cursor, tag.token.clone()));
      }
      let Some(&byte) = input.get(cursor) else { break };
      match dfa.states[state].transitions.get(&byte) {
        Some(&next) => {
          state = next;
          cursor += 1;
        }
        None => break,
      }
    }
    match last_accept {
      Some((end, token)) if end > pos && token == "$skip" => pos = end,
      Some((end, token)) if end > pos => {
        out.push((token, pos, end));
        pos = end;
      }
      _ => return Err(pos),
    }
  }
  Ok(out)
}

#[test]
fn scenario_1_integer_and_identifier_lexer_drops_whitespace() {
  let spec = r#"
    [lexer] main {
      [skip] WS = "[ ]+";
      INT = "[0-9]+";
      ID = "[a-zA-Z_][a-zA-Z0-9_]*";
    }
    [token] main { INT; ID; }
    [parser] main { S : [] INT | [] ID ; }
  "#;
  let artifact = build(spec, &Config::new()).unwrap();
  let tokens = tokenize(&artifact.lexer_dfa, b"42 abc").unwrap();
  assert_eq!(tokens.iter().map(|(t, ..)| t.as_str()).collect::<Vec<_>>(), vec!["INT", "ID"]);
  assert_eq!(&b"42 abc"[tokens[0].1..tokens[0].2], b"42");
  assert_eq!(&b"42 abc"[tokens[1].1..tokens[1].2], b"abc");
}

#[test]
fn scenario_2_longest_match_prefers_the_matching_keyword_but_falls_back_to_the_longer_identifier() {
  let spec = r#"
    [lexer] main {
      IF = "if";
      ID = "[a-z]+";
    }
    [token] main { IF; ID; }
    [parser] main { S : [] IF | [] ID ; }
  "#;
  let artifact = build(spec, &Config::new()).unwrap();

  let tokens = tokenize(&artifact.lexer_dfa, b"if").unwrap();
  assert_eq!(tokens, vec![("IF".to_string(), 0, 2)]);

  let tokens = tokenize(&artifact.lexer_dfa, b"ifx").unwrap();
  assert_eq!(tokens, vec![("ID".to_string(), 0, 3)]);
}

#[test]
fn scenario_3_left_associative_precedence_resolves_the_expression_grammar_cleanly() {
  let spec = r#"
    [lexer] main { NUM = "[0-9]+"; PLUS = "\+"; STAR = "\*"; }
    [token] main {
      NUM; PLUS; STAR;
      <left>{ PLUS; }
      <left>{ STAR; }
    }
    [parser] main {
      E : [add] E PLUS E | [mul] E STAR E | [lit] NUM ;
    }
  "#;
  let artifact = build(spec, &Config::new()).unwrap();
  assert!(artifact.parsing_tables.conflicts.is_empty());
}

#[test]
fn scenario_4_right_associative_assignment_has_no_conflicts() {
  let spec = r#"
    [lexer] main { ID = "[a-z]+"; EQ = "="; }
    [token] main {
      ID; EQ;
      <right>{ EQ; }
    }
    [parser] main {
      E : [assign] ID EQ E | [var] ID ;
    }
  "#;
  let artifact = build(spec, &Config::new()).unwrap();
  assert!(artifact.parsing_tables.conflicts.is_empty());
}

#[test]
fn scenario_5_a_reduce_reduce_conflict_names_both_rules_and_emits_no_tables() {
  let spec = r#"
    [lexer] main { X = "x"; }
    [token] main { X; }
    [parser] main {
      S : [] A | [] B ;
      A : [] X ;
      B : [] X ;
    }
  "#;
  let diagnostics = build(spec, &Config::new()).unwrap_err();
  let conflict = diagnostics.iter().find(|d| matches!(d, Diagnostic::Conflict { .. })).expect("a conflict diagnostic");
  match conflict {
    Diagnostic::Conflict { left, right, .. } => {
      assert!(left.contains('A') || right.contains('A'));
      assert!(left.contains('B') || right.contains('B'));
    }
    _ => unreachable!(),
  }
}

#[test]
fn scenario_6_negated_newline_class_stops_at_the_newline() {
  let spec = r#"
    [lexer] main { LINE = "[^\n]+"; }
    [token] main { LINE; }
    [parser] main { S : [] LINE ; }
  "#;
  let artifact = build(spec, &Config::new()).unwrap();
  let tokens = tokenize(&artifact.lexer_dfa, b"ab").unwrap();
  assert_eq!(tokens[0], ("LINE".to_string(), 0, 2));
  // the newline itself matches no regex, so scanning from it is a lexical error.
  let err_pos = tokenize(&artifact.lexer_dfa, b"\ncd").unwrap_err();
  assert_eq!(err_pos, 0);
  // and the full "ab\ncd" input fails once the scan reaches the newline.
  assert_eq!(tokenize(&artifact.lexer_dfa, b"ab\ncd").unwrap_err(), 2);
}
