//! Component H — cross-validation of a parsed spec file (`spec.md` §4.9).
//!
//! Every check below collects into one `Diagnostics` batch rather than
//! aborting on the first failure, per `spec.md` §7: "semantic validation
//! collects every diagnostic in a batch and surfaces the full list."

use std::collections::HashMap;

use super::ast::{RegexRule, SpecFile};
use crate::grammar::{Assoc, Grammar, Rhs, Rule};
use crate::symbol::{is_terminal, SymbolId, SymbolTable};
use crate::types::{Diagnostic, Diagnostics, Pos};

pub struct ValidatedSpec {
  pub symbols:     SymbolTable,
  pub grammar:     Grammar,
  pub regex_rules: Vec<RegexRule>,
  /// The namespace identifiers declared after `[lexer]`/`[token]`/`[parser]`,
  /// carried through so the code emitter can derive filenames from them
  /// (`spec.md` §6: "Filenames derive from the namespaces declared in the
  /// spec").
  pub lexer_ns:  String,
  pub token_ns:  String,
  pub parser_ns: String,
}

pub fn validate(spec: &SpecFile) -> Result<ValidatedSpec, Diagnostics> {
  let mut diags = Diagnostics::new();
  let mut symbols = SymbolTable::new();

  for rule in &spec.rules {
    symbols.intern_nonterminal(&rule.lhs);
  }
  for (name, _) in &spec.tok_decls {
    symbols.intern_terminal(name);
  }

  let regex_by_name: HashMap<&str, &RegexRule> = spec.regex_rules.iter().map(|r| (r.name.as_str(), r)).collect();

  for r in &spec.regex_rules {
    let promoted = spec.tok_decls.iter().any(|(n, _)| n == &r.name);
    if !r.is_skip() && !promoted {
      diags.push(Diagnostic::UnusedRegex { name: r.name.clone(), pos: r.pos });
    }
  }

  // Every declared token must have a matching lexer regex (`spec.md` §4.9's
  // first cross-validation bullet). Interning above makes `symbols.lookup`
  // succeed for a bogus token name, so this is the only place that catches it.
  for (name, pos) in &spec.tok_decls {
    if !regex_by_name.contains_key(name.as_str()) {
      diags.push(Diagnostic::UndeclaredToken { name: name.clone(), pos: *pos });
    }
  }

  let mut precedence = crate::grammar::PrecedenceTable::new();
  for block in &spec.prec_blocks {
    let assoc = match block.assoc.as_str() {
      "left" => Assoc::Left,
      "right" => Assoc::Right,
      "none" | "nonassoc" => Assoc::None,
      other => {
        diags.push(Diagnostic::SpecSyntax { pos: block.pos, msg: format!("unknown associativity `{other}`") });
        Assoc::None
      }
    };
    let mut ids = Vec::new();
    for (name, pos) in &block.idents {
      match symbols.lookup(name, *pos) {
        Ok(id) => ids.push(id),
        Err(e) => diags.push(e),
      }
    }
    precedence.declare_block(assoc, &ids);
  }

  let mut seen_lhs: HashMap<&str, Pos> = HashMap::new();
  for rule in &spec.rules {
    if let Some(&first) = seen_lhs.get(rule.lhs.as_str()) {
      diags.push(Diagnostic::DuplicateRule { name: rule.lhs.clone(), pos: rule.lhs_pos, first });
    } else {
      seen_lhs.insert(&rule.lhs, rule.lhs_pos);
    }
  }

  let Some(first_rule) = spec.rules.first() else {
    diags.push(Diagnostic::SpecSyntax { pos: Pos::zero(), msg: "parser block declares no rules".to_string() });
    return Err(diags);
  };
  let start: SymbolId = symbols.lookup(&first_rule.lhs, first_rule.lhs_pos).expect("lhs interned above");
  let augmented_start = symbols.intern_nonterminal("$start");
  let mut grammar = Grammar::new(start, augmented_start);
  grammar.precedence = precedence;

  for rule in &spec.rules {
    let lhs = symbols.lookup(&rule.lhs, rule.lhs_pos).expect("lhs interned above");
    for rhs in &rule.rhs {
      let mut symbol_ids = Vec::new();
      let mut arg_positions: Vec<(usize, usize)> = Vec::new();

      for (rhs_pos, sym) in rhs.symbols.iter().enumerate() {
        let id = match symbols.lookup(&sym.name, sym.pos) {
          Ok(id) => id,
          Err(e) => {
            diags.push(e);
            continue;
          }
        };
        symbol_ids.push(id);

        if let Some(arg_idx) = sym.arg_index {
          arg_positions.push((arg_idx, rhs_pos));
          // A terminal captured as an action argument must itself have a
          // lexer-side capture action on its regex rule (`spec.md` §4.9,
          // §7 `MissingAction`); the RHS's own reduce-action name is a
          // separate concern already checked elsewhere.
          if is_terminal(id) {
            if let Some(regex_rule) = regex_by_name.get(sym.name.as_str()) {
              if regex_rule.action().is_none() {
                diags.push(Diagnostic::MissingAction { name: sym.name.clone(), pos: sym.pos });
              }
            }
          }
        }
      }

      arg_positions.sort_by_key(|(idx, _)| *idx);
      let indices: Vec<usize> = arg_positions.iter().map(|(i, _)| *i).collect();
      let contiguous = indices.iter().enumerate().all(|(i, &v)| i == v);
      if !contiguous {
        diags.push(Diagnostic::NonSequentialArgs {
          action:  rhs.action.clone().unwrap_or_default(),
          pos:     rhs.pos,
          indices: indices.clone(),
        });
      }
      let arg_to_element: Vec<usize> = arg_positions.into_iter().map(|(_, pos)| pos).collect();

      let tag = match &rhs.tag {
        Some((name, pos)) => match symbols.lookup(name, *pos) {
          Ok(id) => Some(id),
          Err(e) => {
            diags.push(e);
            None
          }
        },
        None => None,
      };

      if let Some(_first_rhs_id) = grammar.find_duplicate(lhs, &symbol_ids) {
        diags.push(Diagnostic::DuplicateRhs { name: rule.lhs.clone(), pos: rhs.pos, first: rule.lhs_pos });
      } else {
        grammar.push_rule(Rule { lhs, rhs: Rhs { symbols: symbol_ids, action: rhs.action.clone(), tag, arg_to_element } });
      }
    }
  }

  diags.into_result(ValidatedSpec {
    symbols,
    grammar,
    regex_rules: spec.regex_rules.clone(),
    lexer_ns: spec.lexer_ns.clone(),
    token_ns: spec.token_ns.clone(),
    parser_ns: spec.parser_ns.clone(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::specfile::{lexer, parser};

  fn validate_src(src: &str) -> Result<ValidatedSpec, Diagnostics> {
    let toks = lexer::lex(src).unwrap();
    let spec = parser::parse(&toks).unwrap();
    validate(&spec)
  }

  #[test]
  fn flags_an_unused_regex() {
    let err = validate_src(
      r#"
      [lexer] main { INT = "[0-9]+"; ID = "[a-z]+"; }
      [token] main { INT; }
      [parser] main { S : [] INT ; }
      "#,
    )
    .unwrap_err();
    assert!(err.iter().any(|d| matches!(d, Diagnostic::UnusedRegex { name, .. } if name == "ID")));
  }

  #[test]
  fn flags_a_token_with_no_matching_regex() {
    let err = validate_src(
      r#"
      [lexer] main { INT = "[0-9]+"; }
      [token] main { INT; ID; }
      [parser] main { S : [] INT | [] ID ; }
      "#,
    )
    .unwrap_err();
    assert!(err.iter().any(|d| matches!(d, Diagnostic::UndeclaredToken { name, .. } if name == "ID")));
  }

  #[test]
  fn flags_non_sequential_action_args() {
    let err = validate_src(
      r#"
      [lexer] main { A = "a"; B = "b"; }
      [token] main { A; B; }
      [parser] main { S : [pair] A(0) B(2) ; }
      "#,
    )
    .unwrap_err();
    assert!(err.iter().any(|d| matches!(d, Diagnostic::NonSequentialArgs { .. })));
  }

  #[test]
  fn flags_a_terminal_argument_whose_regex_has_no_capture_action() {
    let err = validate_src(
      r#"
      [lexer] main { NUM = "[0-9]+"; }
      [token] main { NUM; }
      [parser] main { S : [lit] NUM(0) ; }
      "#,
    )
    .unwrap_err();
    assert!(err.iter().any(|d| matches!(d, Diagnostic::MissingAction { .. })));
  }

  #[test]
  fn flags_duplicate_rhs() {
    let err = validate_src(
      r#"
      [lexer] main { A = "a"; }
      [token] main { A; }
      [parser] main { S : [] A | [] A ; }
      "#,
    )
    .unwrap_err();
    assert!(err.iter().any(|d| matches!(d, Diagnostic::DuplicateRhs { .. })));
  }

  #[test]
  fn accepts_a_well_formed_spec() {
    let validated = validate_src(
      r#"
      [lexer] main { [skip] WS = "[ ]+"; INT = "[0-9]+"; ID = "[a-zA-Z]+"; }
      [token] main { INT; ID; }
      [parser] main { S : [] INT | [] ID ; }
      "#,
    )
    .unwrap();
    assert_eq!(validated.grammar.rules.len(), 3); // augmented start + 2 alternatives
  }
}
