//! Component H — recursive-descent reader over the spec-file token stream
//! (`spec.md` §6's grammar sketch). A conventional hand-written parser, not
//! self-bootstrapped from the generator's own LALR engine (`spec.md` §9,
//! recorded as an open decision in `DESIGN.md`).

use super::ast::{PrecBlockDecl, RegexRule, RhsDecl, RhsSymbol, RuleDecl, SpecFile};
use super::lexer::{TokKind, Token};
use crate::types::{Diagnostic, Pos};

pub fn parse(tokens: &[Token]) -> Result<SpecFile, Diagnostic> {
  Parser { tokens, idx: 0 }.run()
}

struct Parser<'a> {
  tokens: &'a [Token],
  idx:    usize,
}

impl<'a> Parser<'a> {
  fn peek(&self) -> &Token {
    &self.tokens[self.idx]
  }

  fn peek_kind(&self) -> TokKind {
    self.peek().kind
  }

  fn pos(&self) -> Pos {
    self.peek().pos
  }

  fn bump(&mut self) -> Token {
    let t = self.tokens[self.idx].clone();
    if self.idx + 1 < self.tokens.len() {
      self.idx += 1;
    }
    t
  }

  fn err(&self, msg: String) -> Diagnostic {
    Diagnostic::SpecSyntax { pos: self.pos(), msg }
  }

  fn expect(&mut self, kind: TokKind, what: &str) -> Result<Token, Diagnostic> {
    if self.peek_kind() == kind {
      Ok(self.bump())
    } else {
      Err(self.err(format!("expected {what}, found `{}`", self.peek().text)))
    }
  }

  fn expect_keyword(&mut self, expected: &str) -> Result<(), Diagnostic> {
    let t = self.expect(TokKind::Ident, "an identifier")?;
    if t.text != expected {
      return Err(Diagnostic::SpecSyntax { pos: t.pos, msg: format!("expected keyword `{expected}`, found `{}`", t.text) });
    }
    Ok(())
  }

  fn run(mut self) -> Result<SpecFile, Diagnostic> {
    let (lexer_ns, regex_rules) = self.parse_lexer_block()?;
    let (token_ns, tok_decls, prec_blocks) = self.parse_token_block()?;
    let (parser_ns, rules) = self.parse_parser_block()?;
    self.expect(TokKind::Eof, "end of input")?;
    Ok(SpecFile { lexer_ns, regex_rules, token_ns, tok_decls, prec_blocks, parser_ns, rules })
  }

  fn parse_lexer_block(&mut self) -> Result<(String, Vec<RegexRule>), Diagnostic> {
    self.expect(TokKind::LBracket, "'['")?;
    self.expect_keyword("lexer")?;
    self.expect(TokKind::RBracket, "']'")?;
    let ns = self.expect(TokKind::Ident, "a namespace identifier")?.text;
    self.expect(TokKind::LBrace, "'{'")?;
    let mut rules = Vec::new();
    while self.peek_kind() != TokKind::RBrace {
      rules.push(self.parse_regex_rule()?);
    }
    self.expect(TokKind::RBrace, "'}'")?;
    Ok((ns, rules))
  }

  fn parse_regex_rule(&mut self) -> Result<RegexRule, Diagnostic> {
    let pos = self.pos();
    let class = if self.peek_kind() == TokKind::LBracket {
      self.bump();
      let name = self.expect(TokKind::Ident, "a class name")?.text;
      self.expect(TokKind::RBracket, "']'")?;
      Some(name)
    } else {
      None
    };
    let name = self.expect(TokKind::Ident, "a regex name")?.text;
    self.expect(TokKind::Eq, "'='")?;
    let pattern = self.expect(TokKind::Str, "a quoted pattern")?.text;
    if self.peek_kind() == TokKind::Semi {
      self.bump();
    }
    Ok(RegexRule { class, name, pattern, pos })
  }

  fn parse_token_block(&mut self) -> Result<(String, Vec<(String, Pos)>, Vec<PrecBlockDecl>), Diagnostic> {
    self.expect(TokKind::LBracket, "'['")?;
    self.expect_keyword("token")?;
    self.expect(TokKind::RBracket, "']'")?;
    let ns = self.expect(TokKind::Ident, "a namespace identifier")?.text;
    self.expect(TokKind::LBrace, "'{'")?;
    let mut tok_decls = Vec::new();
    let mut prec_blocks = Vec::new();
    while self.peek_kind() != TokKind::RBrace {
      if self.peek_kind() == TokKind::Lt {
        prec_blocks.push(self.parse_prec_block()?);
      } else {
        let t = self.expect(TokKind::Ident, "a token name")?;
        if self.peek_kind() == TokKind::Semi {
          self.bump();
        }
        tok_decls.push((t.text, t.pos));
      }
    }
    self.expect(TokKind::RBrace, "'}'")?;
    Ok((ns, tok_decls, prec_blocks))
  }

  fn parse_prec_block(&mut self) -> Result<PrecBlockDecl, Diagnostic> {
    let pos = self.pos();
    self.expect(TokKind::Lt, "'<'")?;
    let assoc = self.expect(TokKind::Ident, "an associativity keyword")?.text;
    self.expect(TokKind::Gt, "'>'")?;
    self.expect(TokKind::LBrace, "'{'")?;
    let mut idents = Vec::new();
    while self.peek_kind() != TokKind::RBrace {
      idents.extend(self.parse_ident_list()?);
      self.expect(TokKind::Semi, "';'")?;
    }
    self.expect(TokKind::RBrace, "'}'")?;
    Ok(PrecBlockDecl { assoc, idents, pos })
  }

  fn parse_ident_list(&mut self) -> Result<Vec<(String, Pos)>, Diagnostic> {
    let mut out = Vec::new();
    loop {
      let t = self.expect(TokKind::Ident, "an identifier")?;
      out.push((t.text, t.pos));
      if self.peek_kind() == TokKind::Comma {
        self.bump();
      } else {
        break;
      }
    }
    Ok(out)
  }

  fn parse_parser_block(&mut self) -> Result<(String, Vec<RuleDecl>), Diagnostic> {
    self.expect(TokKind::LBracket, "'['")?;
    self.expect_keyword("parser")?;
    self.expect(TokKind::RBracket, "']'")?;
    let ns = self.expect(TokKind::Ident, "a namespace identifier")?.text;
    self.expect(TokKind::LBrace, "'{'")?;
    let mut rules = Vec::new();
    while self.peek_kind() != TokKind::RBrace {
      rules.push(self.parse_rule()?);
    }
    self.expect(TokKind::RBrace, "'}'")?;
    Ok((ns, rules))
  }

  fn parse_rule(&mut self) -> Result<RuleDecl, Diagnostic> {
    let lhs_tok = self.expect(TokKind::Ident, "a rule name")?;
    self.expect(TokKind::Colon, "':'")?;
    let mut rhs = vec![self.parse_rhs()?];
    while self.peek_kind() == TokKind::Pipe {
      self.bump();
      rhs.push(self.parse_rhs()?);
    }
    self.expect(TokKind::Semi, "';'")?;
    Ok(RuleDecl { lhs: lhs_tok.text, lhs_pos: lhs_tok.pos, rhs })
  }

  fn parse_rhs(&mut self) -> Result<RhsDecl, Diagnostic> {
    let pos = self.pos();
    self.expect(TokKind::LBracket, "'['")?;
    let action = if self.peek_kind() == TokKind::Ident { Some(self.bump().text) } else { None };
    self.expect(TokKind::RBracket, "']'")?;
    let tag = if self.peek_kind() == TokKind::Lt {
      self.bump();
      let t = self.expect(TokKind::Ident, "a tag terminal")?;
      self.expect(TokKind::Gt, "'>'")?;
      Some((t.text, t.pos))
    } else {
      None
    };
    let mut symbols = Vec::new();
    while self.peek_kind() == TokKind::Ident {
      let t = self.bump();
      let arg_index = if self.peek_kind() == TokKind::LParen {
        self.bump();
        let n = self.expect(TokKind::Number, "an argument index")?;
        self.expect(TokKind::RParen, "')'")?;
        let pos = n.pos;
        Some(n.text.parse::<usize>().map_err(|_| Diagnostic::SpecSyntax {
          pos,
          msg: format!("argument index `{}` out of range", n.text),
        })?)
      } else {
        None
      };
      symbols.push(RhsSymbol { name: t.text, arg_index, pos: t.pos });
    }
    Ok(RhsDecl { action, tag, symbols, pos })
  }
}
