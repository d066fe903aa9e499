//! Component H — the specification file's own tokenizer.
//!
//! Hand-written, not itself a generated DFA: the spec-file loader is a
//! conventional recursive-descent reader over this token stream (see
//! `crate::specfile::parser`), not a self-bootstrapped use of the
//! generator's own engine.

use crate::types::{Diagnostic, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokKind {
  Ident,
  Str,
  Number,
  LBracket,
  RBracket,
  LBrace,
  RBrace,
  Eq,
  Semi,
  Lt,
  Gt,
  Comma,
  Colon,
  Pipe,
  LParen,
  RParen,
  Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
  pub kind: TokKind,
  pub text: String,
  pub pos:  Pos,
}

pub fn lex(src: &str) -> Result<Vec<Token>, Diagnostic> {
  Lexer::new(src).run()
}

struct Lexer<'a> {
  bytes: &'a [u8],
  pos:   usize,
  line:  u32,
  col:   u32,
}

impl<'a> Lexer<'a> {
  fn new(src: &'a str) -> Self {
    Self { bytes: src.as_bytes(), pos: 0, line: 1, col: 1 }
  }

  fn here(&self) -> Pos {
    Pos::new(self.line, self.col, self.pos as u32)
  }

  fn err(&self, msg: String) -> Diagnostic {
    Diagnostic::SpecSyntax { pos: self.here(), msg }
  }

  fn peek(&self) -> Option<u8> {
    self.bytes.get(self.pos).copied()
  }

  fn bump(&mut self) -> Option<u8> {
    let c = self.peek();
    if let Some(b) = c {
      self.pos += 1;
      if b == b'\n' {
        self.line += 1;
        self.col = 1;
      } else {
        self.col += 1;
      }
    }
    c
  }

  fn run(mut self) -> Result<Vec<Token>, Diagnostic> {
    let mut tokens = Vec::new();
    loop {
      self.skip_trivia();
      let pos = self.here();
      let Some(c) = self.peek() else {
        tokens.push(Token { kind: TokKind::Eof, text: String::new(), pos });
        break;
      };
      let simple = |kind: TokKind, text: &str| Token { kind, text: text.to_string(), pos };
      let tok = match c {
        b'[' => {
          self.bump();
          simple(TokKind::LBracket, "[")
        }
        b']' => {
          self.bump();
          simple(TokKind::RBracket, "]")
        }
        b'{' => {
          self.bump();
          simple(TokKind::LBrace, "{")
        }
        b'}' => {
          self.bump();
          simple(TokKind::RBrace, "}")
        }
        b'=' => {
          self.bump();
          simple(TokKind::Eq, "=")
        }
        b';' => {
          self.bump();
          simple(TokKind::Semi, ";")
        }
        b'<' => {
          self.bump();
          simple(TokKind::Lt, "<")
        }
        b'>' => {
          self.bump();
          simple(TokKind::Gt, ">")
        }
        b',' => {
          self.bump();
          simple(TokKind::Comma, ",")
        }
        b':' => {
          self.bump();
          simple(TokKind::Colon, ":")
        }
        b'|' => {
          self.bump();
          simple(TokKind::Pipe, "|")
        }
        b'(' => {
          self.bump();
          simple(TokKind::LParen, "(")
        }
        b')' => {
          self.bump();
          simple(TokKind::RParen, ")")
        }
        b'"' => self.lex_string(pos)?,
        b'0'..=b'9' => self.lex_number(pos),
        c if c.is_ascii_alphabetic() || c == b'_' => self.lex_ident(pos),
        other => return Err(self.err(format!("unexpected character '{}'", other as char))),
      };
      tokens.push(tok);
    }
    Ok(tokens)
  }

  fn skip_trivia(&mut self) {
    loop {
      match self.peek() {
        Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
          self.bump();
        }
        Some(b'#') => {
          while !matches!(self.peek(), Some(b'\n') | None) {
            self.bump();
          }
        }
        _ => break,
      }
    }
  }

  fn lex_ident(&mut self, pos: Pos) -> Token {
    let start = self.pos;
    while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_') {
      self.bump();
    }
    let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap().to_string();
    Token { kind: TokKind::Ident, text, pos }
  }

  fn lex_number(&mut self, pos: Pos) -> Token {
    let start = self.pos;
    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
      self.bump();
    }
    let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap().to_string();
    Token { kind: TokKind::Number, text, pos }
  }

  /// Escapes follow the same table as the regex parser (`spec.md` §4.2).
  fn lex_string(&mut self, pos: Pos) -> Result<Token, Diagnostic> {
    self.bump(); // opening quote
    let mut text = String::new();
    loop {
      match self.bump() {
        Some(b'"') => break,
        Some(b'\\') => {
          let c = self.bump().ok_or_else(|| self.err("dangling escape in string".to_string()))?;
          text.push(match c {
            b'0' => '\0',
            b'a' => '\u{7}',
            b'b' => '\u{8}',
            b't' => '\t',
            b'n' => '\n',
            b'v' => '\u{b}',
            b'f' => '\u{c}',
            b'r' => '\r',
            other => other as char,
          });
        }
        Some(c) => text.push(c as char),
        None => return Err(self.err("unterminated string literal".to_string())),
      }
    }
    Ok(Token { kind: TokKind::Str, text, pos })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lexes_a_lexer_block_header() {
    let toks = lex("[lexer] main {").unwrap();
    let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(
      kinds,
      vec![TokKind::LBracket, TokKind::Ident, TokKind::RBracket, TokKind::Ident, TokKind::LBrace, TokKind::Eof]
    );
  }

  #[test]
  fn lexes_a_quoted_regex_pattern_with_escapes() {
    let toks = lex("\"[0-9]+\\n\"").unwrap();
    assert_eq!(toks[0].kind, TokKind::Str);
    assert_eq!(toks[0].text, "[0-9]+\n");
  }

  #[test]
  fn skips_line_comments() {
    let toks = lex("# a comment\nfoo").unwrap();
    assert_eq!(toks[0].kind, TokKind::Ident);
    assert_eq!(toks[0].text, "foo");
  }

  #[test]
  fn rejects_unterminated_string() {
    assert!(lex("\"abc").is_err());
  }
}
