//! Component B — the regex source parser (`spec.md` §4.2).
//!
//! A byte-level recursive-descent parser. Failures abort immediately with
//! `Diagnostic::RegexSyntax` (`spec.md` §7: "lexer/regex errors abort spec
//! loading immediately").

use super::ast::{ClassItem, RepeatBound, Regex};
use crate::types::{Diagnostic, Pos};

pub fn parse(src: &str) -> Result<Regex, Diagnostic> {
  Parser::new(src).run()
}

struct Parser<'a> {
  bytes: &'a [u8],
  pos:   usize,
}

impl<'a> Parser<'a> {
  fn new(src: &'a str) -> Self {
    Self { bytes: src.as_bytes(), pos: 0 }
  }

  fn run(mut self) -> Result<Regex, Diagnostic> {
    let after_newline = self.peek() == Some(b'^');
    if after_newline {
      self.pos += 1;
    }
    let node = self.parse_alt()?;
    if self.pos != self.bytes.len() {
      return Err(self.err(format!("unexpected trailing input {:?}", self.remaining())));
    }
    Ok(if after_newline { Regex::AfterNewline(Box::new(node)) } else { node })
  }

  fn remaining(&self) -> &str {
    std::str::from_utf8(&self.bytes[self.pos..]).unwrap_or("<invalid utf8>")
  }

  fn err(&self, msg: String) -> Diagnostic {
    Diagnostic::RegexSyntax { pos: Pos::new(1, self.pos as u32 + 1, self.pos as u32), msg }
  }

  fn peek(&self) -> Option<u8> {
    self.bytes.get(self.pos).copied()
  }

  fn peek2(&self) -> Option<u8> {
    self.bytes.get(self.pos + 1).copied()
  }

  fn bump(&mut self) -> Option<u8> {
    let c = self.peek();
    if c.is_some() {
      self.pos += 1;
    }
    c
  }

  fn expect(&mut self, c: u8) -> Result<(), Diagnostic> {
    if self.peek() == Some(c) {
      self.pos += 1;
      Ok(())
    } else {
      Err(self.err(format!("expected '{}'", c as char)))
    }
  }

  // alt := concat ('|' concat)*
  fn parse_alt(&mut self) -> Result<Regex, Diagnostic> {
    let mut node = self.parse_concat()?;
    while self.peek() == Some(b'|') {
      self.pos += 1;
      let rhs = self.parse_concat()?;
      node = Regex::alt(node, rhs);
    }
    Ok(node)
  }

  // concat := postfix+
  fn parse_concat(&mut self) -> Result<Regex, Diagnostic> {
    let mut node: Option<Regex> = None;
    while let Some(c) = self.peek() {
      if c == b'|' || c == b')' {
        break;
      }
      let atom = self.parse_postfix()?;
      node = Some(match node {
        Some(n) => Regex::concat(n, atom),
        None => atom,
      });
    }
    node.ok_or_else(|| self.err("empty expression".to_string()))
  }

  // postfix := atom ('*' | '+' | '?' | '{' n (',' m?)? '}')*
  fn parse_postfix(&mut self) -> Result<Regex, Diagnostic> {
    let mut atom = self.parse_atom()?;
    loop {
      match self.peek() {
        Some(b'*') => {
          self.pos += 1;
          atom = Regex::Star(Box::new(atom));
        }
        Some(b'+') => {
          self.pos += 1;
          atom = Regex::Plus(Box::new(atom));
        }
        Some(b'?') => {
          self.pos += 1;
          atom = Regex::Optional(Box::new(atom));
        }
        Some(b'{') => {
          atom = self.parse_repeat(atom)?;
        }
        _ => break,
      }
    }
    Ok(atom)
  }

  fn parse_repeat(&mut self, inner: Regex) -> Result<Regex, Diagnostic> {
    self.pos += 1; // '{'
    let n = self.parse_number()?;
    let m = if self.peek() == Some(b',') {
      self.pos += 1;
      if self.peek() == Some(b'}') { RepeatBound::Unbounded } else { RepeatBound::Bounded(self.parse_number()?) }
    } else {
      RepeatBound::Bounded(n)
    };
    self.expect(b'}')?;
    Ok(Regex::Repeat { inner: Box::new(inner), n, m })
  }

  fn parse_number(&mut self) -> Result<u32, Diagnostic> {
    let start = self.pos;
    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
      self.pos += 1;
    }
    if self.pos == start {
      return Err(self.err("expected a number".to_string()));
    }
    std::str::from_utf8(&self.bytes[start..self.pos])
      .unwrap()
      .parse()
      .map_err(|_| self.err("repetition count out of range".to_string()))
  }

  fn parse_atom(&mut self) -> Result<Regex, Diagnostic> {
    match self.peek() {
      Some(b'(') => {
        self.pos += 1;
        let inner = self.parse_alt()?;
        self.expect(b')')?;
        Ok(Regex::Group(Box::new(inner)))
      }
      Some(b'[') => {
        self.pos += 1;
        self.parse_class()
      }
      Some(b'.') => {
        self.pos += 1;
        Ok(Regex::AnyByte)
      }
      Some(b'$') => {
        self.pos += 1;
        Ok(Regex::EndOfStream)
      }
      Some(b'"') => {
        self.pos += 1;
        self.parse_string()
      }
      Some(b'\\') => {
        self.pos += 1;
        let b = self.parse_escape()?;
        Ok(Regex::Char(b))
      }
      Some(c) => {
        self.pos += 1;
        Ok(Regex::Char(c))
      }
      None => Err(self.err("unexpected end of pattern".to_string())),
    }
  }

  /// `\0 \a \b \t \n \v \f \r` map to their control byte; any other `\x` is
  /// literal `x` (`spec.md` §4.2).
  fn parse_escape(&mut self) -> Result<u8, Diagnostic> {
    let c = self.bump().ok_or_else(|| self.err("dangling escape at end of pattern".to_string()))?;
    Ok(match c {
      b'0' => 0x00,
      b'a' => 0x07,
      b'b' => 0x08,
      b't' => b'\t',
      b'n' => b'\n',
      b'v' => 0x0B,
      b'f' => 0x0C,
      b'r' => b'\r',
      other => other,
    })
  }

  fn parse_string(&mut self) -> Result<Regex, Diagnostic> {
    let mut bytes = Vec::new();
    loop {
      match self.bump() {
        Some(b'"') => break,
        Some(b'\\') => bytes.push(self.parse_escape()?),
        Some(c) => bytes.push(c),
        None => return Err(self.err("unterminated string literal".to_string())),
      }
    }
    Ok(Regex::StringLiteral(bytes))
  }

  fn parse_class(&mut self) -> Result<Regex, Diagnostic> {
    let negated = if self.peek() == Some(b'^') {
      self.pos += 1;
      true
    } else {
      false
    };
    let mut items = Vec::new();
    loop {
      match self.peek() {
        Some(b']') => {
          self.pos += 1;
          break;
        }
        None => return Err(self.err("unterminated character class".to_string())),
        Some(_) => {
          let lo = self.parse_class_byte()?;
          if self.peek() == Some(b'-') && self.peek2() != Some(b']') && self.peek2().is_some() {
            self.pos += 1;
            let hi = self.parse_class_byte()?;
            items.push(ClassItem::range(lo, hi));
          } else {
            items.push(ClassItem::Byte(lo));
          }
        }
      }
    }
    Ok(Regex::CharClass { items, negated })
  }

  fn parse_class_byte(&mut self) -> Result<u8, Diagnostic> {
    match self.bump() {
      Some(b'\\') => self.parse_escape(),
      Some(c) => Ok(c),
      None => Err(self.err("unterminated character class".to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_a_plain_concatenation() {
    let re = parse("ab").unwrap();
    assert_eq!(re, Regex::concat(Regex::Char(b'a'), Regex::Char(b'b')));
  }

  #[test]
  fn parses_alternation_with_lower_precedence_than_concat() {
    let re = parse("ab|c").unwrap();
    assert_eq!(re, Regex::alt(Regex::concat(Regex::Char(b'a'), Regex::Char(b'b')), Regex::Char(b'c')));
  }

  #[test]
  fn parses_star_plus_optional() {
    assert_eq!(parse("a*").unwrap(), Regex::Star(Box::new(Regex::Char(b'a'))));
    assert_eq!(parse("a+").unwrap(), Regex::Plus(Box::new(Regex::Char(b'a'))));
    assert_eq!(parse("a?").unwrap(), Regex::Optional(Box::new(Regex::Char(b'a'))));
  }

  #[test]
  fn parses_bounded_and_unbounded_repeats() {
    assert_eq!(
      parse("a{2}").unwrap(),
      Regex::Repeat { inner: Box::new(Regex::Char(b'a')), n: 2, m: RepeatBound::Bounded(2) }
    );
    assert_eq!(
      parse("a{2,}").unwrap(),
      Regex::Repeat { inner: Box::new(Regex::Char(b'a')), n: 2, m: RepeatBound::Unbounded }
    );
    assert_eq!(
      parse("a{2,4}").unwrap(),
      Regex::Repeat { inner: Box::new(Regex::Char(b'a')), n: 2, m: RepeatBound::Bounded(4) }
    );
  }

  #[test]
  fn parses_negated_class_with_range() {
    let re = parse("[^a-z\\n]").unwrap();
    match re {
      Regex::CharClass { items, negated } => {
        assert!(negated);
        assert_eq!(items, vec![ClassItem::Range(b'a', b'z'), ClassItem::Byte(b'\n')]);
      }
      _ => panic!("expected CharClass"),
    }
  }

  #[test]
  fn parses_escapes_outside_and_inside_strings() {
    assert_eq!(parse("\\n").unwrap(), Regex::Char(b'\n'));
    assert_eq!(parse("\"a\\tb\"").unwrap(), Regex::StringLiteral(vec![b'a', b'\t', b'b']));
  }

  #[test]
  fn unrecognized_escape_is_the_literal_character() {
    assert_eq!(parse("\\q").unwrap(), Regex::Char(b'q'));
  }

  #[test]
  fn leading_caret_marks_after_newline() {
    let re = parse("^abc").unwrap();
    assert!(matches!(re, Regex::AfterNewline(_)));
  }

  #[test]
  fn end_of_stream_and_any_byte_markers() {
    assert_eq!(parse("$").unwrap(), Regex::EndOfStream);
    assert_eq!(parse(".").unwrap(), Regex::AnyByte);
  }

  #[test]
  fn rejects_unterminated_group() {
    assert!(parse("(ab").is_err());
  }

  #[test]
  fn rejects_empty_alternative() {
    assert!(parse("a|").is_err());
  }
}
