//! Lexical analysis: turns the raw source text into a vector of tokens.
//!
//! The scanner is a plain cursor over the character buffer. Each call to
//! `next_token` skips whitespace, then at most one comment, then dispatches
//! on the current character. Multi-character operators are recognised in a
//! restricted way: a run of operator characters is cut short only when the
//! text consumed so far is one of `=` `!` `<` `>` and the next character is
//! `=`, which yields `==` `!=` `<=` `>=` while still producing `&&` and `||`
//! as two-character runs.

use crate::error::{CompileResult, UnterminatedCharacterLiteralSnafu};
use std::fmt;

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Identifier,
  Keyword,
  NumberLiteral,
  FloatingPointLiteral,
  StringLiteral,
  CharacterLiteral,
  BooleanLiteral,
  NullLiteral,
  Operator,
  Separator,
  Comment,
  EndOfFile,
  Unknown,
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Identifier => "Identifier",
      Self::Keyword => "Keyword",
      Self::NumberLiteral => "NumberLiteral",
      Self::FloatingPointLiteral => "FloatingPointLiteral",
      Self::StringLiteral => "StringLiteral",
      Self::CharacterLiteral => "CharacterLiteral",
      Self::BooleanLiteral => "BooleanLiteral",
      Self::NullLiteral => "NullLiteral",
      Self::Operator => "Operator",
      Self::Separator => "Separator",
      Self::Comment => "Comment",
      Self::EndOfFile => "EndOfFile",
      Self::Unknown => "Unknown",
    };
    write!(f, "{name}")
  }
}

/// Immutable lexical unit carrying its source position. The column is the
/// column of the first character of the lexeme; lines start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub lexeme: String,
  pub line: usize,
  pub column: usize,
}

impl Token {
  pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
    Self {
      kind,
      lexeme: lexeme.into(),
      line,
      column,
    }
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Token({}, \"{}\", Line: {}, Column: {})",
      self.kind, self.lexeme, self.line, self.column
    )
  }
}

/// Character-level scanner. `set_source` rewinds the cursor so a single
/// instance can be reused across compilations.
pub struct Lexer {
  source: Vec<char>,
  index: usize,
  line: usize,
  column: usize,
}

impl Lexer {
  pub fn new() -> Self {
    Self {
      source: Vec::new(),
      index: 0,
      line: 1,
      column: 1,
    }
  }

  /// Load a fresh source buffer and reset the position to line 1, column 1.
  pub fn set_source(&mut self, source: &str) {
    self.source = source.chars().collect();
    self.index = 0;
    self.line = 1;
    self.column = 1;
  }

  fn current_char(&self) -> char {
    self.source.get(self.index).copied().unwrap_or('\0')
  }

  fn peek_char(&self) -> char {
    self.source.get(self.index + 1).copied().unwrap_or('\0')
  }

  fn advance(&mut self) {
    if self.index < self.source.len() {
      if self.source[self.index] == '\n' {
        self.line += 1;
        self.column = 1;
      } else {
        self.column += 1;
      }
      self.index += 1;
    }
  }

  fn skip_whitespace(&mut self) {
    while self.current_char().is_whitespace() {
      self.advance();
    }
  }

  /// Consume one comment if the cursor sits on `//` or `/*`. An unterminated
  /// block comment is closed silently at end of input.
  fn skip_comment(&mut self) {
    if self.current_char() == '/' && self.peek_char() == '/' {
      while self.current_char() != '\n' && self.current_char() != '\0' {
        self.advance();
      }
      self.advance(); // the newline
    } else if self.current_char() == '/' && self.peek_char() == '*' {
      self.advance();
      self.advance();
      while !(self.current_char() == '*' && self.peek_char() == '/') {
        self.advance();
        if self.current_char() == '\0' {
          break;
        }
      }
      self.advance(); // '*'
      self.advance(); // '/'
    }
  }

  /// Digits with at most one `.`; a second `.` terminates the token.
  fn number(&mut self) -> Token {
    let mut lexeme = String::new();
    let mut is_floating_point = false;
    let token_column = self.column;

    while self.current_char().is_ascii_digit() || self.current_char() == '.' {
      if self.current_char() == '.' {
        if is_floating_point {
          break;
        }
        is_floating_point = true;
      }
      lexeme.push(self.current_char());
      self.advance();
    }

    let kind = if is_floating_point {
      TokenKind::FloatingPointLiteral
    } else {
      TokenKind::NumberLiteral
    };
    Token::new(kind, lexeme, self.line, token_column)
  }

  /// Word characters, with `::` absorbed mid-scan so the one reserved
  /// multi-segment name `std::string` comes out as a single lexeme.
  fn identifier_or_keyword(&mut self) -> Token {
    let mut lexeme = String::new();
    let token_column = self.column;

    while self.current_char().is_ascii_alphanumeric() || self.current_char() == '_' {
      lexeme.push(self.current_char());
      self.advance();

      if self.current_char() == ':' && self.peek_char() == ':' {
        lexeme.push_str("::");
        self.advance();
        self.advance();
      }
    }

    let kind = match lexeme.as_str() {
      "true" | "false" => TokenKind::BooleanLiteral,
      "nullptr" => TokenKind::NullLiteral,
      "int" | "return" | "if" | "else" | "for" | "while" | "float" | "char" | "std::string" => {
        TokenKind::Keyword
      }
      _ => TokenKind::Identifier,
    };
    Token::new(kind, lexeme, self.line, token_column)
  }

  /// Both quotes are part of the lexeme; `\"` is preserved as two
  /// characters. End of input inside the literal terminates it silently.
  fn string_literal(&mut self) -> Token {
    let mut lexeme = String::new();
    let token_column = self.column;

    lexeme.push(self.current_char()); // opening quote
    self.advance();

    while self.current_char() != '"' && self.current_char() != '\0' {
      if self.current_char() == '\\' && self.peek_char() == '"' {
        lexeme.push(self.current_char());
        self.advance();
        lexeme.push(self.current_char()); // the escaped quote
      } else {
        lexeme.push(self.current_char());
      }
      self.advance();
    }

    if self.current_char() == '"' {
      lexeme.push(self.current_char());
      self.advance();
    }

    Token::new(TokenKind::StringLiteral, lexeme, self.line, token_column)
  }

  /// One character or the `\'` escape between single quotes; anything else
  /// is a fatal lexical error.
  fn character_literal(&mut self) -> CompileResult<Token> {
    let mut lexeme = String::new();
    let token_column = self.column;

    lexeme.push(self.current_char()); // opening quote
    self.advance();

    if self.current_char() == '\\' && self.peek_char() == '\'' {
      lexeme.push(self.current_char());
      self.advance();
    } else {
      lexeme.push(self.current_char());
    }
    self.advance();

    if self.current_char() != '\'' {
      return UnterminatedCharacterLiteralSnafu.fail();
    }

    lexeme.push(self.current_char()); // closing quote
    self.advance();

    Ok(Token::new(
      TokenKind::CharacterLiteral,
      lexeme,
      self.line,
      token_column,
    ))
  }

  fn is_operator(c: char) -> bool {
    "+-*/%=<>!&|^~".contains(c)
  }

  fn operator_token(&mut self) -> Token {
    let mut lexeme = String::new();
    let token_column = self.column;

    while Self::is_operator(self.current_char()) {
      lexeme.push(self.current_char());
      self.advance();

      let combines = matches!(lexeme.as_str(), "=" | "!" | "<" | ">");
      if combines && self.current_char() == '=' {
        lexeme.push('=');
        self.advance();
        break;
      }
    }

    Token::new(TokenKind::Operator, lexeme, self.line, token_column)
  }

  fn next_token(&mut self) -> CompileResult<Token> {
    self.skip_whitespace();
    self.skip_comment();

    let c = self.current_char();

    if c.is_ascii_digit() {
      return Ok(self.number());
    }

    if c.is_ascii_alphabetic() || c == '_' {
      return Ok(self.identifier_or_keyword());
    }

    if c == '"' {
      return Ok(self.string_literal());
    }

    if c == '\'' {
      return self.character_literal();
    }

    if Self::is_operator(c) {
      return Ok(self.operator_token());
    }

    if matches!(c, ';' | ',' | '(' | ')' | '{' | '}') {
      let token = Token::new(TokenKind::Separator, c, self.line, self.column);
      self.advance();
      return Ok(token);
    }

    if c == '\0' {
      return Ok(Token::new(TokenKind::EndOfFile, "", self.line, self.column));
    }

    let token = Token::new(TokenKind::Unknown, c, self.line, self.column);
    self.advance();
    Ok(token)
  }

  /// Scan the whole buffer. Unknown characters are dropped; the stream
  /// always ends with exactly one `EndOfFile` token.
  pub fn tokenize(&mut self) -> CompileResult<Vec<Token>> {
    let mut tokens = Vec::new();

    loop {
      let token = self.next_token()?;
      match token.kind {
        TokenKind::Unknown => continue,
        TokenKind::EndOfFile => {
          tokens.push(token);
          break;
        }
        _ => tokens.push(token),
      }
    }

    Ok(tokens)
  }
}
