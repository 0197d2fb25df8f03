mod error;
pub mod formatter;
mod token;

pub use error::{LexicalError, LexicalErrorKind};
pub use token::{Span, Token, TokenKind, KEYWORDS};

use std::ops::Range;
use std::rc::Rc;

/// Lookup table from byte offsets to 1-based line numbers.
#[derive(Debug, Clone)]
pub struct LineBreaks {
    lines: Rc<[Range<u32>]>,
}

impl LineBreaks {
    pub fn new(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut cursor = 0u32;
        for (offset, _) in text.match_indices('\n') {
            let end = offset as u32 + 1;
            lines.push(cursor..end);
            cursor = end;
        }
        // Final line, which also covers the EOF offset.
        lines.push(cursor..text.len() as u32 + 1);
        Self {
            lines: lines.into(),
        }
    }

    pub fn get_line(&self, offset: u32) -> u32 {
        let index = self
            .lines
            .partition_point(|line| line.end <= offset)
            .min(self.lines.len() - 1);
        index as u32 + 1
    }

    pub fn get_line_from_span(&self, span: Span) -> u32 {
        self.get_line(span.start)
    }
}

/// Scans source text into tokens. `next_token` is resumable after an error,
/// so one pass can collect every lexical diagnostic.
#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    offset: u32,
    line: u32,
    line_breaks: LineBreaks,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            line_breaks: LineBreaks::new(source),
        }
    }

    pub fn get_line_breaks(&self) -> LineBreaks {
        self.line_breaks.clone()
    }

    /// Drives the lexer to EOF, aggregating every error along the way. The
    /// token stream always terminates with an EOF token.
    pub fn scan(mut self) -> (Vec<Token>, Vec<LexicalError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        loop {
            match self.next_token() {
                Ok(token) => {
                    let done = matches!(token.kind, TokenKind::Eof);
                    tokens.push(token);
                    if done {
                        break;
                    }
                }
                Err(error) => errors.push(error),
            }
        }
        (tokens, errors)
    }

    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        self.skip_ignored()?;

        let start = self.offset;
        let line = self.line;
        let c = match self.advance() {
            Some(c) => c,
            None => return Ok(self.make_token(TokenKind::Eof, start, line)),
        };

        let kind = match c {
            '(' => TokenKind::LeftParenthesis,
            ')' => TokenKind::RightParenthesis,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '-' => TokenKind::Minus,
            '+' => TokenKind::Plus,
            ';' => TokenKind::Semicolon,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '!' => self.two_char(TokenKind::BangEqual, TokenKind::Bang),
            '=' => self.two_char(TokenKind::EqualEqual, TokenKind::Equal),
            '<' => self.two_char(TokenKind::LessEqual, TokenKind::Less),
            '>' => self.two_char(TokenKind::GreaterEqual, TokenKind::Greater),
            '"' => return self.string(start, line),
            c if c.is_ascii_digit() => return Ok(self.number(start, line)),
            c if is_identifier_start(c) => return Ok(self.identifier(start, line)),
            c => {
                return Err(LexicalError {
                    kind: LexicalErrorKind::UnexpectedCharacter(c),
                    span: Span::new(start, c.len_utf8() as u32),
                })
            }
        };
        Ok(self.make_token(kind, start, line))
    }

    fn make_token(&self, kind: TokenKind, start: u32, line: u32) -> Token {
        Token {
            kind,
            span: Span::new(start, self.offset - start),
            line,
        }
    }

    fn two_char(&mut self, combined: TokenKind, single: TokenKind) -> TokenKind {
        if self.eat_if('=') {
            combined
        } else {
            single
        }
    }

    fn string(&mut self, start: u32, line: u32) -> Result<Token, LexicalError> {
        loop {
            match self.advance() {
                Some('"') => return Ok(self.make_token(TokenKind::String, start, line)),
                Some(_) => {}
                None => {
                    return Err(LexicalError {
                        kind: LexicalErrorKind::UnterminatedString,
                        span: Span::new(start, self.offset - start),
                    })
                }
            }
        }
    }

    fn number(&mut self, start: u32, line: u32) -> Token {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        // A trailing dot belongs to the next token, not the number.
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        self.make_token(TokenKind::Number, start, line)
    }

    fn identifier(&mut self, start: u32, line: u32) -> Token {
        while matches!(self.peek(), Some(c) if is_identifier_continue(c)) {
            self.advance();
        }
        let lexeme = &self.source[start as usize..self.offset as usize];
        let kind = KEYWORDS
            .get(lexeme)
            .copied()
            .unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start, line)
    }

    fn skip_ignored(&mut self) -> Result<(), LexicalError> {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => {
                    self.advance();
                }
                Some('/') => match self.peek_next() {
                    Some('/') => {
                        while !matches!(self.peek(), Some('\n') | None) {
                            self.advance();
                        }
                    }
                    Some('*') => self.block_comment()?,
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    fn block_comment(&mut self) -> Result<(), LexicalError> {
        let start = self.offset;
        self.advance();
        self.advance();
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return Ok(());
                }
                Some(_) => {}
                None => {
                    return Err(LexicalError {
                        kind: LexicalErrorKind::UnterminatedBlockComment,
                        span: Span::new(start, self.offset - start),
                    })
                }
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.offset as usize..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.offset as usize..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8() as u32;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn eat_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
