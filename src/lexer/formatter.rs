use super::{LexicalError, LineBreaks, Token, TokenKind};

/// Interface for rendering tokens and lexical errors as text.
pub trait TokenFormatter {
    fn format(&self, token: &Token) -> String;
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

pub struct DebugFormatter;

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}

/// `KIND lexeme literal` lines, with `null` standing in for absent literals.
pub struct BasicFormatter<'src> {
    source: &'src str,
    line_breaks: LineBreaks,
}

impl<'src> BasicFormatter<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            line_breaks: LineBreaks::new(source),
        }
    }

    fn describe(&self, token: &Token) -> String {
        let lexeme = &self.source[token.span.range()];
        match token.kind {
            TokenKind::Number => {
                let value: f64 = lexeme
                    .parse()
                    .expect("Numeric literals are guaranteed to be parseable into f64.");
                format!("{} {lexeme} {value:?}", token.kind)
            }
            TokenKind::String => {
                let value = &lexeme[1..lexeme.len() - 1];
                format!("{} {lexeme} {value}", token.kind)
            }
            _ => format!("{} {lexeme} null", token.kind),
        }
    }
}

impl<'src> TokenFormatter for BasicFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        self.describe(token)
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("[line {line}] Error: {}", error.kind)
    }
}

/// Like [`BasicFormatter`] but prefixed with the token's line number.
pub struct LineFormatter<'src> {
    inner: BasicFormatter<'src>,
}

impl<'src> LineFormatter<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: BasicFormatter::new(source),
        }
    }
}

impl<'src> TokenFormatter for LineFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        format!("({}) {}", token.line, self.inner.describe(token))
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        self.inner.format_lexical_error(error)
    }
}
