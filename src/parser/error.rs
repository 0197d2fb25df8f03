use crate::lexer::{Span, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("Expected {expected} but found {actual}.")]
    UnexpectedToken {
        expected: TokenKind,
        actual: TokenKind,
    },
    #[error("Expected {expected} but reached the end of the file.")]
    UnexpectedEof { expected: TokenKind },
    #[error("Expected an expression but found {actual}.")]
    ExpectedExpression { actual: TokenKind },
    #[error("Invalid assignment target.")]
    InvalidAssignmentTarget,
    #[error("Can't have more than 255 parameters.")]
    TooManyParameters,
    #[error("Can't have more than 255 arguments.")]
    TooManyArguments,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct ParseError {
    #[source]
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParseErrorKind::UnexpectedToken { .. } => "PA001",
            ParseErrorKind::UnexpectedEof { .. } => "PA002",
            ParseErrorKind::ExpectedExpression { .. } => "PA003",
            ParseErrorKind::InvalidAssignmentTarget => "PA004",
            ParseErrorKind::TooManyParameters => "PA005",
            ParseErrorKind::TooManyArguments => "PA006",
        }
    }
}
