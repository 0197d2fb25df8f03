use super::value::Value;
use crate::lexer::Span;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum RuntimeErrorKind {
    #[error("Operand must be a number.")]
    NonNumeric(Value),
    #[error("Operands must be numbers.")]
    NonNumerics(Value, Value),
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(CompactString),
    #[error("Can only call functions and classes.")]
    InvalidCallee(Value),
    #[error("Expected {expected} arguments but got {actual}.")]
    InvalidArgumentCount { expected: usize, actual: usize },
    #[error("Resolved variable '{0}' is missing from its scope.")]
    InvalidDistance(CompactString),
}

#[derive(Debug, Error, Clone)]
#[error("{kind}")]
pub struct RuntimeError {
    #[source]
    pub kind: RuntimeErrorKind,
    pub span: Span,
}

impl RuntimeError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::NonNumeric(_) => "RT001",
            RuntimeErrorKind::NonNumerics(_, _) => "RT002",
            RuntimeErrorKind::UndefinedVariable(_) => "RT003",
            RuntimeErrorKind::InvalidCallee(_) => "RT004",
            RuntimeErrorKind::InvalidArgumentCount { .. } => "RT005",
            RuntimeErrorKind::InvalidDistance(_) => "RT006",
        }
    }
}
