use crate::lexer::Span;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionErrorKind {
    #[error("Can't read local variable in its own initializer.")]
    SelfReferentialInitializer,
    #[error("Can't return from top-level code.")]
    TopLevelReturn,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct ResolutionError {
    #[source]
    pub kind: ResolutionErrorKind,
    pub span: Span,
}

impl ResolutionError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ResolutionErrorKind::SelfReferentialInitializer => "RA001",
            ResolutionErrorKind::TopLevelReturn => "RA002",
        }
    }
}
