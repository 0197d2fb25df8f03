pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod reporter;
pub mod resolver;

use interpreter::{SystemContext, TreeWalkInterpreter};
use lexer::{Lexer, LineBreaks, Span};
use parser::Parser;
use resolver::Resolver;

/// One reportable failure, tagged with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] {}", self.line, self.message)
    }
}

/// Every failure a run produced. Lexical and resolution stages aggregate
/// errors in source order; parsing and interpretation stop at the first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for diagnostic in &self.diagnostics {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn to_diagnostic(
    line_breaks: &LineBreaks,
    span: Span,
    error: impl std::fmt::Display,
) -> Diagnostic {
    Diagnostic {
        line: line_breaks.get_line_from_span(span),
        message: error.to_string(),
    }
}

/// Front door: lexes, parses, resolves, then interprets `source`, routing
/// `print` output through `context`. A stage only runs once every earlier
/// stage has fully succeeded.
pub fn run<C: SystemContext>(source: &str, context: &mut C) -> Result<(), Diagnostics> {
    let lexer = Lexer::new(source);
    let line_breaks = lexer.get_line_breaks();
    let (tokens, errors) = lexer.scan();
    if !errors.is_empty() {
        return Err(errors
            .iter()
            .map(|error| to_diagnostic(&line_breaks, error.span, error))
            .collect());
    }

    let program = Parser::new(source, tokens).parse().map_err(|error| {
        Diagnostics::from_iter([to_diagnostic(&line_breaks, error.span, &error)])
    })?;

    let resolved = Resolver::new().resolve(program).map_err(|errors| {
        errors
            .iter()
            .map(|error| to_diagnostic(&line_breaks, error.span, error))
            .collect::<Diagnostics>()
    })?;

    let interpreter = TreeWalkInterpreter::new(context);
    match interpreter.run(&resolved) {
        Ok(_) => Ok(()),
        Err(error) => Err(Diagnostics::from_iter([to_diagnostic(
            &line_breaks,
            error.span,
            &error,
        )])),
    }
}
