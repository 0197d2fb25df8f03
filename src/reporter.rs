use crate::interpreter::{RuntimeError, RuntimeErrorKind};
use crate::lexer::{LexicalError, LexicalErrorKind, Span};
use crate::parser::{ParseError, ParseErrorKind};
use crate::resolver::{ResolutionError, ResolutionErrorKind};
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

/// Renders errors from every stage as ariadne reports against the source.
pub struct Reporter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> Reporter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }

    pub fn report_lexical_error(&self, error: &LexicalError) -> String {
        let (message, label) = match &error.kind {
            LexicalErrorKind::UnexpectedCharacter(c) => (
                "Encountered a character outside of the grammar",
                format!(
                    "The character {} can not start any token",
                    format!("{c:?}").fg(Color::BrightRed)
                ),
            ),
            LexicalErrorKind::UnterminatedString => (
                "Reached the end of the file inside a string literal",
                format!("This string is missing its closing {}", "\"".fg(Color::BrightCyan)),
            ),
            LexicalErrorKind::UnterminatedBlockComment => (
                "Reached the end of the file inside a block comment",
                format!("This comment is missing its closing {}", "*/".fg(Color::BrightCyan)),
            ),
        };
        self.render(error.span, error.code(), message, &label)
    }

    pub fn report_parse_error(&self, error: &ParseError) -> String {
        let (message, label) = match &error.kind {
            ParseErrorKind::UnexpectedToken { expected, actual } => (
                "Encountered an unexpected token",
                format!(
                    "Expected {} here but found {}",
                    expected.fg(Color::BrightCyan),
                    actual.fg(Color::BrightRed)
                ),
            ),
            ParseErrorKind::UnexpectedEof { expected } => (
                "Reached the end of the file mid-statement",
                format!("Expected {} before the file ended", expected.fg(Color::BrightCyan)),
            ),
            ParseErrorKind::ExpectedExpression { actual } => (
                "Expected the start of an expression",
                format!("{} can not start an expression", actual.fg(Color::BrightRed)),
            ),
            ParseErrorKind::InvalidAssignmentTarget => (
                "Assigned to something that is not a variable",
                "Only plain variable names can appear left of `=`".to_string(),
            ),
            ParseErrorKind::TooManyParameters => (
                "Function declares too many parameters",
                format!("At most {} parameters are allowed", 255.fg(Color::BrightCyan)),
            ),
            ParseErrorKind::TooManyArguments => (
                "Call passes too many arguments",
                format!("At most {} arguments are allowed", 255.fg(Color::BrightCyan)),
            ),
        };
        self.render(error.span, error.code(), message, &label)
    }

    pub fn report_resolution_error(&self, error: &ResolutionError) -> String {
        let (message, label) = match &error.kind {
            ResolutionErrorKind::SelfReferentialInitializer => (
                "Read a local variable inside its own initializer",
                "This name is still being initialized here".to_string(),
            ),
            ResolutionErrorKind::TopLevelReturn => (
                "Returned from outside of a function",
                format!("{} only makes sense inside a function body", "return".fg(Color::BrightCyan)),
            ),
        };
        self.render(error.span, error.code(), message, &label)
    }

    pub fn report_runtime_error(&self, error: &RuntimeError) -> String {
        let (message, label) = match &error.kind {
            RuntimeErrorKind::NonNumeric(v) => (
                "Expected a single numeric operand",
                format!("This operand is {} instead of a number", v.fg(Color::BrightRed)),
            ),
            RuntimeErrorKind::NonNumerics(lhs, rhs) => (
                "Expected both operands to be numeric",
                format!(
                    "One or both of {} and {} is not a number",
                    lhs.fg(Color::BrightRed),
                    rhs.fg(Color::BrightRed)
                ),
            ),
            RuntimeErrorKind::UndefinedVariable(name) => (
                "Accessed a variable that has not been defined",
                format!("{} has no binding in any enclosing scope", name.fg(Color::BrightRed)),
            ),
            RuntimeErrorKind::InvalidCallee(v) => (
                "Attempted to call a value that is not callable",
                format!("{} is not callable", v.fg(Color::BrightRed)),
            ),
            RuntimeErrorKind::InvalidArgumentCount { expected, actual } => (
                "Called a function with the wrong number of arguments",
                format!(
                    "This function takes {} arguments but got {}",
                    expected.fg(Color::BrightCyan),
                    actual.fg(Color::BrightRed)
                ),
            ),
            RuntimeErrorKind::InvalidDistance(name) => (
                "Resolved variable slot is missing at runtime",
                format!("{} was resolved statically but its frame has no slot", name.fg(Color::BrightRed)),
            ),
        };
        self.render(error.span, error.code(), message, &label)
    }

    fn render(&self, span: Span, code: &str, message: &str, label: &str) -> String {
        let path = self
            .path
            .to_str()
            .expect("Non-UTF8 paths are not supported!");
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, span.range()))
            .with_code(code)
            .with_message(message)
            .with_label(
                Label::new((path, span.range()))
                    .with_message(label)
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
