use super::ast::{Expr, Literal, Program, Stmt};
use std::fmt::Write;

const WRITE_FMT_MSG: &str =
    "Encountered an error while attempting to write format string to buffer.";

/// Interface for rendering parsed programs as text.
pub trait AstFormatter {
    fn format_program(&self, program: &Program) -> String;
    fn format_expression(&self, expression: &Expr) -> String;
}

pub struct DebugFormatter;

impl AstFormatter for DebugFormatter {
    fn format_program(&self, program: &Program) -> String {
        format!("{program:#?}")
    }

    fn format_expression(&self, expression: &Expr) -> String {
        format!("{expression:#?}")
    }
}

/// Canonical parenthesized form, one statement per line. The output is a pure
/// function of the tree, which makes it the fixture format of the parser
/// tests.
pub struct SExpressionFormatter;

impl AstFormatter for SExpressionFormatter {
    fn format_program(&self, program: &Program) -> String {
        let mut lines = Vec::with_capacity(program.len());
        for statement in program {
            let mut buffer = String::new();
            Self::format_statement_in_place(&mut buffer, statement);
            lines.push(buffer);
        }
        lines.join("\n")
    }

    fn format_expression(&self, expression: &Expr) -> String {
        let mut buffer = String::new();
        Self::format_expression_in_place(&mut buffer, expression);
        buffer
    }
}

impl SExpressionFormatter {
    fn format_statement_in_place(buffer: &mut String, statement: &Stmt) {
        match statement {
            Stmt::Expression(expr) => {
                buffer.push_str("(expr ");
                Self::format_expression_in_place(buffer, expr);
                buffer.push(')');
            }
            Stmt::Print(expr) => {
                buffer.push_str("(print ");
                Self::format_expression_in_place(buffer, expr);
                buffer.push(')');
            }
            Stmt::Var { name, initializer } => {
                write!(buffer, "(var {name}").expect(WRITE_FMT_MSG);
                if let Some(initializer) = initializer {
                    buffer.push(' ');
                    Self::format_expression_in_place(buffer, initializer);
                }
                buffer.push(')');
            }
            Stmt::Block(statements) => {
                buffer.push_str("(block");
                for statement in statements {
                    buffer.push(' ');
                    Self::format_statement_in_place(buffer, statement);
                }
                buffer.push(')');
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                buffer.push_str("(if ");
                Self::format_expression_in_place(buffer, condition);
                buffer.push(' ');
                Self::format_statement_in_place(buffer, then_branch);
                if let Some(else_branch) = else_branch {
                    buffer.push(' ');
                    Self::format_statement_in_place(buffer, else_branch);
                }
                buffer.push(')');
            }
            Stmt::While { condition, body } => {
                buffer.push_str("(while ");
                Self::format_expression_in_place(buffer, condition);
                buffer.push(' ');
                Self::format_statement_in_place(buffer, body);
                buffer.push(')');
            }
            Stmt::Function(decl) => {
                write!(buffer, "(fun {} (", decl.name).expect(WRITE_FMT_MSG);
                for (index, parameter) in decl.parameters.iter().enumerate() {
                    if index > 0 {
                        buffer.push(' ');
                    }
                    write!(buffer, "{parameter}").expect(WRITE_FMT_MSG);
                }
                buffer.push(')');
                for statement in &decl.body {
                    buffer.push(' ');
                    Self::format_statement_in_place(buffer, statement);
                }
                buffer.push(')');
            }
            Stmt::Return { value, .. } => {
                buffer.push_str("(return");
                if let Some(value) = value {
                    buffer.push(' ');
                    Self::format_expression_in_place(buffer, value);
                }
                buffer.push(')');
            }
        }
    }

    fn format_expression_in_place(buffer: &mut String, expression: &Expr) {
        match expression {
            Expr::Literal(literal) => Self::format_literal_in_place(buffer, literal),
            Expr::Variable(name) => write!(buffer, "{name}").expect(WRITE_FMT_MSG),
            Expr::Assign { name, value } => {
                write!(buffer, "(= {name} ").expect(WRITE_FMT_MSG);
                Self::format_expression_in_place(buffer, value);
                buffer.push(')');
            }
            Expr::Unary {
                operator, operand, ..
            } => {
                write!(buffer, "({operator} ").expect(WRITE_FMT_MSG);
                Self::format_expression_in_place(buffer, operand);
                buffer.push(')');
            }
            Expr::Binary {
                operator,
                left,
                right,
                ..
            } => {
                write!(buffer, "({operator} ").expect(WRITE_FMT_MSG);
                Self::format_expression_in_place(buffer, left);
                buffer.push(' ');
                Self::format_expression_in_place(buffer, right);
                buffer.push(')');
            }
            Expr::Logical {
                operator,
                left,
                right,
            } => {
                write!(buffer, "({operator} ").expect(WRITE_FMT_MSG);
                Self::format_expression_in_place(buffer, left);
                buffer.push(' ');
                Self::format_expression_in_place(buffer, right);
                buffer.push(')');
            }
            Expr::Grouping(inner) => {
                buffer.push_str("(group ");
                Self::format_expression_in_place(buffer, inner);
                buffer.push(')');
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                buffer.push_str("(call ");
                Self::format_expression_in_place(buffer, callee);
                for argument in arguments {
                    buffer.push(' ');
                    Self::format_expression_in_place(buffer, argument);
                }
                buffer.push(')');
            }
        }
    }

    fn format_literal_in_place(buffer: &mut String, literal: &Literal) {
        match literal {
            Literal::Number(value) => write!(buffer, "{value:?}").expect(WRITE_FMT_MSG),
            Literal::String(value) => write!(buffer, "{value}").expect(WRITE_FMT_MSG),
            Literal::Bool(value) => write!(buffer, "{value}").expect(WRITE_FMT_MSG),
            Literal::Nil => buffer.push_str("nil"),
        }
    }
}
