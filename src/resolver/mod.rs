mod error;

pub use error::{ResolutionError, ResolutionErrorKind};

use crate::parser::ast::{Expr, FunctionDecl, Ident, Program, Stmt};
use compact_str::CompactString;
use std::collections::HashMap;

/// Lexical distance per variable-reference site. A site with no entry is a
/// global reference and is looked up by name in the outermost frame.
pub type ResolutionMap = HashMap<Ident, usize>;

/// A program together with its resolved variable distances, ready to run.
#[derive(Debug, Clone)]
pub struct ResolvedProgram {
    pub program: Program,
    pub resolution: ResolutionMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Declared,
    Defined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionContext {
    None,
    Function,
}

/// Static pass over the AST. Walks every scope the evaluator will create and
/// records, per variable reference, how many frames up its declaration lives.
/// Errors aggregate; the walk keeps going after each one.
pub struct Resolver {
    scopes: Vec<HashMap<CompactString, Binding>>,
    resolution: ResolutionMap,
    errors: Vec<ResolutionError>,
    context: FunctionContext,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            resolution: ResolutionMap::new(),
            errors: Vec::new(),
            context: FunctionContext::None,
        }
    }

    pub fn resolve(mut self, program: Program) -> Result<ResolvedProgram, Vec<ResolutionError>> {
        for statement in &program {
            self.resolve_statement(statement);
        }
        if self.errors.is_empty() {
            Ok(ResolvedProgram {
                program,
                resolution: self.resolution,
            })
        } else {
            Err(self.errors)
        }
    }

    fn resolve_statement(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expression(expr),
            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expression(initializer);
                }
                self.define(name);
            }
            Stmt::Block(statements) => {
                self.enter_scope();
                for statement in statements {
                    self.resolve_statement(statement);
                }
                self.exit_scope();
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expression(condition);
                self.resolve_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_statement(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expression(condition);
                self.resolve_statement(body);
            }
            Stmt::Function(decl) => {
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl);
            }
            Stmt::Return { span, value } => {
                if matches!(self.context, FunctionContext::None) {
                    self.errors.push(ResolutionError {
                        kind: ResolutionErrorKind::TopLevelReturn,
                        span: *span,
                    });
                }
                if let Some(value) = value {
                    self.resolve_expression(value);
                }
            }
        }
    }

    fn resolve_function(&mut self, decl: &FunctionDecl) {
        let enclosing = std::mem::replace(&mut self.context, FunctionContext::Function);
        self.enter_scope();
        for parameter in &decl.parameters {
            self.declare(parameter);
            self.define(parameter);
        }
        for statement in &decl.body {
            self.resolve_statement(statement);
        }
        self.exit_scope();
        self.context = enclosing;
    }

    fn resolve_expression(&mut self, expression: &Expr) {
        match expression {
            Expr::Literal(_) => {}
            Expr::Variable(name) => {
                let mid_initializer = self
                    .scopes
                    .last()
                    .is_some_and(|scope| scope.get(&name.name) == Some(&Binding::Declared));
                if mid_initializer {
                    self.errors.push(ResolutionError {
                        kind: ResolutionErrorKind::SelfReferentialInitializer,
                        span: name.span,
                    });
                }
                self.resolve_local(name);
            }
            Expr::Assign { name, value } => {
                self.resolve_expression(value);
                self.resolve_local(name);
            }
            Expr::Unary { operand, .. } => self.resolve_expression(operand),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expression(left);
                self.resolve_expression(right);
            }
            Expr::Grouping(inner) => self.resolve_expression(inner),
            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expression(callee);
                for argument in arguments {
                    self.resolve_expression(argument);
                }
            }
        }
    }

    /// Innermost-outward search. The first scope holding the name wins and
    /// the number of scopes skipped over is the recorded distance.
    fn resolve_local(&mut self, name: &Ident) {
        for (distance, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.name) {
                self.resolution.insert(name.clone(), distance);
                return;
            }
        }
    }

    fn declare(&mut self, name: &Ident) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.name.clone(), Binding::Declared);
        }
    }

    fn define(&mut self, name: &Ident) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.name.clone(), Binding::Defined);
        }
    }

    fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn exit_scope(&mut self) {
        self.scopes.pop();
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
