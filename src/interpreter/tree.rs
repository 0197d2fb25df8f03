use super::environment::Environment;
use super::error::{RuntimeError, RuntimeErrorKind};
use super::value::{Function, Value};
use super::{ProgramState, SystemContext};
use crate::lexer::Span;
use crate::parser::ast::{BinaryOp, Expr, FunctionDecl, Ident, Literal, LogicalOp, Stmt, UnaryOp};
use crate::resolver::ResolvedProgram;
use std::sync::Arc;

pub struct TreeWalkInterpreter<C: SystemContext> {
    globals: Environment,
    context: C,
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn new(context: C) -> Self {
        Self {
            globals: Environment::new(),
            context,
        }
    }

    /// Runs the program to completion, handing the context back so callers
    /// can recover buffered output. Top-level statements execute directly in
    /// the global frame.
    pub fn run(mut self, program: &ResolvedProgram) -> Result<C, RuntimeError> {
        let globals = self.globals.clone();
        for statement in &program.program {
            self.interpret_statement(program, &globals, statement)?;
        }
        Ok(self.context)
    }
}

// Statement interpreter
impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    fn interpret_statement(
        &mut self,
        program: &ResolvedProgram,
        environment: &Environment,
        statement: &Stmt,
    ) -> Result<ProgramState, RuntimeError> {
        match statement {
            Stmt::Expression(expr) => {
                self.interpret_expression_statement(program, environment, expr)
            }
            Stmt::Print(expr) => self.interpret_print_statement(program, environment, expr),
            Stmt::Var { name, initializer } => self.interpret_variable_declaration(
                program,
                environment,
                name,
                initializer.as_ref(),
            ),
            Stmt::Block(body) => self.interpret_block_statement(program, environment, body),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => self.interpret_if_statement(
                program,
                environment,
                condition,
                then_branch,
                else_branch.as_deref(),
            ),
            Stmt::While { condition, body } => {
                self.interpret_while_statement(program, environment, condition, body)
            }
            Stmt::Function(decl) => self.interpret_function_declaration(environment, decl),
            Stmt::Return { value, .. } => {
                self.interpret_return_statement(program, environment, value.as_ref())
            }
        }
    }

    fn interpret_expression_statement(
        &mut self,
        program: &ResolvedProgram,
        environment: &Environment,
        expr: &Expr,
    ) -> Result<ProgramState, RuntimeError> {
        let _ = self.evaluate(program, environment, expr)?;
        Ok(ProgramState::Run)
    }

    fn interpret_print_statement(
        &mut self,
        program: &ResolvedProgram,
        environment: &Environment,
        expr: &Expr,
    ) -> Result<ProgramState, RuntimeError> {
        let result = self.evaluate(program, environment, expr)?;
        self.context.writeln(&format!("{result}"));
        Ok(ProgramState::Run)
    }

    fn interpret_variable_declaration(
        &mut self,
        program: &ResolvedProgram,
        environment: &Environment,
        name: &Ident,
        initializer: Option<&Expr>,
    ) -> Result<ProgramState, RuntimeError> {
        let initial = if let Some(expr) = initializer {
            self.evaluate(program, environment, expr)?
        } else {
            Value::Nil
        };
        environment.define(name.name.clone(), initial);
        Ok(ProgramState::Run)
    }

    fn interpret_function_declaration(
        &mut self,
        environment: &Environment,
        decl: &FunctionDecl,
    ) -> Result<ProgramState, RuntimeError> {
        // The closure aliases the declaring frame itself, so bindings added
        // to that frame after this declaration are still visible on call.
        let function = Function {
            name: decl.name.clone(),
            parameters: decl.parameters.clone(),
            body: decl.body.clone(),
            closure: environment.clone(),
        };
        environment.define(decl.name.name.clone(), Value::Function(Arc::new(function)));
        Ok(ProgramState::Run)
    }

    fn interpret_block_statement(
        &mut self,
        program: &ResolvedProgram,
        environment: &Environment,
        body: &[Stmt],
    ) -> Result<ProgramState, RuntimeError> {
        let environment = environment.new_scope();
        let mut state = ProgramState::Run;
        for statement in body {
            match self.interpret_statement(program, &environment, statement)? {
                ProgramState::Run => {}
                s => {
                    state = s;
                    break;
                }
            }
        }
        Ok(state)
    }

    fn interpret_if_statement(
        &mut self,
        program: &ResolvedProgram,
        environment: &Environment,
        condition: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
    ) -> Result<ProgramState, RuntimeError> {
        let mut state = ProgramState::Run;
        if self
            .evaluate(program, environment, condition)?
            .is_truthy()
        {
            state = self.interpret_statement(program, environment, then_branch)?;
        } else if let Some(else_branch) = else_branch {
            state = self.interpret_statement(program, environment, else_branch)?;
        }
        Ok(state)
    }

    fn interpret_while_statement(
        &mut self,
        program: &ResolvedProgram,
        environment: &Environment,
        condition: &Expr,
        body: &Stmt,
    ) -> Result<ProgramState, RuntimeError> {
        while self
            .evaluate(program, environment, condition)?
            .is_truthy()
        {
            match self.interpret_statement(program, environment, body)? {
                ProgramState::Run => {}
                state => {
                    return Ok(state);
                }
            }
        }
        Ok(ProgramState::Run)
    }

    fn interpret_return_statement(
        &mut self,
        program: &ResolvedProgram,
        environment: &Environment,
        value: Option<&Expr>,
    ) -> Result<ProgramState, RuntimeError> {
        let value = if let Some(expr) = value {
            self.evaluate(program, environment, expr)?
        } else {
            Value::Nil
        };
        Ok(ProgramState::Return(value))
    }
}

// Expression evaluator
impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    fn evaluate(
        &mut self,
        program: &ResolvedProgram,
        environment: &Environment,
        expr: &Expr,
    ) -> Result<Value, RuntimeError> {
        let result = match expr {
            Expr::Literal(literal) => evaluate_literal(literal),
            Expr::Variable(name) => self.read_variable(program, environment, name)?,
            Expr::Assign { name, value } => {
                let value = self.evaluate(program, environment, value)?;
                self.write_variable(program, environment, name, value.clone())?;
                value
            }
            Expr::Unary {
                operator,
                span,
                operand,
            } => {
                let operand = self.evaluate(program, environment, operand)?;
                evaluate_unary(*operator, &operand)
                    .map_err(|kind| RuntimeError { kind, span: *span })?
            }
            Expr::Binary {
                operator,
                span,
                left,
                right,
            } => {
                let lhs = self.evaluate(program, environment, left)?;
                let rhs = self.evaluate(program, environment, right)?;
                evaluate_binary(*operator, &lhs, &rhs)
                    .map_err(|kind| RuntimeError { kind, span: *span })?
            }
            Expr::Logical {
                operator,
                left,
                right,
            } => self.evaluate_logical(program, environment, *operator, left, right)?,
            Expr::Grouping(inner) => self.evaluate(program, environment, inner)?,
            Expr::Call {
                callee,
                span,
                arguments,
            } => self.evaluate_call(program, environment, callee, *span, arguments)?,
        };
        Ok(result)
    }

    fn evaluate_logical(
        &mut self,
        program: &ResolvedProgram,
        environment: &Environment,
        operator: LogicalOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<Value, RuntimeError> {
        // Short-circuiting yields the deciding operand itself, untouched.
        let lhs = self.evaluate(program, environment, left)?;
        match operator {
            LogicalOp::And if !lhs.is_truthy() => Ok(lhs),
            LogicalOp::Or if lhs.is_truthy() => Ok(lhs),
            _ => self.evaluate(program, environment, right),
        }
    }

    fn evaluate_call(
        &mut self,
        program: &ResolvedProgram,
        environment: &Environment,
        callee: &Expr,
        span: Span,
        arguments: &[Expr],
    ) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(program, environment, callee)?;
        let function = match callee {
            Value::Function(function) => function,
            v => {
                return Err(RuntimeError {
                    kind: RuntimeErrorKind::InvalidCallee(v),
                    span,
                });
            }
        };

        // Arity is checked before any argument evaluates.
        if arguments.len() != function.arity() {
            return Err(RuntimeError {
                kind: RuntimeErrorKind::InvalidArgumentCount {
                    expected: function.arity(),
                    actual: arguments.len(),
                },
                span,
            });
        }

        // Arguments evaluate in the caller's environment and bind into the
        // call frame, a fresh child of the captured closure frame.
        let frame = function.closure.new_scope();
        for (parameter, argument) in function.parameters.iter().zip(arguments.iter()) {
            let argument = self.evaluate(program, environment, argument)?;
            frame.define(parameter.name.clone(), argument);
        }

        let mut result = Value::Nil;
        for statement in &function.body {
            match self.interpret_statement(program, &frame, statement)? {
                ProgramState::Run => {}
                ProgramState::Return(value) => {
                    result = value;
                    break;
                }
            }
        }
        Ok(result)
    }
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    fn read_variable(
        &self,
        program: &ResolvedProgram,
        environment: &Environment,
        ident: &Ident,
    ) -> Result<Value, RuntimeError> {
        match program.resolution.get(ident) {
            Some(distance) => {
                environment
                    .get_at(&ident.name, *distance)
                    .ok_or(RuntimeError {
                        kind: RuntimeErrorKind::InvalidDistance(ident.name.clone()),
                        span: ident.span,
                    })
            }
            None => self.globals.get(&ident.name).ok_or(RuntimeError {
                kind: RuntimeErrorKind::UndefinedVariable(ident.name.clone()),
                span: ident.span,
            }),
        }
    }

    fn write_variable(
        &self,
        program: &ResolvedProgram,
        environment: &Environment,
        ident: &Ident,
        value: Value,
    ) -> Result<(), RuntimeError> {
        match program.resolution.get(ident) {
            Some(distance) => environment
                .assign_at(ident.name.clone(), value, *distance)
                .ok_or(RuntimeError {
                    kind: RuntimeErrorKind::InvalidDistance(ident.name.clone()),
                    span: ident.span,
                }),
            None => self
                .globals
                .assign(&ident.name, value)
                .map_err(|_| RuntimeError {
                    kind: RuntimeErrorKind::UndefinedVariable(ident.name.clone()),
                    span: ident.span,
                }),
        }
    }
}

fn evaluate_literal(literal: &Literal) -> Value {
    match literal {
        Literal::Number(v) => Value::Number(*v),
        Literal::String(v) => Value::String(v.clone()),
        Literal::Bool(v) => Value::Bool(*v),
        Literal::Nil => Value::Nil,
    }
}

fn evaluate_unary(operator: UnaryOp, rhs: &Value) -> Result<Value, RuntimeErrorKind> {
    match operator {
        UnaryOp::Bang => Ok(Value::Bool(rhs.logical_not())),
        UnaryOp::Minus => rhs.numeric_negate(),
    }
}

fn evaluate_binary(operator: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeErrorKind> {
    match operator {
        BinaryOp::Add => lhs.add(rhs),
        BinaryOp::Subtract => lhs.subtract(rhs),
        BinaryOp::Multiply => lhs.multiply(rhs),
        BinaryOp::Divide => lhs.divide(rhs),
        BinaryOp::Less => lhs.less_than(rhs),
        BinaryOp::LessEqual => lhs.less_than_or_equal(rhs),
        BinaryOp::Greater => lhs.greater_than(rhs),
        BinaryOp::GreaterEqual => lhs.greater_than_or_equal(rhs),
        BinaryOp::Equals => Ok(Value::Bool(lhs.is_equal(rhs))),
        BinaryOp::NotEquals => Ok(Value::Bool(lhs.is_not_equal(rhs))),
    }
}
