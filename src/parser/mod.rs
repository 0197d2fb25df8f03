pub mod ast;
mod error;
pub mod formatter;

pub use error::{ParseError, ParseErrorKind};

use ast::{
    BinaryOp, Expr, FunctionDecl, Ident, Literal, LogicalOp, Program, Stmt, UnaryOp,
};
use crate::lexer::{Span, Token, TokenKind};
use compact_str::CompactString;

const MAX_PARAMETERS: usize = 255;

/// Recursive-descent parser over an eagerly scanned token stream. The stream
/// must be terminated by an EOF token, as produced by [`crate::lexer::Lexer::scan`].
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    current: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            current: 0,
        }
    }

    /// Parses the whole program, stopping at the first syntax error.
    pub fn parse(mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.declaration()?);
        }
        Ok(Program::new(statements))
    }

    // Declarations and statements

    fn declaration(&mut self) -> Result<Stmt, ParseError> {
        if self.eat_if(TokenKind::KeywordFun) {
            self.function_declaration()
        } else if self.eat_if(TokenKind::KeywordVar) {
            self.var_declaration()
        } else {
            self.statement()
        }
    }

    fn function_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect_ident()?;
        self.expect(TokenKind::LeftParenthesis)?;
        let mut parameters = Vec::new();
        if !self.check(TokenKind::RightParenthesis) {
            loop {
                if parameters.len() >= MAX_PARAMETERS {
                    return Err(ParseError {
                        kind: ParseErrorKind::TooManyParameters,
                        span: self.peek().span,
                    });
                }
                parameters.push(self.expect_ident()?);
                if !self.eat_if(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParenthesis)?;
        self.expect(TokenKind::LeftBrace)?;
        let body = self.block_statements()?;
        Ok(Stmt::Function(FunctionDecl {
            name,
            parameters,
            body,
        }))
    }

    fn var_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect_ident()?;
        let initializer = if self.eat_if(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        if self.eat_if(TokenKind::KeywordPrint) {
            self.print_statement()
        } else if self.eat_if(TokenKind::LeftBrace) {
            Ok(Stmt::Block(self.block_statements()?))
        } else if self.eat_if(TokenKind::KeywordIf) {
            self.if_statement()
        } else if self.eat_if(TokenKind::KeywordWhile) {
            self.while_statement()
        } else if self.eat_if(TokenKind::KeywordFor) {
            self.for_statement()
        } else if self.check(TokenKind::KeywordReturn) {
            self.return_statement()
        } else {
            self.expression_statement()
        }
    }

    fn print_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Print(expr))
    }

    fn block_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(statements)
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::LeftParenthesis)?;
        let condition = self.expression()?;
        self.expect(TokenKind::RightParenthesis)?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.eat_if(TokenKind::KeywordElse) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::LeftParenthesis)?;
        let condition = self.expression()?;
        self.expect(TokenKind::RightParenthesis)?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { condition, body })
    }

    /// `for` is sugar: the loop becomes `{ init; while (cond) { body; incr; } }`.
    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::LeftParenthesis)?;
        let initializer = if self.eat_if(TokenKind::Semicolon) {
            None
        } else if self.eat_if(TokenKind::KeywordVar) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };
        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::Semicolon)?;
        let increment = if self.check(TokenKind::RightParenthesis) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::RightParenthesis)?;

        let mut body = self.statement()?;
        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }
        let condition = condition.unwrap_or(Expr::Literal(Literal::Bool(true)));
        body = Stmt::While {
            condition,
            body: Box::new(body),
        };
        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }
        Ok(body)
    }

    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance();
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return {
            span: keyword.span,
            value,
        })
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Expression(expr))
    }

    // Expressions, precedence low to high

    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.logic_or()?;
        if self.check(TokenKind::Equal) {
            let equals = self.advance();
            let value = self.assignment()?;
            return match expr {
                Expr::Variable(name) => Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                }),
                _ => Err(ParseError {
                    kind: ParseErrorKind::InvalidAssignmentTarget,
                    span: equals.span,
                }),
            };
        }
        Ok(expr)
    }

    fn logic_or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.logic_and()?;
        while self.eat_if(TokenKind::KeywordOr) {
            let right = self.logic_and()?;
            expr = Expr::Logical {
                operator: LogicalOp::Or,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn logic_and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.equality()?;
        while self.eat_if(TokenKind::KeywordAnd) {
            let right = self.equality()?;
            expr = Expr::Logical {
                operator: LogicalOp::And,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.comparison()?;
        loop {
            let operator = match self.peek().kind {
                TokenKind::BangEqual => BinaryOp::NotEquals,
                TokenKind::EqualEqual => BinaryOp::Equals,
                _ => break,
            };
            let token = self.advance();
            let right = self.comparison()?;
            expr = binary(operator, token.span, expr, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.term()?;
        loop {
            let operator = match self.peek().kind {
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
                TokenKind::Less => BinaryOp::Less,
                TokenKind::LessEqual => BinaryOp::LessEqual,
                _ => break,
            };
            let token = self.advance();
            let right = self.term()?;
            expr = binary(operator, token.span, expr, right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.factor()?;
        loop {
            let operator = match self.peek().kind {
                TokenKind::Minus => BinaryOp::Subtract,
                TokenKind::Plus => BinaryOp::Add,
                _ => break,
            };
            let token = self.advance();
            let right = self.factor()?;
            expr = binary(operator, token.span, expr, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.unary()?;
        loop {
            let operator = match self.peek().kind {
                TokenKind::Slash => BinaryOp::Divide,
                TokenKind::Star => BinaryOp::Multiply,
                _ => break,
            };
            let token = self.advance();
            let right = self.unary()?;
            expr = binary(operator, token.span, expr, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let operator = match self.peek().kind {
            TokenKind::Bang => Some(UnaryOp::Bang),
            TokenKind::Minus => Some(UnaryOp::Minus),
            _ => None,
        };
        if let Some(operator) = operator {
            let token = self.advance();
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                operator,
                span: token.span,
                operand: Box::new(operand),
            });
        }
        self.call()
    }

    fn call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        while self.eat_if(TokenKind::LeftParenthesis) {
            let mut arguments = Vec::new();
            if !self.check(TokenKind::RightParenthesis) {
                loop {
                    if arguments.len() >= MAX_PARAMETERS {
                        return Err(ParseError {
                            kind: ParseErrorKind::TooManyArguments,
                            span: self.peek().span,
                        });
                    }
                    arguments.push(self.expression()?);
                    if !self.eat_if(TokenKind::Comma) {
                        break;
                    }
                }
            }
            let paren = self.expect(TokenKind::RightParenthesis)?;
            expr = Expr::Call {
                callee: Box::new(expr),
                span: paren.span,
                arguments,
            };
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number => {
                let value: f64 = self
                    .lexeme(&token)
                    .parse()
                    .expect("Numeric literals are guaranteed to be parseable into f64.");
                Ok(Expr::Literal(Literal::Number(value)))
            }
            TokenKind::String => {
                let lexeme = self.lexeme(&token);
                let value = CompactString::from(&lexeme[1..lexeme.len() - 1]);
                Ok(Expr::Literal(Literal::String(value)))
            }
            TokenKind::KeywordTrue => Ok(Expr::Literal(Literal::Bool(true))),
            TokenKind::KeywordFalse => Ok(Expr::Literal(Literal::Bool(false))),
            TokenKind::KeywordNil => Ok(Expr::Literal(Literal::Nil)),
            TokenKind::Identifier => Ok(Expr::Variable(self.ident(&token))),
            TokenKind::LeftParenthesis => {
                let expr = self.expression()?;
                self.expect(TokenKind::RightParenthesis)?;
                Ok(Expr::Grouping(Box::new(expr)))
            }
            _ => Err(ParseError {
                kind: ParseErrorKind::ExpectedExpression { actual: token.kind },
                span: token.span,
            }),
        }
    }

    // Token stream helpers

    fn peek(&self) -> Token {
        self.tokens[self.current]
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn eat_if(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let token = self.peek();
        if token.kind == expected {
            return Ok(self.advance());
        }
        let kind = if matches!(token.kind, TokenKind::Eof) {
            ParseErrorKind::UnexpectedEof { expected }
        } else {
            ParseErrorKind::UnexpectedToken {
                expected,
                actual: token.kind,
            }
        };
        Err(ParseError {
            kind,
            span: token.span,
        })
    }

    fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(self.ident(&token))
    }

    fn ident(&self, token: &Token) -> Ident {
        Ident {
            name: CompactString::from(self.lexeme(token)),
            span: token.span,
        }
    }

    fn lexeme(&self, token: &Token) -> &'src str {
        &self.source[token.span.range()]
    }
}

fn binary(operator: BinaryOp, span: Span, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        operator,
        span,
        left: Box::new(left),
        right: Box::new(right),
    }
}
