use ocelox::lexer::{Lexer, TokenKind};
use ocelox::parser::formatter::{AstFormatter, SExpressionFormatter};
use ocelox::parser::{Parser, ParseErrorKind};

fn parse_clean(input: &str, test_name: &str) -> Result<ocelox::parser::ast::Program, ocelox::parser::ParseError> {
    let (tokens, errors) = Lexer::new(input).scan();
    assert!(
        errors.is_empty(),
        "Unexpected lexical errors in the test {test_name}: {errors:?}"
    );
    Parser::new(input, tokens).parse()
}

fn check(input: &str, expected: &str, test_name: &str) {
    let program = match parse_clean(input, test_name) {
        Ok(program) => program,
        Err(error) => panic!("Failed to parse in the test {test_name}: {error}"),
    };
    let actual = SExpressionFormatter.format_program(&program);
    assert_eq!(actual, expected, "Failed the test {test_name}");
}

fn check_error(input: &str, expected: ParseErrorKind, test_name: &str) {
    match parse_clean(input, test_name) {
        Ok(_) => panic!("Expected the test {test_name} to fail to parse"),
        Err(error) => assert_eq!(error.kind, expected, "Failed the test {test_name}"),
    }
}

#[test]
fn smoke_test() {
    check("", "", "smoke");
}

#[test]
fn arithmetic_precedence() {
    check(
        "3 * 3 - 5 / 3 + 4 * (2 + 4);",
        "(expr (+ (- (* 3.0 3.0) (/ 5.0 3.0)) (* 4.0 (group (+ 2.0 4.0)))))",
        "arithmetic_precedence",
    );
}

#[test]
fn unary_operators_nest() {
    check("!!-1;", "(expr (! (! (- 1.0))))", "unary_nesting");
}

#[test]
fn comparison_binds_tighter_than_equality() {
    check(
        "1 < 2 == 3 >= 4;",
        "(expr (== (< 1.0 2.0) (>= 3.0 4.0)))",
        "comparison_vs_equality",
    );
}

#[test]
fn logical_operators_nest_or_over_and() {
    check(
        "1 or 2 and 3;",
        "(expr (or 1.0 (and 2.0 3.0)))",
        "or_over_and",
    );
}

#[test]
fn assignment_is_right_associative() {
    check("a = b = 3;", "(expr (= a (= b 3.0)))", "assignment_chain");
}

#[test]
fn calls_chain_left_to_right() {
    check(
        "f(1)(2, x);",
        "(expr (call (call f 1.0) 2.0 x))",
        "call_chain",
    );
}

#[test]
fn literal_atoms() {
    check(
        "print \"hi\";\nprint true == false;\nprint nil;",
        "(print hi)\n(print (== true false))\n(print nil)",
        "literals",
    );
}

#[test]
fn variable_declarations() {
    check("var x;", "(var x)", "var_without_initializer");
    check("var x = 1 + 2;", "(var x (+ 1.0 2.0))", "var_with_initializer");
}

#[test]
fn blocks_nest() {
    check(
        "{ var x = 1; { print x; } }",
        "(block (var x 1.0) (block (print x)))",
        "nested_blocks",
    );
}

#[test]
fn dangling_else_binds_to_nearest_if() {
    check(
        "if (1) if (2) print 1; else print 2;",
        "(if 1.0 (if 2.0 (print 1.0) (print 2.0)))",
        "dangling_else",
    );
}

#[test]
fn while_statement() {
    check(
        "while (x < 3) { x = x + 1; }",
        "(while (< x 3.0) (block (expr (= x (+ x 1.0)))))",
        "while",
    );
}

#[test]
fn for_desugars_to_while() {
    check(
        "for (var i = 0; i < 3; i = i + 1) print i;",
        "(block (var i 0.0) (while (< i 3.0) (block (print i) (expr (= i (+ i 1.0))))))",
        "full_for",
    );
}

#[test]
fn for_clauses_are_optional() {
    check("for (;;) print 1;", "(while true (print 1.0))", "bare_for");
    check(
        "for (; x < 2;) print x;",
        "(while (< x 2.0) (print x))",
        "condition_only_for",
    );
    check(
        "for (x = 0;; x = x + 1) print x;",
        "(block (expr (= x 0.0)) (while true (block (print x) (expr (= x (+ x 1.0))))))",
        "expression_initializer_for",
    );
}

#[test]
fn function_declarations() {
    check(
        "fun add(a, b) { return a + b; }",
        "(fun add (a b) (return (+ a b)))",
        "function_with_return",
    );
    check("fun noop() {}", "(fun noop ())", "empty_function");
    check(
        "fun f() { return; }",
        "(fun f () (return))",
        "bare_return",
    );
}

#[test]
fn formatting_is_deterministic() {
    let program = parse_clean(
        "fun f(a) { for (var i = 0; i < a; i = i + 1) print i or a; }",
        "determinism",
    )
    .expect("Test program parses cleanly");
    let first = SExpressionFormatter.format_program(&program);
    let second = SExpressionFormatter.format_program(&program);
    assert_eq!(first, second, "Formatting must be a pure function of the tree");
}

#[test]
fn invalid_assignment_targets() {
    check_error(
        "(a) = 3;",
        ParseErrorKind::InvalidAssignmentTarget,
        "grouped_target",
    );
    check_error(
        "a + b = 3;",
        ParseErrorKind::InvalidAssignmentTarget,
        "binary_target",
    );
    check_error(
        "1 = 2;",
        ParseErrorKind::InvalidAssignmentTarget,
        "literal_target",
    );
}

#[test]
fn missing_expression() {
    check_error(
        "1 +;",
        ParseErrorKind::ExpectedExpression {
            actual: TokenKind::Semicolon,
        },
        "operand_missing",
    );
}

#[test]
fn missing_semicolon_at_eof() {
    check_error(
        "print 1",
        ParseErrorKind::UnexpectedEof {
            expected: TokenKind::Semicolon,
        },
        "unterminated_statement",
    );
}

#[test]
fn unclosed_block() {
    check_error(
        "{ print 1;",
        ParseErrorKind::UnexpectedEof {
            expected: TokenKind::RightBrace,
        },
        "unclosed_block",
    );
}

#[test]
fn declaration_requires_a_name() {
    check_error(
        "var 1 = 2;",
        ParseErrorKind::UnexpectedToken {
            expected: TokenKind::Identifier,
            actual: TokenKind::Number,
        },
        "numeric_var_name",
    );
}

#[test]
fn reserved_words_do_not_start_expressions() {
    check_error(
        "class Foo {}",
        ParseErrorKind::ExpectedExpression {
            actual: TokenKind::KeywordClass,
        },
        "class_is_reserved",
    );
    check_error(
        "print this;",
        ParseErrorKind::ExpectedExpression {
            actual: TokenKind::KeywordThis,
        },
        "this_is_reserved",
    );
}

#[test]
fn parameter_and_argument_limits() {
    let parameters = (0..256).map(|i| format!("p{i}")).collect::<Vec<_>>().join(", ");
    check_error(
        &format!("fun f({parameters}) {{}}"),
        ParseErrorKind::TooManyParameters,
        "too_many_parameters",
    );

    let arguments = (0..256).map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
    check_error(
        &format!("f({arguments});"),
        ParseErrorKind::TooManyArguments,
        "too_many_arguments",
    );

    // One short of the limit is still fine.
    let parameters = (0..255).map(|i| format!("p{i}")).collect::<Vec<_>>().join(", ");
    let program = parse_clean(&format!("fun f({parameters}) {{}}"), "at_the_limit");
    assert!(program.is_ok(), "255 parameters must parse");
}
