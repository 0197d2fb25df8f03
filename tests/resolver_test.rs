use ocelox::lexer::Lexer;
use ocelox::parser::Parser;
use ocelox::resolver::{ResolutionError, ResolutionErrorKind, ResolvedProgram, Resolver};

fn resolve(input: &str, test_name: &str) -> Result<ResolvedProgram, Vec<ResolutionError>> {
    let (tokens, errors) = Lexer::new(input).scan();
    assert!(
        errors.is_empty(),
        "Unexpected lexical errors in the test {test_name}: {errors:?}"
    );
    let program = Parser::new(input, tokens)
        .parse()
        .expect("Resolver test programs parse cleanly");
    Resolver::new().resolve(program)
}

/// Compares the resolution table as a multiset of `(name, distance)` pairs.
/// Each pair is one reference site, so a name read three times shows up three
/// times.
fn check(input: &str, expected: &[(&str, usize)], test_name: &str) {
    let resolved = match resolve(input, test_name) {
        Ok(resolved) => resolved,
        Err(errors) => panic!("Failed to resolve in the test {test_name}: {errors:?}"),
    };
    let mut actual: Vec<(String, usize)> = resolved
        .resolution
        .iter()
        .map(|(ident, distance)| (ident.name.to_string(), *distance))
        .collect();
    actual.sort();
    let mut expected: Vec<(String, usize)> = expected
        .iter()
        .map(|(name, distance)| (name.to_string(), *distance))
        .collect();
    expected.sort();
    assert_eq!(actual, expected, "Failed the test {test_name}");
}

fn check_errors(input: &str, expected: &[ResolutionErrorKind], test_name: &str) {
    match resolve(input, test_name) {
        Ok(_) => panic!("Expected the test {test_name} to fail to resolve"),
        Err(errors) => {
            let actual: Vec<ResolutionErrorKind> =
                errors.iter().map(|error| error.kind.clone()).collect();
            assert_eq!(actual, expected, "Failed the test {test_name}");
        }
    }
}

#[test]
fn smoke_test() {
    check("", &[], "smoke");
}

#[test]
fn globals_get_no_entry() {
    check("var a = 1;\nprint a;\na = 2;", &[], "globals_unresolved");
}

#[test]
fn block_locals_resolve_at_distance_zero() {
    check("{ var a = 1; print a; }", &[("a", 0)], "block_local");
}

#[test]
fn references_skip_to_the_innermost_declaration() {
    check(
        "{ var a = 1; { var a = 2; print a; } print a; }",
        &[("a", 0), ("a", 0)],
        "shadowing",
    );
    check(
        "{ var a = 1; { print a; } }",
        &[("a", 1)],
        "outer_reference",
    );
}

#[test]
fn parameters_live_in_the_function_scope() {
    check("fun echo(x) { print x; }", &[("x", 0)], "parameter_read");
    check(
        "fun echo(x) { { print x; } }",
        &[("x", 1)],
        "parameter_read_through_block",
    );
}

#[test]
fn closures_count_intervening_scopes() {
    check(
        "fun makeCounter() {
           var i = 0;
           fun count() {
             i = i + 1;
             print i;
           }
           return count;
         }",
        &[("count", 0), ("i", 1), ("i", 1), ("i", 1)],
        "counter_closure",
    );
}

#[test]
fn local_functions_can_recurse() {
    check("{ fun f() { f(); } }", &[("f", 1)], "local_recursion");
}

#[test]
fn assignment_targets_resolve_like_reads() {
    check(
        "{ var a = 1; a = a + 1; }",
        &[("a", 0), ("a", 0)],
        "assignment_resolution",
    );
}

#[test]
fn self_referential_initializer_is_an_error() {
    check_errors(
        "var a = 1;\n{\n  var a = a;\n}",
        &[ResolutionErrorKind::SelfReferentialInitializer],
        "shadow_reads_itself",
    );
}

#[test]
fn top_level_self_reference_is_not_checked() {
    // Globals never enter the scope stack, so this resolves (and later fails
    // at runtime instead).
    check("var a = a;", &[], "global_self_reference");
}

#[test]
fn return_outside_a_function_is_an_error() {
    check_errors(
        "return 1;",
        &[ResolutionErrorKind::TopLevelReturn],
        "top_level_return",
    );
}

#[test]
fn returns_inside_functions_are_fine() {
    check("fun f() { return 1; }", &[], "function_return");
    // Declarations alone add no reference sites, so the table stays empty.
    check(
        "fun f() { fun g() { return 1; } return 2; }",
        &[],
        "nested_function_returns",
    );
}

#[test]
fn errors_aggregate_across_the_whole_program() {
    check_errors(
        "return 1;\nreturn 2;",
        &[
            ResolutionErrorKind::TopLevelReturn,
            ResolutionErrorKind::TopLevelReturn,
        ],
        "two_top_level_returns",
    );
    check_errors(
        "{\n  var a = 1;\n  {\n    var a = a;\n  }\n}\nreturn 3;",
        &[
            ResolutionErrorKind::SelfReferentialInitializer,
            ResolutionErrorKind::TopLevelReturn,
        ],
        "mixed_errors",
    );
}
