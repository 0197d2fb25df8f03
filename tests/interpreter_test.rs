use ocelox::interpreter::BufferedContext;

fn check_output(input: &str, expected: &str, test_name: &str) {
    let mut context = BufferedContext::new();
    let result = ocelox::run(input, &mut context);
    assert!(
        result.is_ok(),
        "Expected the test {test_name} to run cleanly: {:?}",
        result.err()
    );
    assert_eq!(context.into_data(), expected, "Failed the test {test_name}");
}

fn check_error(input: &str, expected: &str, test_name: &str) {
    check_error_with_output(input, "", expected, test_name);
}

fn check_error_with_output(input: &str, expected_output: &str, expected: &str, test_name: &str) {
    let mut context = BufferedContext::new();
    let result = ocelox::run(input, &mut context);
    match result {
        Ok(()) => panic!("Expected the test {test_name} to fail"),
        Err(diagnostics) => {
            assert_eq!(
                diagnostics.to_string(),
                expected,
                "Failed the test {test_name}"
            );
        }
    }
    assert_eq!(
        context.into_data(),
        expected_output,
        "Lost output in the test {test_name}"
    );
}

#[test]
fn smoke_test() {
    check_output("", "", "smoke");
}

// Expressions and printing

#[test]
fn arithmetic_respects_precedence() {
    check_output("print 1 + 2 * 3;", "7\n", "multiplication_first");
    check_output("print (1 + 2) * 3;", "9\n", "grouping_overrides");
    check_output("print 10 - 4 - 3;", "3\n", "subtraction_left_associative");
}

#[test]
fn numbers_print_without_integral_decimals() {
    check_output(
        "print 7.0;\nprint 2.5;\nprint 7 / 2;",
        "7\n2.5\n3.5\n",
        "number_display",
    );
}

#[test]
fn literals_print_themselves() {
    check_output(
        "print true;\nprint false;\nprint nil;\nprint \"text\";",
        "true\nfalse\nnil\ntext\n",
        "literal_display",
    );
}

#[test]
fn unary_operators() {
    check_output(
        "print -(-3);\nprint !nil;\nprint !0;",
        "3\ntrue\nfalse\n",
        "unary",
    );
}

#[test]
fn comparisons_produce_booleans() {
    check_output(
        "print 1 < 2;\nprint 2 <= 2;\nprint 3 > 4;\nprint 4 >= 4;",
        "true\ntrue\nfalse\ntrue\n",
        "comparisons",
    );
}

#[test]
fn equality_is_structural_per_type() {
    check_output(
        "print 1 == 1;\nprint \"a\" == \"a\";\nprint nil == nil;\nprint 1 == \"1\";\nprint nil == false;\nprint true != false;",
        "true\ntrue\ntrue\nfalse\nfalse\ntrue\n",
        "equality",
    );
}

#[test]
fn string_concatenation() {
    check_output("print \"foo\" + \"bar\";", "foobar\n", "string_pair");
}

#[test]
fn left_string_concatenation_stringifies_the_right_operand() {
    check_output("print \"a\" + 1;", "a1\n", "string_plus_number");
    check_output("print \"v=\" + nil;", "v=nil\n", "string_plus_nil");
    check_output("print \"b\" + true;", "btrue\n", "string_plus_bool");
}

#[test]
fn right_string_addition_is_not_coerced() {
    check_error(
        "print 1 + \"a\";",
        "[line 1] Operands must be numbers.",
        "number_plus_string",
    );
}

// Variables and scope

#[test]
fn declarations_default_to_nil() {
    check_output("var x;\nprint x;", "nil\n", "nil_default");
}

#[test]
fn assignment_yields_the_assigned_value() {
    check_output("var a = 1;\nprint a = 2;\nprint a;", "2\n2\n", "assignment_value");
}

#[test]
fn block_shadowing_restores_the_outer_binding() {
    check_output(
        "var a = 1;
         {
           var a = 2;
           print a;
         }
         print a;",
        "2\n1\n",
        "shadowing",
    );
}

#[test]
fn undefined_reads_and_writes_fail() {
    check_error("print x;", "[line 1] Undefined variable 'x'.", "undefined_read");
    check_error("x = 1;", "[line 1] Undefined variable 'x'.", "undefined_write");
}

#[test]
fn top_level_self_reference_fails_at_runtime() {
    // Resolution lets `var a = a;` through at the top level; the initializer
    // then reads the global before the definition exists.
    check_error(
        "var a = a;",
        "[line 1] Undefined variable 'a'.",
        "global_self_initializer",
    );
}

#[test]
fn parameters_shadow_globals() {
    check_output(
        "var x = \"global\";
         fun show(x) {
           print x;
         }
         show(\"param\");
         print x;",
        "param\nglobal\n",
        "parameter_shadowing",
    );
}

// Control flow

#[test]
fn truthiness_only_rejects_nil_and_false() {
    check_output(
        "if (0) print \"zero\";
         if (\"\") print \"empty\";
         if (nil) print \"nil\"; else print \"no nil\";
         if (false) print \"yes\"; else print \"no\";",
        "zero\nempty\nno nil\nno\n",
        "truthiness",
    );
}

#[test]
fn logical_operators_yield_the_deciding_operand() {
    check_output(
        "print nil or \"fallback\";\nprint 1 and 2;\nprint false or false;",
        "fallback\n2\nfalse\n",
        "logical_values",
    );
}

#[test]
fn logical_operators_short_circuit() {
    check_output(
        "var called = false;
         fun touch() {
           called = true;
           return true;
         }
         var ignored = false and touch();
         print called;
         ignored = true or touch();
         print called;
         ignored = true and touch();
         print called;",
        "false\nfalse\ntrue\n",
        "short_circuit",
    );
}

#[test]
fn while_loops_run_until_falsy() {
    check_output(
        "var i = 0;
         while (i < 3) {
           print i;
           i = i + 1;
         }",
        "0\n1\n2\n",
        "while_loop",
    );
}

#[test]
fn for_loops_behave_like_their_while_form() {
    check_output(
        "for (var i = 0; i < 3; i = i + 1) print i;",
        "0\n1\n2\n",
        "counting_for",
    );
    check_output(
        "var i = 0;\nfor (; i < 2;) { print i; i = i + 1; }",
        "0\n1\n",
        "condition_only_for",
    );
}

// Functions and closures

#[test]
fn functions_are_first_class_values() {
    check_output(
        "fun greet() {}
         print greet;
         var alias = greet;
         print alias == greet;
         fun other() {}
         print other == greet;",
        "<fn greet>\ntrue\nfalse\n",
        "function_values",
    );
}

#[test]
fn calls_return_nil_without_an_explicit_return() {
    check_output("fun noop() {}\nprint noop();", "nil\n", "empty_body");
    check_output("fun f() { return; }\nprint f();", "nil\n", "bare_return");
}

#[test]
fn return_unwinds_blocks_and_loops() {
    check_output(
        "fun find() {
           var i = 0;
           while (true) {
             if (i == 3) {
               return i;
             }
             i = i + 1;
           }
         }
         print find();",
        "3\n",
        "return_through_nesting",
    );
}

#[test]
fn counters_increment_their_captured_variable() {
    check_output(
        "fun makeCounter() {
           var i = 0;
           fun count() {
             i = i + 1;
             print i;
           }
           return count;
         }
         var counter = makeCounter();
         counter();
         counter();",
        "1\n2\n",
        "counter_closure",
    );
}

#[test]
fn each_call_creates_an_independent_frame() {
    check_output(
        "fun makeCounter() {
           var i = 0;
           fun count() {
             i = i + 1;
             print i;
           }
           return count;
         }
         var a = makeCounter();
         var b = makeCounter();
         a();
         a();
         b();",
        "1\n2\n1\n",
        "independent_counters",
    );
}

#[test]
fn closures_alias_their_declaring_frame() {
    check_output(
        "{
           var a = 1;
           fun show() {
             print a;
           }
           a = 99;
           show();
         }",
        "99\n",
        "mutation_is_visible",
    );
}

#[test]
fn global_references_bind_at_call_time() {
    check_output(
        "fun callOther() {
           other();
         }
         fun other() {
           print \"another\";
         }
         callOther();",
        "another\n",
        "late_global_binding",
    );
}

#[test]
fn resolved_locals_ignore_later_shadowing() {
    check_output(
        "var a = \"global\";
         {
           fun showA() {
             print a;
           }
           showA();
           var a = \"block\";
           showA();
         }",
        "global\nglobal\n",
        "stable_capture",
    );
}

#[test]
fn arguments_evaluate_in_the_caller_scope() {
    check_output(
        "fun id(x) { return x; }
         {
           var y = 10;
           print id(y + 5);
         }",
        "15\n",
        "caller_scope_arguments",
    );
}

#[test]
fn recursion_reaches_global_functions() {
    check_output(
        "fun fib(n) {
           if (n < 2) {
             return n;
           }
           return fib(n - 2) + fib(n - 1);
         }
         print fib(10);",
        "55\n",
        "fibonacci",
    );
}

// Runtime errors

#[test]
fn unary_minus_requires_a_number() {
    check_error(
        "print -\"a\";",
        "[line 1] Operand must be a number.",
        "negate_string",
    );
}

#[test]
fn binary_arithmetic_requires_numbers() {
    check_error(
        "print 1 + nil;",
        "[line 1] Operands must be numbers.",
        "add_nil",
    );
    check_error(
        "print \"a\" < \"b\";",
        "[line 1] Operands must be numbers.",
        "compare_strings",
    );
}

#[test]
fn only_functions_are_callable() {
    check_error(
        "\"text\"();",
        "[line 1] Can only call functions and classes.",
        "call_string",
    );
    check_error(
        "nil();",
        "[line 1] Can only call functions and classes.",
        "call_nil",
    );
}

#[test]
fn arity_mismatches_are_reported() {
    check_error(
        "fun f(a, b) {} f(1);",
        "[line 1] Expected 2 arguments but got 1.",
        "too_few_arguments",
    );
    check_error(
        "fun f() {} f(1, 2, 3);",
        "[line 1] Expected 0 arguments but got 3.",
        "too_many_arguments",
    );
}

#[test]
fn arity_is_checked_before_arguments_evaluate() {
    // `missing` is undefined, but the call must fail on arity first.
    check_error(
        "fun f(a, b) {}\nf(missing);",
        "[line 2] Expected 2 arguments but got 1.",
        "arity_first",
    );
}

#[test]
fn runtime_errors_name_the_failing_line() {
    check_error(
        "var a = 1;\nprint a + nil;",
        "[line 2] Operands must be numbers.",
        "line_attribution",
    );
}

#[test]
fn output_before_a_runtime_error_is_kept() {
    check_error_with_output(
        "print \"first\";\nprint nil + 1;",
        "first\n",
        "[line 2] Operands must be numbers.",
        "partial_output",
    );
}

// Stage ordering

#[test]
fn lexical_errors_stop_the_pipeline() {
    check_error("@\nprint;", "[line 1] Unexpected character: @", "lex_abort");
    check_error(
        "@\n#",
        "[line 1] Unexpected character: @\n[line 2] Unexpected character: #",
        "lex_aggregation",
    );
}

#[test]
fn parse_errors_stop_before_resolution() {
    check_error(
        "print 1",
        "[line 1] Expected SEMICOLON but reached the end of the file.",
        "parse_abort",
    );
}

#[test]
fn resolution_errors_aggregate_and_stop_before_execution() {
    check_error(
        "return 1;\nreturn 2;",
        "[line 1] Can't return from top-level code.\n[line 2] Can't return from top-level code.",
        "top_level_returns",
    );
    check_error(
        "{ var a = a; }",
        "[line 1] Can't read local variable in its own initializer.",
        "self_referential_initializer",
    );
    check_error_with_output(
        "print \"unreached\";\nreturn 1;",
        "",
        "[line 2] Can't return from top-level code.",
        "no_execution_on_resolution_error",
    );
}
