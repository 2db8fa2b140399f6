//! End-to-end tests: compile pseudocode source and run it against a
//! collecting host.

use gaddis_core::RuntimeError;
use gaddis_rt::{interpret, CollectHost, Error};

/// Helper: run a program with no inputs and return its Display lines.
fn run_lines(source: &str) -> Vec<String> {
    let host = CollectHost::new();
    interpret(source, &host).expect("program should run");
    host.lines()
}

/// Helper: run with scripted inputs; returns the result and Display lines.
fn run_with_inputs(source: &str, inputs: &[&str]) -> (Result<(), Error>, Vec<String>) {
    let host = CollectHost::with_inputs(inputs.iter().copied());
    let result = interpret(source, &host);
    (result, host.lines())
}

fn run_err(source: &str) -> RuntimeError {
    let host = CollectHost::new();
    match interpret(source, &host) {
        Err(Error::Runtime(e)) => e,
        other => panic!("expected a runtime error, got {:?}", other),
    }
}

// ─── Spec scenarios ───

#[test]
fn hello_world_produces_one_display_line() {
    let lines = run_lines("Module main()\nDisplay \"Hello, World!\"\nEnd Module");
    assert_eq!(lines, vec!["Hello, World!"]);
}

#[test]
fn for_loop_accumulates_to_fifteen() {
    let source = "Declare Integer s = 0, i\nFor i = 1 To 5\nSet s = s + i\nEnd For\nDisplay s";
    assert_eq!(run_lines(source), vec!["15"]);
}

#[test]
fn recursive_factorial() {
    let source = "\
Function Integer f(Integer n)
If n == 0 Then
Return 1
Else
Return n * f(n - 1)
End If
End Function
Module main()
Display f(4)
End Module";
    assert_eq!(run_lines(source), vec!["24"]);
}

#[test]
fn invalid_input_reprompts_then_accepts() {
    let source = "Declare Integer x\nInput x\nDisplay x";
    let (result, lines) = run_with_inputs(source, &["abc", "7"]);
    result.expect("program should run");
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Invalid input"));
    assert_eq!(lines[1], "7");
}

#[test]
fn by_reference_swap_mutates_caller() {
    let source = "\
Module swap(Ref Integer x, Ref Integer y)
Declare Integer t
Set t = x
Set x = y
Set y = t
End Module
Module main()
Call swap(a, b)
Display a, \" \", b
End Module
Declare Integer a = 1, b = 2";
    assert_eq!(run_lines(source), vec!["2 1"]);
}

// ─── Language semantics ───

#[test]
fn globals_initialize_before_main() {
    let source = "Declare Integer base = 10\nModule main()\nDisplay base + 5\nEnd Module";
    assert_eq!(run_lines(source), vec!["15"]);
}

#[test]
fn main_is_required_once_modules_exist() {
    let err = run_err("Module helper()\nDisplay 1\nEnd Module");
    assert_eq!(err, RuntimeError::MissingMain);
}

#[test]
fn case_folding_spans_keywords_and_identifiers() {
    let source = "DECLARE INTEGER Total = 3\nSET total = TOTAL + 1\ndisplay ToTaL";
    assert_eq!(run_lines(source), vec!["4"]);
}

#[test]
fn runs_are_deterministic_without_input_or_random() {
    let source = "Declare Integer i\nFor i = 1 To 3\nDisplay i * i\nEnd For";
    assert_eq!(run_lines(source), run_lines(source));
}

#[test]
fn while_loop_is_pre_test() {
    let source = "Declare Integer n = 5\nWhile n < 5\nDisplay n\nEnd While\nDisplay \"done\"";
    assert_eq!(run_lines(source), vec!["done"]);
}

#[test]
fn do_until_runs_body_at_least_once() {
    let source = "Declare Integer n = 9\nDo\nDisplay n\nSet n = n + 1\nUntil n > 9";
    assert_eq!(run_lines(source), vec!["9"]);
}

#[test]
fn else_if_chain_picks_middle_branch() {
    let source = "\
Declare Integer score = 85
If score >= 90 Then
Display \"A\"
Else If score >= 80 Then
Display \"B\"
Else
Display \"C\"
End If";
    assert_eq!(run_lines(source), vec!["B"]);
}

#[test]
fn tap_inserts_four_space_spacer() {
    let lines = run_lines("Display \"a\", Tap, \"b\"");
    assert_eq!(lines, vec!["a    b"]);
}

#[test]
fn display_concatenates_items_without_separator() {
    let lines = run_lines("Display \"n=\", 1 + 2");
    assert_eq!(lines, vec!["n=3"]);
}

#[test]
fn string_concatenation_requires_both_strings() {
    assert_eq!(
        run_lines("Display \"ab\" + \"cd\""),
        vec!["abcd"]
    );
    let err = run_err("Display \"ab\" + 1");
    assert!(matches!(err, RuntimeError::TypeMismatch { line: 1, .. }));
}

#[test]
fn division_always_yields_real_and_rejects_zero() {
    assert_eq!(run_lines("Display 7 / 2"), vec!["3.5"]);
    let err = run_err("Display 1\nDisplay 1 / 0");
    assert_eq!(err, RuntimeError::DivisionByZero { line: 2 });
}

#[test]
fn modulo_keeps_integers_and_rejects_zero() {
    assert_eq!(run_lines("Display 7 MOD 3"), vec!["1"]);
    assert_eq!(run_lines("Display 7 % 3"), vec!["1"]);
    let err = run_err("Display 5 MOD 0");
    assert_eq!(err, RuntimeError::DivisionByZero { line: 1 });
}

#[test]
fn short_circuit_skips_rhs_faults() {
    let source = "Declare Integer z = 0\nIf z != 0 And 1 / z > 0 Then\nDisplay \"bad\"\nEnd If\nDisplay \"ok\"";
    assert_eq!(run_lines(source), vec!["ok"]);
}

#[test]
fn arrays_are_zero_based_and_bounds_checked() {
    let source = "Declare Integer nums[3] = 10, 20, 30\nDisplay nums[0], \" \", nums[2]";
    assert_eq!(run_lines(source), vec!["10 30"]);

    let err = run_err("Declare Integer nums[2]\nDisplay nums[2]");
    assert_eq!(
        err,
        RuntimeError::IndexOutOfBounds {
            index: 2,
            len: 2,
            line: 2
        }
    );
}

#[test]
fn array_element_assignment_writes_in_place() {
    let source = "Declare Integer nums[2]\nSet nums[1] = 42\nDisplay nums[1]";
    assert_eq!(run_lines(source), vec!["42"]);
}

#[test]
fn too_many_array_initializers_is_an_error() {
    let err = run_err("Declare Integer nums[2] = 1, 2, 3");
    assert_eq!(err, RuntimeError::TooManyInitializers { size: 2, line: 1 });
}

#[test]
fn negative_array_size_is_an_error() {
    let err = run_err("Declare Integer nums[-1]");
    assert_eq!(err, RuntimeError::NegativeSize { line: 1 });
}

#[test]
fn arrays_pass_by_reference_semantics_through_parameters() {
    let source = "\
Module fill(Integer slots[])
Set slots[0] = 99
End Module
Module main()
Declare Integer nums[2]
Call fill(nums)
Display nums[0]
End Module";
    assert_eq!(run_lines(source), vec!["99"]);
}

#[test]
fn constants_reject_assignment_at_runtime() {
    let err = run_err("Constant Real PI = 3.14\nSet PI = 3");
    assert_eq!(
        err,
        RuntimeError::ConstantAssignment {
            name: "PI".to_string(),
            line: 2
        }
    );
}

#[test]
fn duplicate_declaration_in_same_scope_fails() {
    let err = run_err("Declare Integer x\nDeclare Real X");
    assert_eq!(
        err,
        RuntimeError::DuplicateDeclaration {
            name: "X".to_string(),
            line: 2
        }
    );
}

#[test]
fn block_scopes_pop_on_exit() {
    let source = "\
Declare Integer x = 1
If x == 1 Then
Declare Integer inner = 5
Display inner
End If
Display x";
    assert_eq!(run_lines(source), vec!["5", "1"]);

    let err = run_err("If 1 Then\nDeclare Integer inner = 5\nEnd If\nDisplay inner");
    assert_eq!(
        err,
        RuntimeError::UndeclaredVariable {
            name: "inner".to_string(),
            line: 4
        }
    );
}

#[test]
fn subroutines_see_globals_but_not_caller_locals() {
    let source = "\
Declare Integer g = 7
Module peek()
Display g
End Module
Module main()
Declare Integer local = 1
Call peek()
End Module";
    assert_eq!(run_lines(source), vec!["7"]);

    let source = "\
Module peek()
Display local
End Module
Module main()
Declare Integer local = 1
Call peek()
End Module";
    let err = run_err(source);
    assert_eq!(
        err,
        RuntimeError::UndeclaredVariable {
            name: "local".to_string(),
            line: 2
        }
    );
}

#[test]
fn argument_count_is_enforced() {
    let source = "Module two(Integer a, Integer b)\nEnd Module\nModule main()\nCall two(1)\nEnd Module";
    let err = run_err(source);
    assert_eq!(
        err,
        RuntimeError::ArgumentCount {
            name: "two".to_string(),
            expected: 2,
            found: 1,
            line: 4
        }
    );
}

#[test]
fn reference_parameters_reject_expression_arguments() {
    let source = "Module bump(Ref Integer x)\nEnd Module\nModule main()\nCall bump(1 + 2)\nEnd Module";
    let err = run_err(source);
    assert!(matches!(err, RuntimeError::ReferenceArgument { .. }));
}

#[test]
fn function_without_return_is_an_error() {
    let source = "Function Integer f(Integer n)\nDisplay n\nEnd Function\nModule main()\nDisplay f(1)\nEnd Module";
    let err = run_err(source);
    assert!(matches!(err, RuntimeError::MissingReturn { .. }));
}

#[test]
fn undeclared_variable_reports_its_line() {
    let err = run_err("Display 1\nDisplay ghost");
    assert_eq!(
        err,
        RuntimeError::UndeclaredVariable {
            name: "ghost".to_string(),
            line: 2
        }
    );
}

#[test]
fn for_counter_is_visible_inside_body() {
    let source = "Declare Integer i\nFor i = 1 To 3\nDisplay i\nEnd For";
    assert_eq!(run_lines(source), vec!["1", "2", "3"]);
}

#[test]
fn builtins_dispatch_case_insensitively() {
    assert_eq!(run_lines("Display toUpper(\"abc\")"), vec!["ABC"]);
    assert_eq!(run_lines("Display SQRT(16)"), vec!["4"]);
    assert_eq!(run_lines("Display length(\"hello\")"), vec!["5"]);
    assert_eq!(
        run_lines("Display currencyFormat(1234.5)"),
        vec!["$1,234.50"]
    );
}

#[test]
fn input_into_real_parses_decimals() {
    let source = "Declare Real r\nInput r\nDisplay r";
    let (result, lines) = run_with_inputs(source, &["2.5"]);
    result.expect("program should run");
    assert_eq!(lines, vec!["2.5"]);
}

#[test]
fn input_cancel_leaves_variable_unchanged() {
    let source = "Declare Integer x = 41\nInput x\nDisplay x";
    let (result, lines) = run_with_inputs(source, &[]);
    result.expect("cancelled input is not a program error");
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("cancelled"));
    assert_eq!(lines[1], "41");
}

#[test]
fn string_input_preserves_whitespace() {
    let source = "Declare String s\nInput s\nDisplay \"[\", s, \"]\"";
    let (result, lines) = run_with_inputs(source, &["  padded  "]);
    result.expect("program should run");
    assert_eq!(lines, vec!["[  padded  ]"]);
}

#[test]
fn stop_flag_aborts_execution() {
    let host = CollectHost::new();
    host.request_stop();
    let err = interpret("Display 1", &host).unwrap_err();
    assert!(err.is_stopped());
    assert!(host.lines().is_empty());
}

#[test]
fn runaway_recursion_is_cut_off() {
    let source = "\
Function Integer f(Integer n)
Return f(n + 1)
End Function
Module main()
Display f(0)
End Module";
    let err = run_err(source);
    assert!(matches!(err, RuntimeError::RecursionLimit { .. }));
}

#[test]
fn integer_arithmetic_stays_integer_and_widens_on_real() {
    assert_eq!(run_lines("Display 2 + 3"), vec!["5"]);
    assert_eq!(run_lines("Display 2 + 3.5"), vec!["5.5"]);
    assert_eq!(run_lines("Display 2 * 2.5"), vec!["5"]);
}

#[test]
fn unary_operators() {
    assert_eq!(run_lines("Display -(2 + 3)"), vec!["-5"]);
    assert_eq!(run_lines("Display Not 0, \" \", Not 3"), vec!["1 0"]);
}
