//! Error reporting: parse failures, runtime error kinds, stack traces.

use wisp::interpreter::{parse_and_run, ErrorKind, ParseError, RuntimeError, WispError};

fn runtime_error(source: &str) -> RuntimeError {
    match parse_and_run(source) {
        Err(WispError::Runtime(e)) => e,
        other => panic!("expected runtime error, got {:?}", other),
    }
}

fn parse_error(source: &str) -> ParseError {
    match parse_and_run(source) {
        Err(WispError::Parse(e)) => e,
        other => panic!("expected parse error, got {:?}", other),
    }
}

// =============================================================================
// PARSE ERRORS
// =============================================================================

#[test]
fn test_unmatched_open_paren() {
    let err = parse_error("(+ 1 2");
    assert!(err.message.contains("expected ')'"));
}

#[test]
fn test_stray_close_paren() {
    let err = parse_error(")");
    assert!(err.message.contains("unexpected token"));
}

#[test]
fn test_lexical_error_reported_as_parse_error() {
    let err = parse_error("(+ 1 2x)");
    assert!(err.message.contains("invalid character 'x' after number"));
}

#[test]
fn test_parse_error_display_format() {
    let err = parse_error("(define)");
    let rendered = err.to_string();
    assert!(
        rendered.starts_with("Parsing error at line 1, got token: "),
        "unexpected format: {}",
        rendered
    );
    assert!(rendered.contains("error: "));
}

#[test]
fn test_unterminated_string_is_a_parse_error() {
    let err = parse_error("\"open");
    assert!(err.message.contains("unterminated string"));
}

#[test]
fn test_keyword_in_expression_position() {
    let err = parse_error("else");
    assert!(err.message.contains("unexpected token: Else"));
}

// =============================================================================
// RUNTIME ERROR KINDS
// =============================================================================

#[test]
fn test_undefined_identifier() {
    let err = runtime_error("unknown-name");
    assert_eq!(err.kind, ErrorKind::UndefinedIdentifier);
    assert!(err.message.contains("undefined identifier: `unknown-name`"));
}

#[test]
fn test_set_on_unbound_name() {
    let err = runtime_error("(set! nope 1)");
    assert_eq!(err.kind, ErrorKind::UnboundAssignment);
}

#[test]
fn test_procedure_arity_mismatch() {
    let err = runtime_error("(define (f x) x) (f 1 2)");
    assert_eq!(err.kind, ErrorKind::Arity);
    assert!(err.message.contains("expected 1 arguments, got 2"));

    let err = runtime_error("(define (f x . r) x) (f)");
    assert!(err.message.contains("expected at least 1 arguments, got 0"));
}

#[test]
fn test_builtin_arity_mismatch() {
    let err = runtime_error("(car '(1) '(2))");
    assert_eq!(err.kind, ErrorKind::Arity);
    let err = runtime_error("(> 1 2 3)");
    assert_eq!(err.kind, ErrorKind::Arity);
}

#[test]
fn test_type_errors() {
    let err = runtime_error("(+ 1 \"a\")");
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("all arguments to '+' must be numbers, got string"));

    let err = runtime_error("(car 5)");
    assert_eq!(err.kind, ErrorKind::Type);

    let err = runtime_error("(length 5)");
    assert_eq!(err.kind, ErrorKind::Type);

    let err = runtime_error("(force 1)");
    assert_eq!(err.kind, ErrorKind::Type);
}

#[test]
fn test_domain_errors() {
    let err = runtime_error("(car '())");
    assert_eq!(err.kind, ErrorKind::Domain);
    assert!(err.message.contains("cannot call 'car' on an empty list"));

    let err = runtime_error("(cdr '())");
    assert_eq!(err.kind, ErrorKind::Domain);

    let err = runtime_error("(set-car! '() 1)");
    assert_eq!(err.kind, ErrorKind::Domain);

    let err = runtime_error("(set-cdr! '() 1)");
    assert_eq!(err.kind, ErrorKind::Domain);

    let err = runtime_error("(remainder 1 0)");
    assert_eq!(err.kind, ErrorKind::Domain);
}

#[test]
fn test_user_error() {
    let err = runtime_error("(error \"boom\")");
    assert_eq!(err.kind, ErrorKind::User);
    assert_eq!(err.message, "failed to evaluate: \"boom\"");

    let err = runtime_error("(error \"boom\" 42)");
    assert_eq!(err.message, "failed to evaluate: \"boom\", 42");
}

#[test]
fn test_calling_a_non_procedure() {
    let err = runtime_error("(1 2)");
    assert_eq!(err.kind, ErrorKind::NotCallable);

    let err = runtime_error("(\"s\")");
    assert_eq!(err.kind, ErrorKind::NotCallable);
}

#[test]
fn test_map_length_mismatch() {
    let err = runtime_error("(map (lambda (x y) x) '(1 2) '(3))");
    assert!(err.message.contains("all lists must have same size"));
}

// =============================================================================
// STACK TRACES
// =============================================================================

#[test]
fn test_stack_trace_through_nested_calls() {
    let source = "(define (c)
  d)
(define (b)
  (c))
(define (a)
  (b))
(a)";
    let err = runtime_error(source);
    assert_eq!(
        err.to_string(),
        "undefined identifier: `d` on line 2\n\tat c (line 2)\n\tat b (line 4)\n\tat a (line 6)\n\tat main (line 7)"
    );
}

#[test]
fn test_top_level_error_has_only_the_main_frame() {
    let err = runtime_error("(define x 1)\n(car '())");
    assert_eq!(
        err.to_string(),
        "cannot call 'car' on an empty list\n\tat main (line 2)"
    );
}

#[test]
fn test_builtin_failure_inside_procedure() {
    let source = "(define (first xs)
  (car xs))
(first '())";
    let err = runtime_error(source);
    assert_eq!(
        err.to_string(),
        "cannot call 'car' on an empty list\n\tat first (line 2)\n\tat main (line 3)"
    );
}

#[test]
fn test_anonymous_frames_are_labelled() {
    let err = runtime_error("((lambda () missing))");
    assert!(err.to_string().contains("\tat <lambda> (line 1)"));
}

#[test]
fn test_error_inside_forced_promise() {
    let err = runtime_error("(force (delay missing))");
    assert!(err.message.contains("undefined identifier: `missing`"));
}

#[test]
fn test_arity_error_trace_names_the_callee() {
    let err = runtime_error("(define (f x) x) (f 1 2)");
    assert_eq!(
        err.to_string(),
        "expected 1 arguments, got 2\n\tat f (line 1)\n\tat main (line 1)"
    );
}
