//! TypeChecker unit tests over parsed source.

use crate::types::Ty;

use super::{check, check_err};

#[test]
fn test_valid_arithmetic() {
    let env = check("val x = 3 + 4;\nval y = x - 2;\nprint(y);").unwrap();
    assert_eq!(env.lookup("x"), Some(&Ty::Int));
    assert_eq!(env.lookup("y"), Some(&Ty::Int));
}

#[test]
fn test_comparison_is_bool() {
    let env = check("val x = 1;\nval a = x == 3;\nval b: bool = x >= 0;").unwrap();
    assert_eq!(env.lookup("a"), Some(&Ty::Bool));
    assert_eq!(env.lookup("b"), Some(&Ty::Bool));
}

#[test]
fn test_unbound_name_never_reaches_codegen() {
    let diag = check_err("print(z);");
    assert_eq!(diag.span.line, 1);
    assert_eq!(diag.notes, vec!["UnboundNameError".to_string()]);
    assert_eq!(
        diag.to_string(),
        "line 1: type error: identifier 'z' is not in scope"
    );
}

#[test]
fn test_declared_type_must_match() {
    let diag = check_err("val x: int = true;");
    assert_eq!(diag.notes, vec!["TypeMismatchError".to_string()]);
    assert!(diag.message.contains("value of 'x': expected int, found bool"));
}

#[test]
fn test_declared_type_accepted() {
    assert!(check("val x: int = 5;\nval t: bool = false;\nprint(t);").is_ok());
}

#[test]
fn test_arithmetic_on_bool_names_operand_and_operator() {
    let diag = check_err("val x = 1;\nval y = true + x;");
    assert_eq!(diag.span.line, 2);
    assert!(diag.message.contains("left operand of '+': expected int, found bool"));

    let diag = check_err("val b = false;\nprint(3 - b);");
    assert!(diag.message.contains("right operand of '-'"));
}

#[test]
fn test_comparison_requires_ints() {
    let diag = check_err("val a = true == false;");
    assert!(diag.message.contains("left operand of '=='"));
}

#[test]
fn test_print_needs_a_value() {
    let diag = check_err("print(print(1));");
    assert!(diag.message.contains("print operand: expected a printable value, found void"));
}

#[test]
fn test_fail_fast_reports_first_error_only() {
    let diag = check_err("val x = 1;\nprint(y);\nprint(z);");
    assert_eq!(diag.span.line, 2);
    assert!(diag.message.contains("'y'"));
}

#[test]
fn test_rebinding_shadows() {
    let env = check("val x = 1;\nval x = true;\nval y: bool = x;").unwrap();
    assert_eq!(env.lookup("x"), Some(&Ty::Bool));
    assert_eq!(env.len(), 3);
}

#[test]
fn test_use_before_bind_fails() {
    let diag = check_err("val y = x + 1;\nval x = 2;");
    assert_eq!(diag.span.line, 1);
}
