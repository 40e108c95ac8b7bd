use super::wide_sum;
use crate::runtime::Value;
use crate::*;

#[test]
fn test_run_prints_values() {
    let exec = run("val x = 3 + 4;\nprint(x);\nprint(x > 6);\nprint(x - 10);", "test.luka").unwrap();
    assert_eq!(exec.output, vec!["7", "true", "-3"]);
    assert_eq!(exec.value, Value::Unit);
}

#[test]
fn test_run_last_value() {
    let exec = run("val x = 2;\nx == 2;", "test.luka").unwrap();
    assert!(exec.output.is_empty());
    assert_eq!(exec.value, Value::Bool(true));
}

#[test]
fn test_run_ignores_register_pressure() {
    let exec = run(&wide_sum(16), "test.luka").unwrap();
    assert_eq!(exec.output, vec![(0..16).sum::<i64>().to_string()]);
}

#[test]
fn test_run_shadowing() {
    let exec = run("val x = 1;\nval x = x + 1;\nprint(x);", "test.luka").unwrap();
    assert_eq!(exec.output, vec!["2"]);
}

#[test]
fn test_run_type_checks_first() {
    let errors = run("print(1);\nprint(true + 1);", "test.luka").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.starts_with("type error: "));
    assert_eq!(errors[0].span.line, 2);
}

#[test]
fn test_run_returns_front_end_warnings() {
    let exec = run("val x = 1;\nprint(x)", "test.luka").unwrap();
    assert_eq!(exec.output, vec!["1"]);
    let lines: Vec<String> = exec.warnings.iter().map(|w| w.to_string()).collect();
    assert_eq!(lines, vec!["line 2: does not end in a semicolon".to_string()]);
}
