//! Direct evaluation of a decoded program.
//!
//! The evaluator mirrors the type checker: every node yields a value and
//! the environment that follows it, and only `Bind` extends the
//! environment. Printed values are collected rather than written out, so
//! callers decide where program output goes.

use std::fmt;

use crate::ast::{BinOp, Node, Program};
use crate::diagnostic::Diagnostic;
use crate::error::{CompileError, Result};
use crate::typecheck::Env;
use crate::types::Ty;

// ─── Types ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    /// Result of a statement.
    Unit,
}

impl Value {
    pub fn ty(&self) -> Ty {
        match self {
            Value::Int(_) => Ty::Int,
            Value::Bool(_) => Ty::Bool,
            Value::Unit => Ty::Void,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Unit => f.write_str("()"),
        }
    }
}

/// What running a program produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Execution {
    /// Printed values, one entry per executed `print`.
    pub output: Vec<String>,
    /// Value of the last statement.
    pub value: Value,
    /// Non-fatal diagnostics from reading the source.
    pub warnings: Vec<Diagnostic>,
}

// ─── Runner ────────────────────────────────────────────────────────

/// Executes a program.
pub trait Runner {
    fn run(&self, program: &Program) -> Result<Execution, Diagnostic>;
}

/// Tree-walking interpreter.
#[derive(Clone, Copy, Debug, Default)]
pub struct Interpreter;

impl Runner for Interpreter {
    fn run(&self, program: &Program) -> Result<Execution, Diagnostic> {
        let mut eval = Evaluator::default();
        let mut env = Env::new();
        let mut value = Value::Unit;
        for stmt in &program.statements {
            let (v, next) = eval
                .eval(&stmt.node, &env)
                .map_err(|e| e.at("runtime error", stmt.span))?;
            value = v;
            env = next;
        }
        tracing::debug!(printed = eval.output.len(), "program finished");
        Ok(Execution {
            output: eval.output,
            value,
            warnings: Vec::new(),
        })
    }
}

/// Run a program with the tree-walking interpreter.
pub fn run(program: &Program) -> Result<Execution, Diagnostic> {
    Interpreter.run(program)
}

// ─── Evaluation ────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Evaluator {
    output: Vec<String>,
}

impl Evaluator {
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn eval(&mut self, node: &Node, env: &Env<Value>) -> Result<(Value, Env<Value>)> {
        match node {
            Node::Int(v) => Ok((Value::Int(*v), env.clone())),
            Node::Bool(b) => Ok((Value::Bool(*b), env.clone())),
            Node::Ident(name) => match env.lookup(name) {
                Some(v) => Ok((*v, env.clone())),
                None => Err(CompileError::UnboundName { name: name.clone() }),
            },
            Node::BinOp { op, lhs, rhs } => {
                let (l, env) = self.eval(lhs, env)?;
                let (r, env) = self.eval(rhs, &env)?;
                let a = expect_int(l, "left", op.as_str())?;
                let b = expect_int(r, "right", op.as_str())?;
                let value = match op.compare(a, b) {
                    Some(result) => Value::Bool(result),
                    None if *op == BinOp::Add => Value::Int(a.wrapping_add(b)),
                    None => Value::Int(a.wrapping_sub(b)),
                };
                Ok((value, env))
            }
            Node::Print(value) => {
                let (v, env) = self.eval(value, env)?;
                self.output.push(v.to_string());
                Ok((Value::Unit, env))
            }
            Node::Bind { name, value, .. } => {
                let (v, env) = self.eval(value, env)?;
                Ok((Value::Unit, env.bind(name.clone(), v)))
            }
            Node::Scope(body) => {
                let v = self.eval_scope(body, env)?;
                Ok((v, env.clone()))
            }
            Node::If {
                cond,
                then_body,
                else_body,
            } => {
                let (c, _) = self.eval(cond, env)?;
                let branch = match c {
                    Value::Bool(true) => then_body,
                    Value::Bool(false) => else_body,
                    other => {
                        return Err(CompileError::TypeMismatch {
                            subject: "if condition".to_string(),
                            expected: Ty::Bool.to_string(),
                            found: other.ty(),
                        })
                    }
                };
                let v = self.eval_scope(branch, env)?;
                Ok((v, env.clone()))
            }
        }
    }

    fn eval_scope(&mut self, body: &[Node], env: &Env<Value>) -> Result<Value> {
        let mut inner = env.clone();
        let mut last = Value::Unit;
        for node in body {
            let (v, next) = self.eval(node, &inner)?;
            last = v;
            inner = next;
        }
        Ok(last)
    }
}

fn expect_int(value: Value, side: &str, op: &str) -> Result<i64> {
    match value {
        Value::Int(v) => Ok(v),
        other => Err(CompileError::TypeMismatch {
            subject: format!("{side} operand of '{op}'"),
            expected: Ty::Int.to_string(),
            found: other.ty(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{Span, Spanned};

    fn program(nodes: Vec<Node>) -> Program {
        Program::new(
            nodes
                .into_iter()
                .enumerate()
                .map(|(i, n)| Spanned::new(n, Span::line(i as u32 + 1)))
                .collect(),
        )
    }

    #[test]
    fn test_print_collects_output() {
        let p = program(vec![
            Node::bind("x", None, Node::binop(BinOp::Add, Node::Int(3), Node::Int(4))),
            Node::print(Node::ident("x")),
            Node::print(Node::binop(BinOp::Ge, Node::ident("x"), Node::Int(8))),
        ]);
        let exec = run(&p).unwrap();
        assert_eq!(exec.output, vec!["7", "false"]);
        assert_eq!(exec.value, Value::Unit);
    }

    #[test]
    fn test_comparisons() {
        let mut eval = Evaluator::default();
        let env = Env::new().bind("x", Value::Int(5));
        for (op, expected) in [
            (BinOp::Eq, false),
            (BinOp::NotEq, true),
            (BinOp::Gt, true),
            (BinOp::Lt, false),
            (BinOp::Ge, true),
            (BinOp::Le, false),
        ] {
            let node = Node::binop(op, Node::ident("x"), Node::Int(3));
            let (v, _) = eval.eval(&node, &env).unwrap();
            assert_eq!(v, Value::Bool(expected), "{:?}", op);
        }
    }

    #[test]
    fn test_arithmetic_wraps() {
        let mut eval = Evaluator::default();
        let node = Node::binop(BinOp::Add, Node::Int(i64::MAX), Node::Int(1));
        let (v, _) = eval.eval(&node, &Env::new()).unwrap();
        assert_eq!(v, Value::Int(i64::MIN));
    }

    #[test]
    fn test_scope_value_and_isolation() {
        let mut eval = Evaluator::default();
        let env = Env::new().bind("x", Value::Int(1));
        let scope = Node::Scope(vec![
            Node::bind("x", None, Node::Int(10)),
            Node::binop(BinOp::Sub, Node::ident("x"), Node::Int(3)),
        ]);
        let (v, after) = eval.eval(&scope, &env).unwrap();
        assert_eq!(v, Value::Int(7));
        assert_eq!(after.lookup("x"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_if_picks_branch() {
        let mut eval = Evaluator::default();
        let node = Node::If {
            cond: Box::new(Node::binop(BinOp::Lt, Node::Int(1), Node::Int(2))),
            then_body: vec![Node::print(Node::Int(1)), Node::Int(10)],
            else_body: vec![Node::print(Node::Int(2)), Node::Int(20)],
        };
        let (v, _) = eval.eval(&node, &Env::new()).unwrap();
        assert_eq!(v, Value::Int(10));
        assert_eq!(eval.output(), ["1".to_string()]);
    }

    #[test]
    fn test_unbound_name_reports_line() {
        let p = program(vec![Node::print(Node::Int(1)), Node::print(Node::ident("z"))]);
        let diag = run(&p).unwrap_err();
        assert_eq!(diag.span.line, 2);
        assert_eq!(diag.notes, vec!["UnboundNameError".to_string()]);
    }
}
