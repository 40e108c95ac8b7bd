pub mod env;
#[cfg(test)]
mod tests;
pub mod types;

pub use env::Env;

use crate::ast::{BinOp, Node, Program};
use crate::diagnostic::Diagnostic;
use crate::error::{CompileError, Result};
use crate::types::Ty;

/// Type checker over a persistent name -> type environment.
///
/// Every check returns the node's type together with the environment that
/// follows it. Only `Bind` produces a new environment; `Scope` and `If`
/// always hand back the one they were given.
#[derive(Clone, Debug, Default)]
pub struct TypeChecker {
    /// Names visible before the first statement.
    globals: Env<Ty>,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start checking from a pre-populated environment.
    pub fn with_env(globals: Env<Ty>) -> Self {
        Self { globals }
    }

    /// Check a whole program in statement order. The first failure aborts
    /// the check and is reported on its statement's line.
    pub fn check_program(&self, program: &Program) -> Result<Env<Ty>, Diagnostic> {
        let mut env = self.globals.clone();
        for stmt in &program.statements {
            let (_, next) = self
                .check_node(&stmt.node, &env)
                .map_err(|e| e.at("type error", stmt.span))?;
            env = next;
        }
        tracing::debug!(bindings = env.len(), "type check passed");
        Ok(env)
    }

    pub fn check_node(&self, node: &Node, env: &Env<Ty>) -> Result<(Ty, Env<Ty>)> {
        match node {
            Node::Int(_) => Ok((Ty::Int, env.clone())),
            Node::Bool(_) => Ok((Ty::Bool, env.clone())),
            Node::Ident(name) => match env.lookup(name) {
                Some(ty) => Ok((*ty, env.clone())),
                None => Err(CompileError::UnboundName { name: name.clone() }),
            },
            Node::BinOp { op, lhs, rhs } => self.check_binop(*op, lhs, rhs, env),
            Node::Print(value) => {
                let (ty, env) = self.check_node(value, env)?;
                if !ty.has_value() {
                    return Err(CompileError::TypeMismatch {
                        subject: "print operand".to_string(),
                        expected: "a printable value".to_string(),
                        found: ty,
                    });
                }
                Ok((Ty::Void, env))
            }
            Node::Bind { ty, name, value } => {
                let (found, env) = self.check_node(value, env)?;
                if !found.has_value() {
                    return Err(CompileError::TypeMismatch {
                        subject: format!("value bound to '{name}'"),
                        expected: "a value".to_string(),
                        found,
                    });
                }
                if let Some(declared) = ty {
                    if *declared != found {
                        return Err(CompileError::TypeMismatch {
                            subject: format!("value of '{name}'"),
                            expected: declared.to_string(),
                            found,
                        });
                    }
                }
                Ok((Ty::Void, env.bind(name.clone(), found)))
            }
            Node::Scope(body) => {
                let ty = self.check_scope(body, env)?;
                Ok((ty, env.clone()))
            }
            Node::If {
                cond,
                then_body,
                else_body,
            } => {
                let (cond_ty, _) = self.check_node(cond, env)?;
                if cond_ty != Ty::Bool {
                    return Err(CompileError::TypeMismatch {
                        subject: "if condition".to_string(),
                        expected: Ty::Bool.to_string(),
                        found: cond_ty,
                    });
                }
                let then_ty = self.check_scope(then_body, env)?;
                let else_ty = self.check_scope(else_body, env)?;
                if then_ty != else_ty {
                    return Err(CompileError::TypeMismatch {
                        subject: "else branch".to_string(),
                        expected: then_ty.to_string(),
                        found: else_ty,
                    });
                }
                Ok((then_ty, env.clone()))
            }
        }
    }

    /// Check a block in a child environment; yields its last element's type.
    fn check_scope(&self, body: &[Node], env: &Env<Ty>) -> Result<Ty> {
        let mut inner = env.clone();
        let mut last = Ty::Void;
        for node in body {
            let (ty, next) = self.check_node(node, &inner)?;
            last = ty;
            inner = next;
        }
        Ok(last)
    }

    fn check_binop(&self, op: BinOp, lhs: &Node, rhs: &Node, env: &Env<Ty>) -> Result<(Ty, Env<Ty>)> {
        let (lty, env) = self.check_node(lhs, env)?;
        let (rty, env) = self.check_node(rhs, &env)?;
        for (side, ty) in [("left", lty), ("right", rty)] {
            if ty != Ty::Int {
                return Err(CompileError::TypeMismatch {
                    subject: format!("{side} operand of '{}'", op.as_str()),
                    expected: Ty::Int.to_string(),
                    found: ty,
                });
            }
        }
        let result = if op.is_comparison() { Ty::Bool } else { Ty::Int };
        Ok((result, env))
    }
}
