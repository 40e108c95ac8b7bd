//! Canonical text form of AST nodes.
//!
//! This is the single source of truth for node names in diagnostics and
//! debug listings: `Val(int, Ident("x"), Add(Integer(3), Integer(4)))`.

use std::fmt;

use super::{BinOp, Node, NodeKind, Program};

fn op_name(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "Add",
        BinOp::Sub => "Sub",
        BinOp::Eq => "Eq",
        BinOp::NotEq => "NotEq",
        BinOp::Gt => "Gt",
        BinOp::Lt => "Lt",
        BinOp::Ge => "Ge",
        BinOp::Le => "Le",
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    f.write_str("[")?;
    for (i, n) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", n)?;
    }
    f.write_str("]")
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Print(v) => write!(f, "Print({})", v),
            Node::Bind { ty, name, value } => match ty {
                Some(ty) => write!(f, "Val({}, Ident({:?}), {})", ty, name, value),
                None => write!(f, "Val(Ident({:?}), {})", name, value),
            },
            Node::Scope(body) => {
                f.write_str("Scope(")?;
                write_list(f, body)?;
                f.write_str(")")
            }
            Node::If {
                cond,
                then_body,
                else_body,
            } => {
                write!(f, "If({}, ", cond)?;
                write_list(f, then_body)?;
                f.write_str(", ")?;
                write_list(f, else_body)?;
                f.write_str(")")
            }
            Node::Int(v) => write!(f, "Integer({})", v),
            Node::Bool(b) => write!(f, "Boolean({})", b),
            Node::Ident(name) => write!(f, "Ident({:?})", name),
            Node::BinOp { op, lhs, rhs } => write!(f, "{}({}, {})", op_name(*op), lhs, rhs),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Print => "Print",
            NodeKind::Bind => "Val",
            NodeKind::Scope => "Scope",
            NodeKind::If => "If",
            NodeKind::Int => "Integer",
            NodeKind::Bool => "Boolean",
            NodeKind::Ident => "Ident",
            NodeKind::Add => "Add",
            NodeKind::Sub => "Sub",
            NodeKind::Eq => "Eq",
            NodeKind::NotEq => "NotEq",
            NodeKind::Gt => "Gt",
            NodeKind::Lt => "Lt",
            NodeKind::Ge => "Ge",
            NodeKind::Le => "Le",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Program([")?;
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "\n\t{}", stmt.node)?;
        }
        f.write_str("\n])")
    }
}
