//! AST navigation: child iteration and node-kind inventory.

use std::collections::BTreeSet;

use super::{Node, NodeKind, Program};

impl Node {
    /// Direct children in evaluation order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Print(v) => vec![v.as_ref()],
            Node::Bind { value, .. } => vec![value.as_ref()],
            Node::Scope(body) => body.iter().collect(),
            Node::If {
                cond,
                then_body,
                else_body,
            } => std::iter::once(cond.as_ref())
                .chain(then_body.iter())
                .chain(else_body.iter())
                .collect(),
            Node::BinOp { lhs, rhs, .. } => vec![lhs.as_ref(), rhs.as_ref()],
            Node::Int(_) | Node::Bool(_) | Node::Ident(_) => Vec::new(),
        }
    }
}

fn collect_kinds(node: &Node, out: &mut BTreeSet<NodeKind>) {
    out.insert(node.kind());
    for child in node.children() {
        collect_kinds(child, out);
    }
}

impl Program {
    /// Every node kind used anywhere in the program.
    pub fn kinds_used(&self) -> BTreeSet<NodeKind> {
        let mut out = BTreeSet::new();
        for stmt in &self.statements {
            collect_kinds(&stmt.node, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinOp;
    use crate::span::Spanned;

    #[test]
    fn test_children_in_evaluation_order() {
        let n = Node::binop(BinOp::Sub, Node::ident("x"), Node::Int(1));
        assert_eq!(n.children(), vec![&Node::ident("x"), &Node::Int(1)]);
        assert!(Node::Bool(true).children().is_empty());
    }

    #[test]
    fn test_kinds_used() {
        let p = Program::new(vec![
            Spanned::dummy(Node::bind("x", None, Node::Int(1))),
            Spanned::dummy(Node::print(Node::binop(
                BinOp::Add,
                Node::ident("x"),
                Node::Int(1),
            ))),
        ]);
        let kinds: Vec<_> = p.kinds_used().into_iter().collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Print,
                NodeKind::Bind,
                NodeKind::Int,
                NodeKind::Ident,
                NodeKind::Add
            ]
        );
    }
}
