pub mod display;
pub mod navigate;

use crate::span::Spanned;
use crate::types::Ty;

/// A decoded program: top-level statements in source order, each spanned
/// with its 1-based source line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Spanned<Node>>,
}

impl Program {
    pub fn new(statements: Vec<Spanned<Node>>) -> Self {
        Self { statements }
    }

    pub fn push(&mut self, statement: Spanned<Node>) {
        self.statements.push(statement);
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Every construct of the language. Each node exclusively owns its children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    // ── Statements (no value) ──
    /// `print(<expr>)`
    Print(Box<Node>),
    /// `val <name>[: <type>] = <expr>`
    Bind {
        ty: Option<Ty>,
        name: String,
        value: Box<Node>,
    },
    /// A block evaluated against a child environment. Yields the value of its
    /// last element; bindings made inside never escape.
    Scope(Vec<Node>),
    /// Two-armed conditional over scopes. Has no surface syntax yet.
    If {
        cond: Box<Node>,
        then_body: Vec<Node>,
        else_body: Vec<Node>,
    },

    // ── Expressions ──
    Int(i64),
    Bool(bool),
    Ident(String),
    BinOp {
        op: BinOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
}

/// Closed set of node kinds, one per constructor (binary operators split
/// out per operator).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Print,
    Bind,
    Scope,
    If,
    Int,
    Bool,
    Ident,
    Add,
    Sub,
    Eq,
    NotEq,
    Gt,
    Lt,
    Ge,
    Le,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,   // +
    Sub,   // -
    Eq,    // ==
    NotEq, // !=
    Gt,    // >
    Lt,    // <
    Ge,    // >=
    Le,    // <=
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Gt => ">",
            BinOp::Lt => "<",
            BinOp::Ge => ">=",
            BinOp::Le => "<=",
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            BinOp::Add => NodeKind::Add,
            BinOp::Sub => NodeKind::Sub,
            BinOp::Eq => NodeKind::Eq,
            BinOp::NotEq => NodeKind::NotEq,
            BinOp::Gt => NodeKind::Gt,
            BinOp::Lt => NodeKind::Lt,
            BinOp::Ge => NodeKind::Ge,
            BinOp::Le => NodeKind::Le,
        }
    }

    pub fn is_comparison(&self) -> bool {
        !matches!(self, BinOp::Add | BinOp::Sub)
    }

    /// The operator that gives the same answer with its operands swapped
    /// (`a < b` is `b > a`). `None` for subtraction.
    pub fn mirrored(&self) -> Option<BinOp> {
        match self {
            BinOp::Add => Some(BinOp::Add),
            BinOp::Sub => None,
            BinOp::Eq => Some(BinOp::Eq),
            BinOp::NotEq => Some(BinOp::NotEq),
            BinOp::Gt => Some(BinOp::Lt),
            BinOp::Lt => Some(BinOp::Gt),
            BinOp::Ge => Some(BinOp::Le),
            BinOp::Le => Some(BinOp::Ge),
        }
    }

    /// Runtime predicate of a comparison operator.
    pub fn compare(&self, a: i64, b: i64) -> Option<bool> {
        match self {
            BinOp::Eq => Some(a == b),
            BinOp::NotEq => Some(a != b),
            BinOp::Gt => Some(a > b),
            BinOp::Lt => Some(a < b),
            BinOp::Ge => Some(a >= b),
            BinOp::Le => Some(a <= b),
            BinOp::Add | BinOp::Sub => None,
        }
    }
}

impl Node {
    pub fn binop(op: BinOp, lhs: Node, rhs: Node) -> Node {
        Node::BinOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn ident(name: impl Into<String>) -> Node {
        Node::Ident(name.into())
    }

    pub fn print(value: Node) -> Node {
        Node::Print(Box::new(value))
    }

    pub fn bind(name: impl Into<String>, ty: Option<Ty>, value: Node) -> Node {
        Node::Bind {
            ty,
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Print(_) => NodeKind::Print,
            Node::Bind { .. } => NodeKind::Bind,
            Node::Scope(_) => NodeKind::Scope,
            Node::If { .. } => NodeKind::If,
            Node::Int(_) => NodeKind::Int,
            Node::Bool(_) => NodeKind::Bool,
            Node::Ident(_) => NodeKind::Ident,
            Node::BinOp { op, .. } => op.kind(),
        }
    }

    /// Literal value as a machine immediate (`true` = 1, `false` = 0).
    pub fn literal_value(&self) -> Option<i64> {
        match self {
            Node::Int(v) => Some(*v),
            Node::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }
}
