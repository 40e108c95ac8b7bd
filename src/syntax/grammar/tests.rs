use super::*;
use crate::error::CompileError;
use crate::syntax::parser::Parser;
use crate::types::Ty;

fn decode(text: &str) -> Result<Node> {
    let registry = Registry::standard();
    Parser::new(&registry).decode(text)
}

fn bin(op: BinOp, lhs: Node, rhs: Node) -> Node {
    Node::binop(op, lhs, rhs)
}

fn x() -> Node {
    Node::ident("x")
}

// ─── Atoms ─────────────────────────────────────────────────────

#[test]
fn test_atoms() {
    assert_eq!(decode("17").unwrap(), Node::Int(17));
    assert_eq!(decode("-3").unwrap(), Node::Int(-3));
    assert_eq!(decode("true").unwrap(), Node::Bool(true));
    assert_eq!(decode("false").unwrap(), Node::Bool(false));
    assert_eq!(decode("truex").unwrap(), Node::ident("truex"));
    assert_eq!(decode("my_val2").unwrap(), Node::ident("my_val2"));
}

#[test]
fn test_integer_literal_out_of_range() {
    assert_eq!(decode("-9223372036854775808").unwrap(), Node::Int(i64::MIN));
    for big in ["9223372036854775808", "-9223372036854775809", "99999999999999999999"] {
        let err = decode(big).unwrap_err();
        assert_eq!(err, CompileError::parse(big, "integer literal out of range"));
    }
    let err = decode("x + 99999999999999999999").unwrap_err();
    assert_eq!(err.kind(), "ParseError");
}

#[test]
fn test_identifier_rejects_punctuation() {
    for bad in ["a.b", "a b", "a'", "a[0]", "a?", "a~", "a#"] {
        assert!(decode(bad).is_err(), "{bad} should not decode");
    }
}

// ─── Operators ─────────────────────────────────────────────────

#[test]
fn test_additive_splits_on_last_occurrence() {
    assert_eq!(
        decode("a - b - c").unwrap(),
        bin(
            BinOp::Sub,
            bin(BinOp::Sub, Node::ident("a"), Node::ident("b")),
            Node::ident("c")
        )
    );
    // `+` is registered before `-`, so it is tried first.
    assert_eq!(
        decode("a + b - c").unwrap(),
        bin(
            BinOp::Add,
            Node::ident("a"),
            bin(BinOp::Sub, Node::ident("b"), Node::ident("c"))
        )
    );
}

#[test]
fn test_comparisons_bind_looser_than_addition() {
    assert_eq!(
        decode("x + 1 == 3").unwrap(),
        bin(BinOp::Eq, bin(BinOp::Add, x(), Node::Int(1)), Node::Int(3))
    );
}

#[test]
fn test_every_comparison_token() {
    for (text, op) in [
        ("x == 1", BinOp::Eq),
        ("x != 1", BinOp::NotEq),
        ("x >= 1", BinOp::Ge),
        ("x <= 1", BinOp::Le),
        ("x > 1", BinOp::Gt),
        ("x < 1", BinOp::Lt),
    ] {
        assert_eq!(decode(text).unwrap(), bin(op, x(), Node::Int(1)), "{text}");
    }
}

#[test]
fn test_negative_operand() {
    assert_eq!(
        decode("x - -3").unwrap(),
        bin(BinOp::Sub, x(), Node::Int(-3))
    );
    assert_eq!(
        decode("x >= -1").unwrap(),
        bin(BinOp::Ge, x(), Node::Int(-1))
    );
}

#[test]
fn test_missing_operand_is_parse_error() {
    assert!(matches!(decode("1 +"), Err(CompileError::Parse { .. })));
    assert!(matches!(decode("x == "), Err(CompileError::Parse { .. })));
}

// ─── Longest symbol wins ───────────────────────────────────────

#[test]
fn test_symbol_table_groups_tokens_by_length() {
    let reg = Registry::standard();
    let table = reg.symbols(Tier::Comparison).unwrap();
    let short: Vec<_> = table[&1].iter().copied().collect();
    let long: Vec<_> = table[&2].iter().copied().collect();
    assert_eq!(short, vec!["<", ">"]);
    assert_eq!(long, vec!["!=", "<=", "==", ">="]);
    assert!(reg.symbols(Tier::Atom).is_none());
}

#[test]
fn test_shorter_token_yields_even_when_registered_first() {
    let mut reg = Registry::new();
    reg.register(
        Tier::Comparison,
        Rule::new("Gt", Form::Infix { token: ">", op: BinOp::Gt }),
    );
    reg.register(
        Tier::Comparison,
        Rule::new("Ge", Form::Infix { token: ">=", op: BinOp::Ge }),
    );
    reg.register(Tier::Atom, Rule::new("Integer", Form::IntLiteral));
    reg.register(Tier::Atom, Rule::new("Ident", Form::Identifier));

    assert!(reg.longer_symbol_present(Tier::Comparison, ">", "a >= 1"));
    assert!(!reg.longer_symbol_present(Tier::Comparison, ">", "a > 1"));

    let parser = Parser::new(&reg);
    assert_eq!(
        parser.decode("a >= 1").unwrap(),
        bin(BinOp::Ge, Node::ident("a"), Node::Int(1))
    );
    assert_eq!(
        parser.decode("a > 1").unwrap(),
        bin(BinOp::Gt, Node::ident("a"), Node::Int(1))
    );
}

// ─── Brackets ──────────────────────────────────────────────────

#[test]
fn test_parentheses() {
    assert_eq!(decode("((x))").unwrap(), x());
    assert_eq!(
        decode("3 - (1 + 2)").unwrap(),
        bin(
            BinOp::Sub,
            Node::Int(3),
            bin(BinOp::Add, Node::Int(1), Node::Int(2))
        )
    );
    assert_eq!(
        decode("(1) + (2)").unwrap(),
        bin(BinOp::Add, Node::Int(1), Node::Int(2))
    );
    assert_eq!(
        decode("(x > 1) == true").unwrap(),
        bin(BinOp::Eq, bin(BinOp::Gt, x(), Node::Int(1)), Node::Bool(true))
    );
}

#[test]
fn test_empty_brackets_abort() {
    let err = decode("()").unwrap_err();
    assert!(err.to_string().contains("at least 1"));
    let err = decode("print(   )").unwrap_err();
    assert!(matches!(err, CompileError::Parse { .. }));
}

#[test]
fn test_unbalanced_parentheses() {
    assert!(decode("(1 + 2").is_err());
    assert!(decode("1 + 2)").is_err());
}

#[test]
fn test_print() {
    assert_eq!(decode("print(5)").unwrap(), Node::print(Node::Int(5)));
    assert_eq!(
        decode("print((1 + 2))").unwrap(),
        Node::print(bin(BinOp::Add, Node::Int(1), Node::Int(2)))
    );
    assert_eq!(
        decode("print(x == 1)").unwrap(),
        Node::print(bin(BinOp::Eq, x(), Node::Int(1)))
    );
}

// ─── Bindings ──────────────────────────────────────────────────

#[test]
fn test_bindings() {
    assert_eq!(
        decode("val x = 3 + 4").unwrap(),
        Node::bind("x", None, bin(BinOp::Add, Node::Int(3), Node::Int(4)))
    );
    assert_eq!(
        decode("val ok: bool = 1 < 2").unwrap(),
        Node::bind(
            "ok",
            Some(Ty::Bool),
            bin(BinOp::Lt, Node::Int(1), Node::Int(2))
        )
    );
    assert_eq!(
        decode("val a = x == 3").unwrap(),
        Node::bind("a", None, bin(BinOp::Eq, x(), Node::Int(3)))
    );
}

#[test]
fn test_binding_defects() {
    for bad in [
        "val x: void = 1",
        "val x: float = 1",
        "val 3 = 4",
        "val 99999999999999999999 = 4",
        "val true = 4",
        "val a b = 1",
        "val = 1",
    ] {
        assert!(
            matches!(decode(bad), Err(CompileError::Parse { .. })),
            "{bad} should be a parse error"
        );
    }
}

#[test]
fn test_text_without_val_prefix_is_not_a_binding() {
    // Falls through every tier and lands on nothing.
    assert!(decode("x = 1").is_err());
}

// ─── Registry ──────────────────────────────────────────────────

#[test]
fn test_tier_order() {
    let reg = Registry::standard();
    let order: Vec<Tier> = reg.rules().map(|(t, _)| t).collect();
    let mut sorted = order.clone();
    sorted.sort();
    assert_eq!(order, sorted);
    assert_eq!(reg.len(), 14);
    assert!(reg.tier(Tier::Multiplicative).is_empty());
}

#[test]
fn test_registry_listing() {
    let listing = Registry::standard().to_string();
    assert!(listing.starts_with("bindings: Val\n"));
    assert!(listing.contains("comparisons: Eq, NotEq, Ge, Le, Gt, Lt\n"));
    assert!(!listing.contains("multiplication"));
}

#[test]
fn test_registry_idempotence() {
    let corpus = [
        "val x = 3 + 4",
        "val y = x - 2",
        "print(y)",
        "print(5)",
        "val a = x == 3",
        "val b: bool = (a != false) == true",
        "print(x - (y + 1) >= 2)",
    ];
    let first = Registry::standard();
    let second = Registry::standard();
    let p1 = Parser::new(&first);
    let p2 = Parser::new(&second);
    for text in corpus {
        let a = p1.decode(text).unwrap();
        let b = p2.decode(text).unwrap();
        assert_eq!(a, b, "{text}");
        // Decoding never mutates the registry.
        assert_eq!(p1.decode(text).unwrap(), a);
    }
}

#[test]
fn test_atoms_only_registry_cannot_parse_operators() {
    let mut reg = Registry::new();
    reg.register(Tier::Atom, Rule::new("Integer", Form::IntLiteral));
    let parser = Parser::new(&reg);
    assert_eq!(parser.decode("4").unwrap(), Node::Int(4));
    assert!(parser.decode("1 + 2").is_err());
}
