use insta::assert_snapshot;

use super::*;
use crate::ir::listing;
use crate::syntax::grammar::Registry;
use crate::syntax::parser::Parser;
use crate::syntax::source::split_statements;

fn build(source: &str) -> Vec<Instruction> {
    let (statements, _) = split_statements(source);
    let registry = Registry::standard();
    let program = Parser::new(&registry).parse_program(&statements).unwrap();
    lower_program(&program).unwrap()
}

fn build_listing(source: &str) -> String {
    listing(&build(source))
}

// ─── Scenarios ─────────────────────────────────────────────────

#[test]
fn test_literal_sum_uses_right_literal_as_immediate() {
    assert_snapshot!(build_listing("val x = 3 + 4;"), @r"
    li 3
    addi @0, 4 ; x
    ");
}

#[test]
fn test_subtract_from_name_then_print() {
    let list = build("val x = 1;\nval y = x - 2; print(y);");
    assert_eq!(list.len(), 3);
    assert_eq!(list[1].op, Opcode::Subi);
    assert_eq!(list[1].operands, vec![Operand::tag("x")]);
    assert_eq!(list[1].imm, Some(2));
    assert!(list[1].tags.contains("y"));
    assert_eq!(list[2].op, Opcode::Prnt);
    assert_eq!(list[2].operands, vec![Operand::tag("y")]);
}

#[test]
fn test_print_literal_is_one_instruction() {
    let list = build("print(5);");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].op, Opcode::Prnti);
    assert_eq!(list[0].imm, Some(5));
    assert!(list[0].operands.is_empty());
}

#[test]
fn test_equality_against_literal() {
    assert_snapshot!(build_listing("val x = 1;\nval a = x == 3;"), @r"
    li 1 ; x
    xori $x, 3
    sltiu @1, 1 ; a
    ");
}

// ─── Selection rules ───────────────────────────────────────────

#[test]
fn test_comparison_sequences_with_immediate() {
    assert_snapshot!(build_listing("print(x != 2);"), @r"
    xori $x, 2
    sltiu @0, 1
    xori @1, 1
    prnt @2
    ");
    assert_snapshot!(build_listing("print(x < 2);\nprint(x >= 2);"), @r"
    slti $x, 2
    prnt @0
    slti $x, 2
    xori @2, 1
    prnt @3
    ");
    assert_snapshot!(build_listing("print(x <= 2);\nprint(x > 2);"), @r"
    subi $x, 2
    slti @0, 1
    prnt @1
    subi $x, 2
    slti @3, 1
    xori @4, 1
    prnt @5
    ");
}

#[test]
fn test_comparison_sequences_with_registers() {
    assert_snapshot!(build_listing("print(x == y);\nprint(x > y);\nprint(x <= y);"), @r"
    xor $x, $y
    sltiu @0, 1
    prnt @1
    slt $y, $x
    prnt @3
    slt $y, $x
    xori @5, 1
    prnt @6
    ");
}

#[test]
fn test_left_literal_comparison_is_mirrored() {
    // 3 < x  is  x > 3
    assert_snapshot!(build_listing("val b = 3 < x;"), @r"
    subi $x, 3
    slti @0, 1
    xori @1, 1 ; b
    ");
}

#[test]
fn test_left_literal_add_and_sub() {
    assert_snapshot!(build_listing("val c = 10 + x;\nval d = 10 - x;"), @r"
    addi $x, 10 ; c
    li 10
    sub @1, $x ; d
    ");
}

#[test]
fn test_register_operands_are_rebased() {
    assert_snapshot!(build_listing("val d = (x + 1) - (y + 2);"), @r"
    addi $x, 1
    addi $y, 2
    sub @0, @1 ; d
    ");
}

#[test]
fn test_binding_copies_and_literals() {
    assert_snapshot!(build_listing("val a = 7;\nval b = a;\nval t = true;"), @r"
    li 7 ; a
    mv $a ; b
    li 1 ; t
    ");
}

#[test]
fn test_binding_adds_no_instruction() {
    let bare = lower(&Node::binop(BinOp::Add, Node::ident("x"), Node::ident("y"))).unwrap();
    let bound = lower(&Node::bind(
        "z",
        None,
        Node::binop(BinOp::Add, Node::ident("x"), Node::ident("y")),
    ))
    .unwrap();
    assert_eq!(bare.len(), bound.len());
    assert!(bound[bound.len() - 1].tags.contains("z"));
}

#[test]
fn test_instructions_carry_statement_lines() {
    let list = build("val x = 1;\n\nval y = x + x;\nprint(y);");
    let lines: Vec<u32> = list.iter().map(|i| i.line).collect();
    assert_eq!(lines, vec![1, 3, 4]);
}

// ─── Value locality ────────────────────────────────────────────

#[test]
fn test_positional_operands_point_backwards() {
    let corpus = [
        "val r = (x + 1) - (y - (z + 2));",
        "val r = (x == 1) == (y != 2);",
        "val r = 1 - (2 - (3 - x));",
        "val r = (x + y) >= (y + x);",
    ];
    for src in corpus {
        let list = build(src);
        for (i, ins) in list.iter().enumerate() {
            for op in &ins.operands {
                if let Operand::Index(j) = op {
                    assert!(*j < i, "{src}: instruction {i} refers forward to {j}");
                }
            }
        }
        assert!(list[list.len() - 1].tags.contains("r"), "{src}");
    }
}

// ─── Errors ────────────────────────────────────────────────────

#[test]
fn test_bare_identifier_statement_is_rejected() {
    let err = lower(&Node::ident("x")).unwrap_err();
    assert_eq!(err.kind(), "CodegenError");
    assert!(err.to_string().contains("Ident(\"x\")"));
}

#[test]
fn test_scope_and_if_are_unsupported() {
    let err = lower(&Node::Scope(vec![Node::Int(1)])).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnsupportedConstruct {
            node: "Scope".to_string()
        }
    );
    let err = lower(&Node::If {
        cond: Box::new(Node::Bool(true)),
        then_body: vec![],
        else_body: vec![],
    })
    .unwrap_err();
    assert_eq!(err.kind(), "UnsupportedConstructError");
}

#[test]
fn test_non_value_operands_are_rejected() {
    let nested_print = Node::print(Node::print(Node::Int(1)));
    assert_eq!(lower(&nested_print).unwrap_err().kind(), "CodegenError");

    let bind_print = Node::bind("x", None, Node::print(Node::Int(1)));
    assert_eq!(lower(&bind_print).unwrap_err().kind(), "CodegenError");

    let add_print = Node::binop(BinOp::Add, Node::print(Node::Int(1)), Node::ident("y"));
    assert_eq!(lower(&add_print).unwrap_err().kind(), "CodegenError");
}

#[test]
fn test_program_error_carries_line() {
    let registry = Registry::standard();
    let (statements, _) = split_statements("val x = 1;\nx;");
    let program = Parser::new(&registry).parse_program(&statements).unwrap();
    let diag = lower_program(&program).unwrap_err();
    assert_eq!(diag.span.line, 2);
    assert_eq!(diag.notes, vec!["CodegenError".to_string()]);
}
