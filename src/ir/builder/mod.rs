//! Instruction selection: AST -> symbolic instructions.
//!
//! Every lowering starts its own zero-based index space. Results are
//! referenced either by identifier tag or as the LAST instruction of the
//! sublist that computed them, so concatenating sublists only requires
//! shifting positional operands (see [`append_rebased`]).

mod compare;
#[cfg(test)]
mod tests;

use crate::ast::{BinOp, Node, Program};
use crate::diagnostic::Diagnostic;
use crate::error::{CompileError, Result};
use crate::ir::{Instruction, Opcode, Operand};

/// Append `src` to `dst`, shifting every positional operand inside `src`
/// by the length `dst` had before. Returns that offset.
pub fn append_rebased(dst: &mut Vec<Instruction>, src: Vec<Instruction>) -> usize {
    let base = dst.len();
    for mut ins in src {
        ins.operands = ins.operands.into_iter().map(|o| o.rebased(base)).collect();
        dst.push(ins);
    }
    base
}

/// Lower a whole program, statement by statement.
pub fn lower_program(program: &Program) -> Result<Vec<Instruction>, Diagnostic> {
    let mut out = Vec::new();
    for stmt in &program.statements {
        let mut list = lower(&stmt.node).map_err(|e| e.at("codegen error", stmt.span))?;
        for ins in &mut list {
            ins.line = stmt.span.line;
        }
        append_rebased(&mut out, list);
    }
    tracing::debug!(instructions = out.len(), "instruction selection done");
    Ok(out)
}

/// Lower one statement or expression.
pub fn lower(node: &Node) -> Result<Vec<Instruction>> {
    match node {
        Node::Int(_) | Node::Bool(_) => Ok(vec![load_literal(node)?]),
        Node::Ident(_) => Err(CompileError::codegen(
            node,
            "an identifier is only valid as an operand",
        )),
        Node::BinOp { op, lhs, rhs } => lower_binop(*op, lhs, rhs),
        Node::Print(value) => lower_print(value),
        Node::Bind { name, value, .. } => lower_bind(name, value),
        Node::Scope(_) | Node::If { .. } => Err(CompileError::UnsupportedConstruct {
            node: node.kind().to_string(),
        }),
    }
}

fn load_literal(node: &Node) -> Result<Instruction> {
    let imm = node
        .literal_value()
        .ok_or_else(|| CompileError::codegen(node, "not a literal"))?;
    Ok(Instruction::new(Opcode::Li).with_imm(imm))
}

fn lower_print(value: &Node) -> Result<Vec<Instruction>> {
    match value {
        Node::Ident(name) => Ok(vec![
            Instruction::new(Opcode::Prnt).with_operand(Operand::tag(name.as_str()))
        ]),
        Node::Int(_) | Node::Bool(_) => {
            let imm = value.literal_value().unwrap_or_default();
            Ok(vec![Instruction::new(Opcode::Prnti).with_imm(imm)])
        }
        Node::BinOp { .. } => {
            let mut out = lower(value)?;
            let last = last_index(&out, value)?;
            out.push(Instruction::new(Opcode::Prnt).with_operand(last));
            Ok(out)
        }
        _ => Err(CompileError::codegen(value, "print needs a value")),
    }
}

fn lower_bind(name: &str, value: &Node) -> Result<Vec<Instruction>> {
    match value {
        Node::Int(_) | Node::Bool(_) => Ok(vec![load_literal(value)?.tagged(name)]),
        Node::Ident(src) => Ok(vec![Instruction::new(Opcode::Mv)
            .with_operand(Operand::tag(src.as_str()))
            .tagged(name)]),
        Node::BinOp { .. } => {
            let mut out = lower(value)?;
            match out.last_mut() {
                Some(last) => {
                    last.tags.insert(name.to_string());
                    Ok(out)
                }
                None => Err(CompileError::codegen(value, "produced no instructions")),
            }
        }
        _ => Err(CompileError::codegen(
            value,
            format!("cannot bind '{name}' to something without a value"),
        )),
    }
}

fn last_index(list: &[Instruction], node: &Node) -> Result<Operand> {
    match list.len() {
        0 => Err(CompileError::codegen(node, "produced no instructions")),
        n => Ok(Operand::Index(n - 1)),
    }
}

/// Lower an operand in its own index space: a bare identifier costs no
/// instructions and is referenced by tag, anything else by its last
/// instruction.
fn lower_operand(node: &Node) -> Result<(Vec<Instruction>, Operand)> {
    match node {
        Node::Ident(name) => Ok((Vec::new(), Operand::tag(name.as_str()))),
        Node::Int(_) | Node::Bool(_) => Ok((vec![load_literal(node)?], Operand::Index(0))),
        Node::BinOp { .. } => {
            let list = lower(node)?;
            let last = last_index(&list, node)?;
            Ok((list, last))
        }
        _ => Err(CompileError::codegen(node, "operand has no value")),
    }
}

/// Operand split for the immediate form: the operator to emit, the operand
/// that stays in a register, and the literal that becomes the immediate.
fn immediate_split<'a>(op: BinOp, lhs: &'a Node, rhs: &'a Node) -> Option<(BinOp, &'a Node, i64)> {
    if let Some(k) = rhs.literal_value() {
        return Some((op, lhs, k));
    }
    // A left literal only works when the operands can trade places.
    let k = lhs.literal_value()?;
    op.mirrored().map(|mirrored| (mirrored, rhs, k))
}

fn lower_binop(op: BinOp, lhs: &Node, rhs: &Node) -> Result<Vec<Instruction>> {
    if let Some((op, other, imm)) = immediate_split(op, lhs, rhs) {
        let (mut out, a) = lower_operand(other)?;
        compare::emit_immediate(&mut out, op, a, imm);
        return Ok(out);
    }

    let mut out = Vec::new();
    let (left, a) = lower_operand(lhs)?;
    append_rebased(&mut out, left);
    let (right, b) = lower_operand(rhs)?;
    let base = append_rebased(&mut out, right);
    compare::emit_register(&mut out, op, a, b.rebased(base));
    Ok(out)
}
