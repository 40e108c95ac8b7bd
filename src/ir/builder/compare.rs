//! Arithmetic and comparison micro-sequences.
//!
//! The machine has no comparison opcodes. Each comparison is built from
//! `xor`, `slt`, `sltiu` and `subi`; every sequence leaves its 0/1 result
//! in its last instruction.

use crate::ast::BinOp;
use crate::ir::{Instruction, Opcode, Operand};

fn push(out: &mut Vec<Instruction>, ins: Instruction) -> Operand {
    out.push(ins);
    Operand::Index(out.len() - 1)
}

fn unary(out: &mut Vec<Instruction>, op: Opcode, src: Operand, imm: i64) -> Operand {
    push(out, Instruction::new(op).with_operand(src).with_imm(imm))
}

fn binary(out: &mut Vec<Instruction>, op: Opcode, a: Operand, b: Operand) -> Operand {
    push(out, Instruction::new(op).with_operand(a).with_operand(b))
}

/// Flip a 0/1 value.
fn negate(out: &mut Vec<Instruction>, value: Operand) -> Operand {
    unary(out, Opcode::Xori, value, 1)
}

/// 1 when `value` is zero.
fn is_zero(out: &mut Vec<Instruction>, value: Operand) -> Operand {
    unary(out, Opcode::Sltiu, value, 1)
}

/// `a <op> imm`
pub(super) fn emit_immediate(out: &mut Vec<Instruction>, op: BinOp, a: Operand, imm: i64) {
    match op {
        BinOp::Add => {
            unary(out, Opcode::Addi, a, imm);
        }
        BinOp::Sub => {
            unary(out, Opcode::Subi, a, imm);
        }
        BinOp::Eq => {
            let diff = unary(out, Opcode::Xori, a, imm);
            is_zero(out, diff);
        }
        BinOp::NotEq => {
            let diff = unary(out, Opcode::Xori, a, imm);
            let eq = is_zero(out, diff);
            negate(out, eq);
        }
        BinOp::Lt => {
            unary(out, Opcode::Slti, a, imm);
        }
        BinOp::Ge => {
            let lt = unary(out, Opcode::Slti, a, imm);
            negate(out, lt);
        }
        // a <= k  <=>  a - k < 1
        BinOp::Le => {
            let diff = unary(out, Opcode::Subi, a, imm);
            unary(out, Opcode::Slti, diff, 1);
        }
        BinOp::Gt => {
            let diff = unary(out, Opcode::Subi, a, imm);
            let le = unary(out, Opcode::Slti, diff, 1);
            negate(out, le);
        }
    }
}

/// `a <op> b`
pub(super) fn emit_register(out: &mut Vec<Instruction>, op: BinOp, a: Operand, b: Operand) {
    match op {
        BinOp::Add => {
            binary(out, Opcode::Add, a, b);
        }
        BinOp::Sub => {
            binary(out, Opcode::Sub, a, b);
        }
        BinOp::Eq => {
            let diff = binary(out, Opcode::Xor, a, b);
            is_zero(out, diff);
        }
        BinOp::NotEq => {
            let diff = binary(out, Opcode::Xor, a, b);
            let eq = is_zero(out, diff);
            negate(out, eq);
        }
        BinOp::Lt => {
            binary(out, Opcode::Slt, a, b);
        }
        BinOp::Ge => {
            let lt = binary(out, Opcode::Slt, a, b);
            negate(out, lt);
        }
        BinOp::Gt => {
            binary(out, Opcode::Slt, b, a);
        }
        BinOp::Le => {
            let gt = binary(out, Opcode::Slt, b, a);
            negate(out, gt);
        }
    }
}
