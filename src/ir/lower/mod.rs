//! Lowering: rewrites pseudo-ops after allocation and emits the final
//! machine instructions handed to the binary encoder.
//!
//! `li rd, imm` becomes `addi rd, x0, imm`; `mv rd, rs1` becomes
//! `addi rd, rs1, 0`. Emission then keeps only the fields each opcode's
//! [`Format`] carries.


use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::machine::MachineConfig;
use crate::diagnostic::Diagnostic;
use crate::error::{CompileError, Result};
use crate::ir::{Format, Instruction, Opcode, Reg};
use crate::span::Span;

/// Rewrite `li` and `mv` into `addi` in place.
pub fn lower_pseudo(instructions: &mut [Instruction]) {
    for ins in instructions.iter_mut() {
        match ins.op {
            Opcode::Li => {
                ins.op = Opcode::Addi;
                ins.rs1 = Some(Reg::ZERO);
            }
            Opcode::Mv => {
                ins.op = Opcode::Addi;
                ins.imm = Some(0);
            }
            _ => {}
        }
    }
}

// ─── Machine instructions ─────────────────────────────────────────

/// One final instruction: `{op, rd?, rs1?, rs2?, imm?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineInstruction {
    pub op: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rd: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rs1: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rs2: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imm: Option<i64>,
}

impl fmt::Display for MachineInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<String> = [self.rd, self.rs1, self.rs2]
            .into_iter()
            .flatten()
            .map(|r| Reg(r).to_string())
            .collect();
        if let Some(imm) = self.imm {
            fields.push(imm.to_string());
        }
        if fields.is_empty() {
            write!(f, "{}", self.op)
        } else {
            write!(f, "{} {}", self.op, fields.join(", "))
        }
    }
}

fn field<T>(value: Option<T>, ins: &Instruction, name: &str) -> Result<T> {
    value.ok_or_else(|| CompileError::codegen(ins, format!("missing {name}")))
}

fn convert(ins: &Instruction) -> Result<MachineInstruction> {
    let Some(format) = ins.op.format() else {
        return Err(CompileError::codegen(ins, "pseudo-instruction was not lowered"));
    };
    let reg = |r: Option<Reg>, name: &str| field(r, ins, name).map(|r| r.0);
    let mut out = MachineInstruction {
        op: ins.op.mnemonic().to_string(),
        rd: None,
        rs1: None,
        rs2: None,
        imm: None,
    };
    match format {
        Format::R => {
            out.rd = Some(reg(ins.rd, "rd")?);
            out.rs1 = Some(reg(ins.rs1, "rs1")?);
            out.rs2 = Some(reg(ins.rs2, "rs2")?);
        }
        Format::I => {
            out.rd = Some(reg(ins.rd, "rd")?);
            out.rs1 = Some(reg(ins.rs1, "rs1")?);
            out.imm = Some(field(ins.imm, ins, "immediate")?);
        }
        Format::A => {
            out.rs1 = Some(reg(ins.rs1, "rs1")?);
        }
        Format::P => {
            out.imm = Some(field(ins.imm, ins, "immediate")?);
        }
    }
    Ok(out)
}

/// Inclusive range of a signed `bits`-wide field.
pub fn signed_range(bits: u32) -> (i64, i64) {
    let half = 1i64 << (bits.clamp(1, 63) - 1);
    (-half, half - 1)
}

/// Convert allocated, pseudo-free instructions into machine instructions.
/// Immediates the encoder cannot hold produce warnings.
pub fn emit(
    instructions: &[Instruction],
    machine: &MachineConfig,
) -> Result<(Vec<MachineInstruction>, Vec<Diagnostic>)> {
    let mut out = Vec::with_capacity(instructions.len());
    let mut warnings = Vec::new();
    for ins in instructions {
        let mi = convert(ins)?;
        let width = match ins.op.format() {
            Some(Format::I) => Some(("immediate", machine.imm_bits)),
            Some(Format::P) => Some(("value", machine.value_bits)),
            _ => None,
        };
        if let (Some((what, bits)), Some(imm)) = (width, mi.imm) {
            let (lo, hi) = signed_range(bits);
            if imm < lo || imm > hi {
                warnings.push(Diagnostic::warning(
                    format!("{what} {imm} in `{mi}` does not fit in {bits} signed bits ({lo}..={hi})"),
                    Span::line(ins.line),
                ));
            }
        }
        out.push(mi);
    }
    tracing::debug!(
        instructions = out.len(),
        warnings = warnings.len(),
        machine = %machine.name,
        "emitted"
    );
    Ok((out, warnings))
}

/// Pretty-printed JSON array, the encoder's input format.
pub fn to_json(instructions: &[MachineInstruction]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(instructions)
}

/// One instruction per line.
pub fn render(instructions: &[MachineInstruction]) -> String {
    instructions
        .iter()
        .map(|mi| mi.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
