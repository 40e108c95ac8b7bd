//! Symbolic instructions between the AST and the final register machine
//! code.
//!
//! The builder produces a flat list of [`Instruction`]s whose operands
//! point at earlier instructions, either by position or by the name of an
//! identifier some earlier instruction was tagged with. The register
//! allocator turns those references into concrete registers, and pseudo
//! lowering rewrites the two convenience opcodes into real ones.

pub mod builder;
pub mod lower;
pub mod regalloc;

use std::collections::BTreeSet;
use std::fmt;

// ─── Registers ────────────────────────────────────────────────────

/// A physical register. `x0` always reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reg(pub u8);

impl Reg {
    pub const ZERO: Reg = Reg(0);
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

// ─── Opcodes ──────────────────────────────────────────────────────

/// Encoding category the binary encoder dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// rd, rs1, rs2
    R,
    /// rd, rs1, imm
    I,
    /// rs1
    A,
    /// imm
    P,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // ── Pseudo ──
    /// Load immediate. Becomes `addi rd, x0, imm`.
    Li,
    /// Register copy. Becomes `addi rd, rs1, 0`.
    Mv,

    // ── Register-register ──
    Add,
    Sub,
    Xor,
    Slt,

    // ── Register-immediate ──
    Addi,
    Subi,
    Xori,
    Slti,
    Sltiu,

    // ── Output ──
    Prnt,
    Prnti,
}

impl Opcode {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Li => "li",
            Opcode::Mv => "mv",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Xor => "xor",
            Opcode::Slt => "slt",
            Opcode::Addi => "addi",
            Opcode::Subi => "subi",
            Opcode::Xori => "xori",
            Opcode::Slti => "slti",
            Opcode::Sltiu => "sltiu",
            Opcode::Prnt => "prnt",
            Opcode::Prnti => "prnti",
        }
    }

    /// Encoding category. Pseudo-ops have none.
    pub fn format(&self) -> Option<Format> {
        match self {
            Opcode::Li | Opcode::Mv => None,
            Opcode::Add | Opcode::Sub | Opcode::Xor | Opcode::Slt => Some(Format::R),
            Opcode::Addi | Opcode::Subi | Opcode::Xori | Opcode::Slti | Opcode::Sltiu => {
                Some(Format::I)
            }
            Opcode::Prnt => Some(Format::A),
            Opcode::Prnti => Some(Format::P),
        }
    }

    pub fn is_pseudo(&self) -> bool {
        self.format().is_none()
    }

    /// Whether the instruction produces a value in `rd`.
    pub fn writes_register(&self) -> bool {
        !matches!(self, Opcode::Prnt | Opcode::Prnti)
    }

    /// Number of register operands read.
    pub fn reads(&self) -> usize {
        match self {
            Opcode::Li | Opcode::Prnti => 0,
            Opcode::Add | Opcode::Sub | Opcode::Xor | Opcode::Slt => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

// ─── Operands ─────────────────────────────────────────────────────

/// Reference to the value an earlier instruction produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Position of the producing instruction in the list.
    Index(usize),
    /// Name of an identifier; resolves to the nearest preceding
    /// instruction tagged with it.
    Tag(String),
}

impl Operand {
    pub fn tag(name: impl Into<String>) -> Self {
        Operand::Tag(name.into())
    }

    /// Shift a positional reference by `base`; tags are left alone.
    pub fn rebased(self, base: usize) -> Self {
        match self {
            Operand::Index(i) => Operand::Index(i + base),
            tag => tag,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Index(i) => write!(f, "@{}", i),
            Operand::Tag(name) => write!(f, "${}", name),
        }
    }
}

// ─── Instructions ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub op: Opcode,
    pub operands: Vec<Operand>,
    pub imm: Option<i64>,
    /// Identifiers bound to this instruction's result.
    pub tags: BTreeSet<String>,
    pub rd: Option<Reg>,
    pub rs1: Option<Reg>,
    pub rs2: Option<Reg>,
    /// Source line of the statement this came from (0 if unknown).
    pub line: u32,
}

impl Instruction {
    pub fn new(op: Opcode) -> Self {
        Self {
            op,
            operands: Vec::new(),
            imm: None,
            tags: BTreeSet::new(),
            rd: None,
            rs1: None,
            rs2: None,
            line: 0,
        }
    }

    pub fn with_operand(mut self, operand: Operand) -> Self {
        self.operands.push(operand);
        self
    }

    pub fn with_imm(mut self, imm: i64) -> Self {
        self.imm = Some(imm);
        self
    }

    pub fn tagged(mut self, name: impl Into<String>) -> Self {
        self.tags.insert(name.into());
        self
    }

    pub fn is_allocated(&self) -> bool {
        self.rd.is_some() || self.rs1.is_some() || self.rs2.is_some()
    }
}

/// `addi @0, 4 ; x` before allocation, `addi x1, x1, 4 ; x` after.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if self.is_allocated() {
            parts.extend(
                [self.rd, self.rs1, self.rs2]
                    .into_iter()
                    .flatten()
                    .map(|r| r.to_string()),
            );
        } else {
            parts.extend(self.operands.iter().map(|o| o.to_string()));
        }
        if let Some(imm) = self.imm {
            parts.push(imm.to_string());
        }
        write!(f, "{}", self.op)?;
        if !parts.is_empty() {
            write!(f, " {}", parts.join(", "))?;
        }
        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
            write!(f, " ; {}", tags.join(", "))?;
        }
        Ok(())
    }
}

/// Render a listing, one instruction per line.
pub fn listing(instructions: &[Instruction]) -> String {
    instructions
        .iter()
        .map(|ins| ins.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

// ─── Tests ────────────────────────────────────────────────────────
