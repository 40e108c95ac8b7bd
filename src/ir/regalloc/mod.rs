//! Liveness-based register allocation.
//!
//! Three passes over the symbolic instruction list:
//!
//! 1. tag resolution: every `Tag` operand becomes the index of the nearest
//!    preceding instruction carrying that tag, so later bindings shadow
//!    earlier ones;
//! 2. liveness: each value's expiry is the last index that reads it;
//! 3. greedy assignment in program order, lowest free register first.
//!
//! Register 0 is the zero register and is never handed out.


use crate::error::{CompileError, Result};
use crate::ir::{Instruction, Operand, Reg};

/// Last program point at which a value is still needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Expiry {
    /// Never read.
    Dead,
    /// Last read by the instruction at this index.
    At(usize),
    /// Never released (the zero register).
    Forever,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Zero,
    Empty,
    /// Value produced by the instruction at this index.
    Holds(usize),
}

impl Slot {
    fn expiry(&self, values: &[Expiry]) -> Expiry {
        match self {
            Slot::Zero => Expiry::Forever,
            Slot::Empty => Expiry::Dead,
            Slot::Holds(k) => values.get(*k).copied().unwrap_or(Expiry::Dead),
        }
    }
}

/// Largest register file a `Reg` can name.
pub const MAX_REGISTERS: usize = u8::MAX as usize + 1;

pub struct RegisterAllocator {
    registers: usize,
}

impl RegisterAllocator {
    /// An allocator for a register file of `registers` entries, `x0` included.
    /// Files larger than [`MAX_REGISTERS`] are cut down to it.
    pub fn new(registers: usize) -> Self {
        Self {
            registers: registers.min(MAX_REGISTERS),
        }
    }

    /// Registers available for values (`x0` excluded).
    pub fn available(&self) -> usize {
        self.registers.saturating_sub(1)
    }

    /// Assign `rd`/`rs1`/`rs2` to every instruction in place.
    pub fn allocate(&self, instructions: &mut [Instruction]) -> Result<()> {
        resolve_tags(instructions)?;
        let expiry = liveness(instructions);

        let mut slots = vec![Slot::Empty; self.registers];
        if let Some(first) = slots.first_mut() {
            *first = Slot::Zero;
        }

        for (i, ins) in instructions.iter_mut().enumerate() {
            if ins.operands.len() != ins.op.reads() {
                return Err(CompileError::OperandCount {
                    index: i,
                    expected: ins.op.reads(),
                    found: ins.operands.len(),
                });
            }
            // Operands first, so the result may reuse a register read here.
            let mut reads = Vec::with_capacity(ins.operands.len());
            for operand in &ins.operands {
                let producer = match operand {
                    Operand::Index(j) => *j,
                    Operand::Tag(tag) => {
                        return Err(CompileError::UnresolvedTag {
                            tag: tag.clone(),
                            index: i,
                        })
                    }
                };
                let reg = slots
                    .iter()
                    .position(|s| *s == Slot::Holds(producer))
                    .ok_or(CompileError::UnboundRegister { producer, index: i })?;
                reads.push(register(reg));
            }
            ins.rs1 = reads.first().copied();
            ins.rs2 = reads.get(1).copied();

            if ins.op.writes_register() {
                let free = slots
                    .iter()
                    .position(|s| s.expiry(&expiry) <= Expiry::At(i));
                let Some(r) = free else {
                    return Err(CompileError::OutOfRegisters {
                        index: i,
                        available: self.available(),
                    });
                };
                slots[r] = Slot::Holds(i);
                ins.rd = Some(register(r));
                tracing::trace!(index = i, rd = %register(r), "assigned");
            }
        }
        tracing::debug!(instructions = instructions.len(), "register allocation done");
        Ok(())
    }
}

/// `index` is below `MAX_REGISTERS`, so it fits a `u8`.
fn register(index: usize) -> Reg {
    Reg(index as u8)
}

/// Rewrite every tag operand into the index of the nearest preceding
/// instruction that carries the tag.
pub fn resolve_tags(instructions: &mut [Instruction]) -> Result<()> {
    for i in 0..instructions.len() {
        let (before, rest) = instructions.split_at_mut(i);
        let Some(ins) = rest.first_mut() else {
            break;
        };
        for operand in ins.operands.iter_mut() {
            if let Operand::Tag(tag) = operand {
                let producer = before
                    .iter()
                    .rposition(|prev| prev.tags.contains(tag.as_str()))
                    .ok_or_else(|| CompileError::UnresolvedTag {
                        tag: tag.clone(),
                        index: i,
                    })?;
                *operand = Operand::Index(producer);
            }
        }
    }
    Ok(())
}

/// Expiry of every instruction's value. Expects tags already resolved.
pub fn liveness(instructions: &[Instruction]) -> Vec<Expiry> {
    let mut expiry = vec![Expiry::Dead; instructions.len()];
    for (i, ins) in instructions.iter().enumerate() {
        for operand in &ins.operands {
            if let Operand::Index(j) = operand {
                if let Some(e) = expiry.get_mut(*j) {
                    *e = (*e).max(Expiry::At(i));
                }
            }
        }
    }
    expiry
}
