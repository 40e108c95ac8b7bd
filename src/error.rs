//! Error taxonomy shared by every compiler stage.
//!
//! Stages return `Result<T, CompileError>`; the pipeline converts the first
//! error into a [`Diagnostic`] carrying the statement's source line.

use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::types::Ty;

pub type Result<T, E = CompileError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("cannot decode '{text}': {reason}")]
    Parse { text: String, reason: String },

    #[error("identifier '{name}' is not in scope")]
    UnboundName { name: String },

    #[error("{subject}: expected {expected}, found {found}")]
    TypeMismatch {
        subject: String,
        expected: String,
        found: Ty,
    },

    #[error("cannot generate code for {node}: {reason}")]
    Codegen { node: String, reason: String },

    #[error("no instruction selection for {node}")]
    UnsupportedConstruct { node: String },

    #[error("instruction {index} references '{tag}' before any instruction defines it")]
    UnresolvedTag { tag: String, index: usize },

    #[error("instruction {index} reads the value of instruction {producer}, but no register holds it")]
    UnboundRegister { producer: usize, index: usize },

    #[error("instruction {index} needs a register, but all {available} allocatable registers are live")]
    OutOfRegisters { index: usize, available: usize },

    #[error("instruction {index} reads {found} operands, its opcode takes {expected}")]
    OperandCount {
        index: usize,
        expected: usize,
        found: usize,
    },
}

impl CompileError {
    pub(crate) fn parse(text: &str, reason: impl Into<String>) -> Self {
        CompileError::Parse {
            text: text.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn codegen(node: impl ToString, reason: impl Into<String>) -> Self {
        CompileError::Codegen {
            node: node.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable name of the error class, used as the diagnostic note.
    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::Parse { .. } => "ParseError",
            CompileError::UnboundName { .. } => "UnboundNameError",
            CompileError::TypeMismatch { .. } => "TypeMismatchError",
            CompileError::Codegen { .. } => "CodegenError",
            CompileError::UnsupportedConstruct { .. } => "UnsupportedConstructError",
            CompileError::UnresolvedTag { .. } => "UnresolvedTagError",
            CompileError::UnboundRegister { .. } => "UnboundRegisterError",
            CompileError::OutOfRegisters { .. } => "OutOfRegistersError",
            CompileError::OperandCount { .. } => "OperandCountError",
        }
    }

    /// Allocator failures other than register exhaustion mean an earlier
    /// stage produced inconsistent instructions.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CompileError::UnresolvedTag { .. }
                | CompileError::UnboundRegister { .. }
                | CompileError::OperandCount { .. }
        )
    }

    /// Index of the instruction an allocator error refers to.
    pub fn instruction(&self) -> Option<usize> {
        match self {
            CompileError::UnresolvedTag { index, .. }
            | CompileError::UnboundRegister { index, .. }
            | CompileError::OutOfRegisters { index, .. }
            | CompileError::OperandCount { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Attach a source location, producing the diagnostic reported to users.
    pub fn at(self, stage: &str, span: Span) -> Diagnostic {
        let help = match &self {
            CompileError::OutOfRegisters { .. } => {
                Some("split the expression into smaller `val` bindings".to_string())
            }
            CompileError::UnboundName { name } => {
                Some(format!("bind it first with `val {name} = ...;`"))
            }
            _ if self.is_internal() => Some("this is a compiler bug".to_string()),
            _ => None,
        };
        let mut diag = Diagnostic::error(format!("{stage}: {self}"), span)
            .with_note(self.kind().to_string());
        if let Some(help) = help {
            diag = diag.with_help(help);
        }
        diag
    }
}
