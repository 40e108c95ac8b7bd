//! Recursive statement decoder driven by a [`Registry`].

use crate::ast::{Node, Program};
use crate::diagnostic::Diagnostic;
use crate::error::{CompileError, Result};
use crate::span::Spanned;
use crate::syntax::grammar::Registry;
use crate::syntax::source::SourceStatement;

pub struct Parser<'r> {
    registry: &'r Registry,
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Decode one comment-free statement string.
    ///
    /// The first rule whose validator accepts the trimmed text converts it.
    /// A validator error ends the search immediately.
    pub fn decode(&self, text: &str) -> Result<Node> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CompileError::parse(text, "empty expression"));
        }
        for (tier, rule) in self.registry.rules() {
            if self.registry.matches(tier, rule, text)? {
                tracing::trace!(rule = rule.name, tier = tier.name(), text, "rule matched");
                return rule.convert(self, text);
            }
        }
        Err(CompileError::parse(text, "unrecognized command"))
    }

    /// Decode every statement, stopping at the first failure.
    pub fn parse_program(&self, statements: &[SourceStatement]) -> Result<Program, Diagnostic> {
        let mut program = Program::default();
        for stmt in statements {
            let node = self
                .decode(&stmt.text)
                .map_err(|e| e.at("syntax error", stmt.span))?;
            program.push(Spanned::new(node, stmt.span));
        }
        tracing::debug!(statements = program.len(), "parsed program");
        Ok(program)
    }
}
