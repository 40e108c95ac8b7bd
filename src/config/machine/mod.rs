use std::path::Path;

use crate::diagnostic::Diagnostic;
use crate::span::Span;


/// Register machine description used by allocation and emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    /// Short identifier shown in logs (e.g. "luka16").
    pub name: String,
    /// Size of the register file, `x0` included.
    pub registers: usize,
    /// Width of a machine word; bounds `prnti` immediates.
    pub value_bits: u32,
    /// Width of the signed I-type immediate field.
    pub imm_bits: u32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::luka16()
    }
}

impl MachineConfig {
    /// Built-in machine: 16 registers, 16-bit words, 5-bit immediates.
    pub fn luka16() -> Self {
        Self {
            name: "luka16".to_string(),
            registers: 16,
            value_bits: 16,
            imm_bits: 5,
        }
    }

    /// Load a machine description from a TOML file.
    pub fn load(path: &Path) -> Result<Self, Diagnostic> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Diagnostic::error(
                format!("cannot read machine config '{}': {}", path.display(), e),
                Span::dummy(),
            )
        })?;
        Self::parse_toml(&content, path)
    }

    /// Keys missing from the `[machine]` section keep the built-in values.
    pub fn parse_toml(content: &str, path: &Path) -> Result<Self, Diagnostic> {
        let err =
            |msg: String| Diagnostic::error(format!("{}: {}", path.display(), msg), Span::dummy());

        let mut config = Self::luka16();
        let mut section = String::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                section = trimmed[1..trimmed.len() - 1].trim().to_string();
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(err(format!("expected `key = value`, found '{}'", trimmed)));
            };
            let key = key.trim();
            let value = value.trim();

            match (section.as_str(), key) {
                ("machine", "name") => config.name = value.trim_matches('"').to_string(),
                ("machine", "registers") => {
                    config.registers = value
                        .parse()
                        .map_err(|_| err(format!("invalid machine.registers: {}", value)))?;
                }
                ("machine", "value_bits") => {
                    config.value_bits = value
                        .parse()
                        .map_err(|_| err(format!("invalid machine.value_bits: {}", value)))?;
                }
                ("machine", "imm_bits") => {
                    config.imm_bits = value
                        .parse()
                        .map_err(|_| err(format!("invalid machine.imm_bits: {}", value)))?;
                }
                ("machine", other) => {
                    return Err(err(format!("unknown key machine.{}", other)));
                }
                _ => {}
            }
        }

        config.validate().map_err(err)?;
        Ok(config)
    }

    /// Override the register count, re-checking the limits.
    pub fn with_registers(mut self, registers: usize) -> Result<Self, Diagnostic> {
        self.registers = registers;
        self.validate()
            .map_err(|msg| Diagnostic::error(msg, Span::dummy()))?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("machine.name must not be empty".to_string());
        }
        if !(2..=256).contains(&self.registers) {
            return Err(format!(
                "machine.registers must be in 2..=256 (x0 is reserved), got {}",
                self.registers
            ));
        }
        if !(1..=63).contains(&self.value_bits) {
            return Err(format!(
                "machine.value_bits must be in 1..=63, got {}",
                self.value_bits
            ));
        }
        if self.imm_bits == 0 || self.imm_bits > self.value_bits {
            return Err(format!(
                "machine.imm_bits must be in 1..={}, got {}",
                self.value_bits, self.imm_bits
            ));
        }
        Ok(())
    }
}
