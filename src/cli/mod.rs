pub mod asm;
pub mod build;
pub mod check;
pub mod run;

use std::path::{Path, PathBuf};
use std::process;

use luka::config::MachineConfig;
use luka::diagnostic::{render_diagnostics, Diagnostic};
use luka::span::Span;
use tracing_subscriber::EnvFilter;

/// Install the log subscriber. `RUST_LOG` wins over `--debug`.
pub fn init_tracing(debug: bool) {
    let default = if debug { "luka=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// A source file read from disk, plus warnings about how it was named.
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    pub warnings: Vec<Diagnostic>,
}

impl SourceFile {
    pub fn filename(&self) -> String {
        self.path.display().to_string()
    }
}

pub fn load_source(path: &Path) -> Result<SourceFile, Diagnostic> {
    let mut warnings = Vec::new();
    if !path.extension().is_some_and(|e| e == "luka") {
        warnings.push(Diagnostic::warning(
            "file name does not end in .luka".to_string(),
            Span::dummy(),
        ));
    }
    let text = std::fs::read_to_string(path).map_err(|e| {
        Diagnostic::error(
            format!("cannot read '{}': {}", path.display(), e),
            Span::dummy(),
        )
    })?;
    Ok(SourceFile {
        path: path.to_path_buf(),
        text,
        warnings,
    })
}

/// Read the input file or exit with status 1.
pub fn read_source(path: &Path) -> SourceFile {
    match load_source(path) {
        Ok(file) => {
            report(&file.warnings, &file);
            file
        }
        Err(e) => {
            eprintln!("error: {}", e.message);
            process::exit(1);
        }
    }
}

pub fn report(diagnostics: &[Diagnostic], file: &SourceFile) {
    render_diagnostics(diagnostics, &file.filename(), &file.text);
}

/// Machine from `--machine` and `--registers`, built-in otherwise.
pub fn resolve_machine(
    machine: Option<&Path>,
    registers: Option<usize>,
) -> Result<MachineConfig, Diagnostic> {
    let config = match machine {
        Some(path) => MachineConfig::load(path)?,
        None => MachineConfig::luka16(),
    };
    match registers {
        Some(n) => config.with_registers(n),
        None => Ok(config),
    }
}

/// `prog.luka` -> `prog.json`
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("json")
}
