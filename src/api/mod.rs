pub(crate) use std::sync::OnceLock;

pub(crate) use crate::ast::Program;
pub(crate) use crate::config::MachineConfig;
pub(crate) use crate::diagnostic::{render_diagnostics, Diagnostic, Diagnostics};
pub(crate) use crate::ir::builder::lower_program;
pub(crate) use crate::ir::lower::{self, lower_pseudo, MachineInstruction};
pub(crate) use crate::ir::regalloc::RegisterAllocator;
pub(crate) use crate::runtime::{self, Execution};
pub(crate) use crate::span::Span;
pub(crate) use crate::syntax::grammar::Registry;
pub(crate) use crate::syntax::parser::Parser;
pub(crate) use crate::syntax::source::split_statements;
pub(crate) use crate::typecheck::TypeChecker;

#[cfg(test)]
mod tests;

/// Options controlling compilation.
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Target machine description.
    pub machine: MachineConfig,
}

impl CompileOptions {
    pub fn for_machine(machine: MachineConfig) -> Self {
        Self { machine }
    }
}

/// Result of a successful compilation.
#[derive(Clone, Debug)]
pub struct Compiled {
    /// Final instructions in the encoder's shape.
    pub instructions: Vec<MachineInstruction>,
    /// Non-fatal diagnostics, in source order per stage.
    pub warnings: Vec<Diagnostic>,
}

impl Compiled {
    /// Text listing, one instruction per line.
    pub fn listing(&self) -> String {
        lower::render(&self.instructions)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        lower::to_json(&self.instructions)
    }
}

/// The standard grammar, built on first use and shared read-only.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::standard)
}

/// Split, parse and type-check. Warnings go into `diags`.
fn front_end(source: &str, diags: &mut Diagnostics) -> Result<Program, Diagnostic> {
    let (statements, warnings) = split_statements(source);
    diags.extend(warnings);
    let program = Parser::new(registry()).parse_program(&statements)?;
    tracing::debug!(
        statements = program.statements.len(),
        kinds = ?program.kinds_used(),
        "parsed"
    );
    TypeChecker::new().check_program(&program)?;
    Ok(program)
}

/// File a stage error, render everything collected so far and hand the
/// errors back to the caller.
fn fail(
    diags: &mut Diagnostics,
    diag: Diagnostic,
    filename: &str,
    source: &str,
) -> Vec<Diagnostic> {
    diags.push(diag);
    render_diagnostics(&diags.warnings, filename, source);
    render_diagnostics(&diags.errors, filename, source);
    std::mem::take(&mut diags.errors)
}

/// Compile a Luka source string for the built-in machine.
pub fn compile(source: &str, filename: &str) -> Result<Compiled, Vec<Diagnostic>> {
    compile_with_options(source, filename, &CompileOptions::default())
}

/// Compile a Luka source string with options.
pub fn compile_with_options(
    source: &str,
    filename: &str,
    options: &CompileOptions,
) -> Result<Compiled, Vec<Diagnostic>> {
    let mut diags = Diagnostics::new();
    if let Err(message) = options.machine.validate() {
        let diag = Diagnostic::error(message, Span::dummy());
        return Err(fail(&mut diags, diag, filename, source));
    }
    let program =
        front_end(source, &mut diags).map_err(|d| fail(&mut diags, d, filename, source))?;

    let mut instructions =
        lower_program(&program).map_err(|d| fail(&mut diags, d, filename, source))?;

    RegisterAllocator::new(options.machine.registers)
        .allocate(&mut instructions)
        .map_err(|e| {
            let line = e
                .instruction()
                .and_then(|i| instructions.get(i))
                .map_or(0, |ins| ins.line);
            let span = if line == 0 { Span::dummy() } else { Span::line(line) };
            fail(&mut diags, e.at("register allocation", span), filename, source)
        })?;

    lower_pseudo(&mut instructions);

    let (instructions, warnings) = lower::emit(&instructions, &options.machine)
        .map_err(|e| {
            let diag = e.at("codegen error", Span::dummy());
            fail(&mut diags, diag, filename, source)
        })?;
    diags.extend(warnings);

    tracing::debug!(
        instructions = instructions.len(),
        warnings = diags.warnings.len(),
        "compiled {}",
        filename
    );
    Ok(Compiled {
        instructions,
        warnings: diags.warnings,
    })
}

/// Parse and type-check only. Returns the warnings.
pub fn check(source: &str, filename: &str) -> Result<Vec<Diagnostic>, Vec<Diagnostic>> {
    let mut diags = Diagnostics::new();
    front_end(source, &mut diags).map_err(|d| fail(&mut diags, d, filename, source))?;
    Ok(diags.warnings)
}

/// Type-check, then execute with the interpreter. Front-end warnings are
/// returned in the execution.
pub fn run(source: &str, filename: &str) -> Result<Execution, Vec<Diagnostic>> {
    let mut diags = Diagnostics::new();
    let program =
        front_end(source, &mut diags).map_err(|d| fail(&mut diags, d, filename, source))?;
    let mut exec = runtime::run(&program).map_err(|d| fail(&mut diags, d, filename, source))?;
    exec.warnings = diags.warnings;
    Ok(exec)
}
