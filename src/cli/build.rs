use std::path::PathBuf;
use std::process;

use clap::Args;

use super::{default_output, read_source, report, resolve_machine};

#[derive(Args)]
pub struct BuildArgs {
    /// Input .luka file
    pub input: PathBuf,
    /// Output .json file (default: <input>.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Machine description (TOML with a [machine] section)
    #[arg(long, value_name = "PATH")]
    pub machine: Option<PathBuf>,
    /// Override the register count, x0 included
    #[arg(long, value_name = "N")]
    pub registers: Option<usize>,
}

pub fn cmd_build(args: BuildArgs) {
    let BuildArgs {
        input,
        output,
        machine,
        registers,
    } = args;
    let file = read_source(&input);
    let machine = match resolve_machine(machine.as_deref(), registers) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {}", e.message);
            process::exit(1);
        }
    };

    let options = luka::CompileOptions::for_machine(machine);
    let compiled = match luka::compile_with_options(&file.text, &file.filename(), &options) {
        Ok(c) => c,
        Err(_) => process::exit(1),
    };
    report(&compiled.warnings, &file);

    let json = match compiled.to_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("error: cannot serialize instructions: {}", e);
            process::exit(1);
        }
    };
    let out_path = output.unwrap_or_else(|| default_output(&input));
    if let Err(e) = std::fs::write(&out_path, json + "\n") {
        eprintln!("error: cannot write '{}': {}", out_path.display(), e);
        process::exit(1);
    }
    eprintln!(
        "Compiled {} -> {} ({} instructions)",
        input.display(),
        out_path.display(),
        compiled.instructions.len()
    );
}
