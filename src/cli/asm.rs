use std::path::PathBuf;
use std::process;

use clap::Args;

use super::{read_source, report, resolve_machine};

#[derive(Args)]
pub struct AsmArgs {
    /// Input .luka file
    pub input: PathBuf,
    /// Machine description (TOML with a [machine] section)
    #[arg(long, value_name = "PATH")]
    pub machine: Option<PathBuf>,
    /// Override the register count, x0 included
    #[arg(long, value_name = "N")]
    pub registers: Option<usize>,
}

/// Print the final listing to stdout.
pub fn cmd_asm(args: AsmArgs) {
    let file = read_source(&args.input);
    let machine = match resolve_machine(args.machine.as_deref(), args.registers) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {}", e.message);
            process::exit(1);
        }
    };
    let options = luka::CompileOptions::for_machine(machine);
    match luka::compile_with_options(&file.text, &file.filename(), &options) {
        Ok(compiled) => {
            report(&compiled.warnings, &file);
            println!("{}", compiled.listing());
        }
        Err(_) => process::exit(1),
    }
}
