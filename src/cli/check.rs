use std::path::PathBuf;
use std::process;

use clap::Args;

use super::{read_source, report};

#[derive(Args)]
pub struct CheckArgs {
    /// Input .luka file
    pub input: PathBuf,
}

pub fn cmd_check(args: CheckArgs) {
    let file = read_source(&args.input);
    match luka::check(&file.text, &file.filename()) {
        Ok(warnings) => {
            report(&warnings, &file);
            eprintln!("OK: {}", args.input.display());
        }
        Err(_) => process::exit(1),
    }
}
