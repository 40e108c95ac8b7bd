use std::path::PathBuf;
use std::process;

use clap::Args;

use super::{read_source, report};

#[derive(Args)]
pub struct RunArgs {
    /// Input .luka file
    pub input: PathBuf,
}

pub fn cmd_run(args: RunArgs) {
    let file = read_source(&args.input);
    match luka::run(&file.text, &file.filename()) {
        Ok(exec) => {
            report(&exec.warnings, &file);
            for line in &exec.output {
                println!("{}", line);
            }
        }
        Err(_) => process::exit(1),
    }
}
