mod cli;

use clap::{Parser, Subcommand};

use cli::asm::AsmArgs;
use cli::build::BuildArgs;
use cli::check::CheckArgs;
use cli::run::RunArgs;

#[derive(Parser)]
#[command(
    name = "lukac",
    version,
    about = "Luka compiler for the luka16 register machine"
)]
struct Cli {
    /// Log pipeline stages (same as RUST_LOG=luka=debug)
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a .luka file to JSON machine instructions
    Build(BuildArgs),
    /// Parse and type-check without generating code
    Check(CheckArgs),
    /// Type-check and interpret a .luka file
    Run(RunArgs),
    /// Print the final instruction listing
    Asm(AsmArgs),
}

fn main() {
    let cli = Cli::parse();
    cli::init_tracing(cli.debug);

    match cli.command {
        Command::Build(args) => cli::build::cmd_build(args),
        Command::Check(args) => cli::check::cmd_check(args),
        Command::Run(args) => cli::run::cmd_run(args),
        Command::Asm(args) => cli::asm::cmd_asm(args),
    }
}
