//! CLI entry point for layered collectible generation

use clap::Parser;
use layermint::io::cli::{Cli, CliRunner, init_tracing};

fn main() -> layermint::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    let mut runner = CliRunner::new(cli);
    runner.process().map(|_| ())
}
