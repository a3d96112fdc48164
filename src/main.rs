use clap::Parser;
use tradekit::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
