use clap::Parser;
use velatrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
