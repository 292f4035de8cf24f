use clap::Parser;
use colored::Colorize;
use swarmsong_cli::Cli;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = swarmsong_cli::run(&cli) {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
