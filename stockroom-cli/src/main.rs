use clap::Parser;
use colored::*;

use stockroom_cli::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .format_timestamp(None)
        .init();

    if let Err(err) = cli::run(args).await {
        log::debug!("Command failed: {:?}", err);
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}
