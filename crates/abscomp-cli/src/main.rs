mod cli;
mod commands;
mod logging;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::CompareOptions;

fn main() -> anyhow::Result<()> {
    // Set up Ctrl+C handler for graceful interruption
    ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(130); // Standard exit code for SIGINT
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    logging::init(cli.verbose);

    match &cli.command {
        Commands::Compare {
            csv,
            json,
            dump_libraries,
            output_dir,
            list,
            no_color,
        } => {
            let options = CompareOptions {
                config_path: cli.config.as_deref(),
                csv: *csv,
                json: *json,
                dump_libraries: *dump_libraries,
                output_dir,
                list_limit: *list,
                no_color: *no_color,
            };
            commands::Compare::execute(&options).context("Failed to execute compare command")?;
        }
        Commands::Config => {
            commands::Config::execute(cli.config.as_deref())
                .context("Failed to execute config command")?;
        }
    }

    Ok(())
}
