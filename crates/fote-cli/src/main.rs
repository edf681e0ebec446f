//! FOTE CLI: the `fote` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing(cli.verbose);

    match cli.command {
        Commands::Classify {
            eigenvalues,
            radial_threshold,
            spiral_threshold,
            near_zero,
            json,
        } => commands::classify::run(commands::classify::Args {
            eigenvalues,
            radial_threshold,
            spiral_threshold,
            near_zero,
            json_output: json,
        }),

        Commands::Estimate {
            sample,
            config,
            json,
        } => commands::estimate::run(sample, config, json),

        Commands::Analyze {
            input,
            config,
            output,
            sequential,
            json,
        } => commands::analyze::run(commands::analyze::Args {
            input,
            config,
            output,
            sequential,
            json_output: json,
        }),

        Commands::InitConfig { path, force } => commands::init_config::run(path, force),
    }
}
