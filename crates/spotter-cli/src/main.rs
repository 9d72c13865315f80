//! Spotter CLI - log gym sessions with your training group

mod cli;
mod commands;
mod config_file;
mod error;

use clap::Parser;
use spotter_core::util::local_today;

use crate::cli::{Cli, Commands};
use crate::commands::common::resolve_db_path;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::exercises::run_exercises;
use crate::commands::log::{log_request, run_log};
use crate::commands::profile::run_profile;
use crate::commands::react::run_react;
use crate::commands::sessions::run_sessions;
use crate::commands::stats::{
    run_compare, run_leaderboard, run_progress, run_records, run_stats, ProgressArgs,
};
use crate::commands::watch::run_watch;
use crate::config_file::resolve_config_path;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("spotter=info".parse().expect("valid log directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);
    let config_path = resolve_config_path(cli.config);

    match cli.command {
        Commands::Profile { command } => run_profile(command, &db_path, &config_path).await?,
        Commands::Log {
            body_part,
            date,
            exercises,
            sets,
            partners,
            notes,
        } => {
            let request = log_request(
                date.as_deref(),
                local_today(),
                body_part,
                exercises,
                &sets,
                partners,
                notes,
            )?;
            run_log(request, &db_path, &config_path).await?;
        }
        Commands::Sessions { command } => run_sessions(command, &db_path, &config_path).await?,
        Commands::Stats { user, json } => {
            run_stats(user.as_deref(), json, &db_path, &config_path).await?;
        }
        Commands::Leaderboard { exercise, json } => {
            run_leaderboard(&exercise, json, &db_path, &config_path).await?;
        }
        Commands::Records { user, json } => {
            run_records(user.as_deref(), json, &db_path, &config_path).await?;
        }
        Commands::Progress {
            exercise,
            user,
            limit,
            all,
            json,
        } => {
            let args = ProgressArgs {
                exercise: &exercise,
                user: user.as_deref(),
                limit,
                all,
                json,
            };
            run_progress(args, &db_path, &config_path).await?;
        }
        Commands::Compare {
            exercise,
            users,
            json,
        } => run_compare(&exercise, &users, json, &db_path, &config_path).await?,
        Commands::Exercises { command } => run_exercises(command, &db_path, &config_path).await?,
        Commands::React { command } => run_react(command, &db_path, &config_path).await?,
        Commands::Watch { interval } => run_watch(interval, &db_path, &config_path).await?,
        Commands::Config { command } => run_config(command, &config_path)?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
