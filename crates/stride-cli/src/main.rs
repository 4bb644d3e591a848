//! Stride CLI - Goal tracking with progress estimates and coaching
//!
//! Usage:
//!   stride goals add "Save $5,000"     Create a goal
//!   stride update <goal> "Balance..."  Record a journal entry
//!   stride coach <goal> -q "..."       Ask for coaching
//!   stride serve --port 3000           Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let data = cli.data.as_deref();

    match cli.command {
        Commands::Goals { action } => {
            let mut store = commands::open_store(data)?;
            match action {
                None | Some(GoalsAction::List) => commands::cmd_goals_list(&store),
                Some(GoalsAction::Add {
                    title,
                    description,
                    initial,
                    context,
                }) => commands::cmd_goals_add(&mut store, title, description, initial, context),
                Some(GoalsAction::Show { goal }) => commands::cmd_goals_show(&store, &goal),
                Some(GoalsAction::Status { goal, status }) => {
                    commands::cmd_goals_status(&mut store, &goal, &status)
                }
                Some(GoalsAction::Delete { goal, yes }) => {
                    commands::cmd_goals_delete(&mut store, &goal, yes)
                }
            }
        }
        Commands::Update { goal, entry } => {
            let mut store = commands::open_store(data)?;
            let settings = commands::load_settings()?;
            let analyzer = commands::build_analyzer(&settings);
            commands::cmd_update(&mut store, &analyzer, &goal, &entry).await
        }
        Commands::History { goal, json } => {
            let store = commands::open_store(data)?;
            commands::cmd_history(&store, &goal, json)
        }
        Commands::Coach { goal, question } => {
            let store = commands::open_store(data)?;
            let settings = commands::load_settings()?;
            let analyzer = commands::build_analyzer(&settings);
            commands::cmd_coach(&store, analyzer.ai(), &goal, question.as_deref()).await
        }
        Commands::Estimate {
            goal,
            entry,
            previous,
        } => {
            let settings = commands::load_settings()?;
            commands::cmd_estimate(&settings.financial, &goal, &entry, previous)
        }
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
        } => {
            let settings = commands::load_settings()?;
            commands::cmd_serve(
                settings,
                &host,
                port,
                static_dir.as_deref(),
                allowed_origins,
            )
            .await
        }
        Commands::Reset { yes } => {
            let mut store = commands::open_store(data)?;
            commands::cmd_reset(&mut store, yes)
        }
    }
}
