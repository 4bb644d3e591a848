//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_store` - Shared utility to open the goal store
//! - `load_settings` / `build_analyzer` - Settings and AI backend setup
//! - `ensure_in_progress` - Refuse entries and coaching for inactive goals
//! - `cmd_reset` - Delete all goals and updates

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use stride_core::{AIBackend, AIClient, Goal, GoalStore, ProgressAnalyzer, Settings};

use super::short_id;

/// Open the goal store at `data`, or at the platform default location
pub fn open_store(data: Option<&Path>) -> Result<GoalStore> {
    match data {
        Some(path) => GoalStore::open(path)
            .with_context(|| format!("Failed to open state file {}", path.display())),
        None => GoalStore::open_default().context("Failed to open state file"),
    }
}

/// Fail with a hint on how to resume a paused or completed goal
pub fn ensure_in_progress(goal: &Goal) -> Result<()> {
    if goal.ensure_in_progress().is_err() {
        anyhow::bail!(
            "\"{}\" is {}. Resume it with: stride goals status {} in-progress",
            goal.title,
            goal.status,
            short_id(&goal.id)
        );
    }
    Ok(())
}

/// Load settings (user override, else embedded defaults)
pub fn load_settings() -> Result<Settings> {
    Settings::load().context("Failed to load settings")
}

/// Build the progress analyzer, with the AI backend from the environment
pub fn build_analyzer(settings: &Settings) -> ProgressAnalyzer {
    let ai = AIClient::from_env(&settings.ai);
    match ai {
        Some(ref client) => {
            tracing::debug!(host = client.host(), model = client.model(), "AI backend configured")
        }
        None => tracing::debug!("AI backend not configured"),
    }
    ProgressAnalyzer::new(ai, settings.financial.clone())
}

/// Ask for confirmation on stdin
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

pub fn cmd_reset(store: &mut GoalStore, yes: bool) -> Result<()> {
    if !yes {
        println!(
            "⚠️  This will delete {} goal(s) and all journal entries.",
            store.goals().len()
        );
        println!("   State file: {}\n", store.path().display());
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.reset()?;
    println!("✅ All goals and journal entries deleted.");
    Ok(())
}
