//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stride - Track goals with journal entries and AI coaching
#[derive(Parser)]
#[command(name = "stride")]
#[command(about = "Goal tracker with progress estimates and coaching", long_about = None)]
#[command(version)]
pub struct Cli {
    /// State file path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage goals
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Record a journal entry for a goal and estimate the new progress
    Update {
        /// Goal ID (or unique prefix)
        goal: String,

        /// What you did
        entry: String,
    },

    /// Show the journal entries recorded for a goal
    History {
        /// Goal ID (or unique prefix)
        goal: String,

        /// Print updates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get milestones, habits and advice for a goal
    Coach {
        /// Goal ID (or unique prefix)
        goal: String,

        /// Ask a specific question
        #[arg(short, long)]
        question: Option<String>,
    },

    /// Compute financial progress from text, without storing anything
    Estimate {
        /// Goal text containing the target (e.g., "Grow bankroll to $3,000")
        #[arg(long)]
        goal: String,

        /// Journal entry containing the current amount
        #[arg(long)]
        entry: String,

        /// Previous progress percentage, for the delta
        #[arg(long)]
        previous: Option<f64>,
    },

    /// Manage AI prompts (list, show, customize)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origin (repeatable)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },

    /// Delete all goals and journal entries
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List all goals
    List,

    /// Create a goal
    Add {
        /// Goal title (e.g., "Bankroll Challenge")
        title: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Where you are starting from
        #[arg(long)]
        initial: Option<String>,

        /// Additional context (e.g., "Reach $3,000")
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Show a goal and its latest update
    Show {
        /// Goal ID (or unique prefix)
        goal: String,
    },

    /// Change a goal's status
    Status {
        /// Goal ID (or unique prefix)
        goal: String,

        /// New status: in-progress, paused, completed
        status: String,
    },

    /// Delete a goal and its journal entries
    Delete {
        /// Goal ID (or unique prefix)
        goal: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (analyze_progress, coach_goal)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
