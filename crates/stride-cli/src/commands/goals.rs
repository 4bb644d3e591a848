//! Goal management commands (list, add, show, status, delete)

use anyhow::Result;
use stride_core::{format_progress, GoalStatus, GoalStore, NewGoal};

use super::{confirm, short_id, truncate};

pub fn cmd_goals_list(store: &GoalStore) -> Result<()> {
    let goals = store.goals();
    if goals.is_empty() {
        println!("No goals yet. Create one with: stride goals add \"<title>\"");
        return Ok(());
    }

    println!(
        "{:<10} {:<40} {:>8}  {:<12} {}",
        "ID", "TITLE", "PROGRESS", "STATUS", "UPDATES"
    );
    println!("{}", "-".repeat(80));

    for goal in goals {
        println!(
            "{:<10} {:<40} {:>8}  {:<12} {}",
            short_id(&goal.id),
            truncate(&goal.title, 40),
            format_progress(goal.overall_progress),
            goal.status,
            store.history(&goal.id).len()
        );
    }

    Ok(())
}

pub fn cmd_goals_add(
    store: &mut GoalStore,
    title: String,
    description: Option<String>,
    initial_progress: Option<String>,
    context: Option<String>,
) -> Result<()> {
    let goal = store.add_goal(NewGoal {
        title,
        description,
        initial_progress,
        context,
    })?;

    println!("✅ Created goal: {}", goal.title);
    println!("   ID: {}", goal.id);
    println!();
    println!("Next steps:");
    println!(
        "  1. Record progress: stride update {} \"<what you did>\"",
        short_id(&goal.id)
    );
    println!("  2. Get coaching: stride coach {}", short_id(&goal.id));

    Ok(())
}

pub fn cmd_goals_show(store: &GoalStore, id: &str) -> Result<()> {
    let goal = store.find_goal(id)?;
    let history = store.history(&goal.id);

    println!("🎯 {}", goal.title);
    println!("   ID:       {}", goal.id);
    println!("   Status:   {}", goal.status);
    println!("   Progress: {}", format_progress(goal.overall_progress));
    if let Some(ref description) = goal.description {
        println!("   Description: {}", description);
    }
    if let Some(ref initial) = goal.initial_progress {
        println!("   Started at:  {}", initial);
    }
    if let Some(ref context) = goal.context {
        println!("   Context:     {}", context);
    }
    println!("   Updates:  {}", history.len());

    if let Some(latest) = history.last() {
        println!();
        println!("Latest entry: {}", truncate(&latest.journal_entry, 70));
        if let Some(ref analysis) = latest.llm_response {
            println!("   {}", analysis.feedback);
        }
    }

    Ok(())
}

pub fn cmd_goals_status(store: &mut GoalStore, id: &str, status: &str) -> Result<()> {
    let status: GoalStatus = status.parse().map_err(anyhow::Error::msg)?;
    let goal = store.set_status(id, status)?;
    println!("✅ {} is now {}", goal.title, goal.status);
    Ok(())
}

pub fn cmd_goals_delete(store: &mut GoalStore, id: &str, yes: bool) -> Result<()> {
    let goal = store.find_goal(id)?;

    if !yes {
        let count = store.history(&goal.id).len();
        println!(
            "⚠️  This will delete \"{}\" and its {} journal entries.\n",
            goal.title, count
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let goal = store.delete_goal(id)?;
    println!("🗑️  Deleted goal: {}", goal.title);
    Ok(())
}
