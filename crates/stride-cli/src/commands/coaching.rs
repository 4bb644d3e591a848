//! Coaching command implementation

use anyhow::Result;
use stride_core::{coach, AIClient, Error, GoalStore};

use super::ensure_in_progress;

pub async fn cmd_coach(
    store: &GoalStore,
    ai: Option<&AIClient>,
    goal_id: &str,
    question: Option<&str>,
) -> Result<()> {
    let goal = store.find_goal(goal_id)?;
    ensure_in_progress(goal)?;
    let history = store.history(&goal.id);

    println!("🧭 Coaching for: {}", goal.title);

    let advice = match coach(ai, goal, &history, question).await {
        Ok(advice) => advice,
        Err(Error::AiUnavailable) => {
            println!("   💡 Tip: Set OPENAI_API_KEY to enable coaching");
            return Err(Error::AiUnavailable.into());
        }
        Err(e) => return Err(e.into()),
    };

    if !advice.milestones.is_empty() {
        println!();
        println!("🏁 Milestones");
        for (i, milestone) in advice.milestones.iter().enumerate() {
            println!(
                "   {}. {} [{}, {}]",
                i + 1,
                milestone.title,
                milestone.priority.as_str(),
                milestone.timeline
            );
            if !milestone.description.is_empty() {
                println!("      {}", milestone.description);
            }
        }
    }

    if !advice.habits.is_empty() {
        println!();
        println!("🔁 Habits");
        for habit in &advice.habits {
            println!(
                "   • {} ({}, {} impact)",
                habit.name, habit.frequency, habit.impact
            );
            if !habit.description.is_empty() {
                println!("      {}", habit.description);
            }
        }
    }

    println!();
    println!("💬 {}", advice.advice);

    Ok(())
}
