//! Progress commands (update, history, estimate)

use anyhow::Result;
use chrono::Local;
use stride_core::financial::FinancialAssessment;
use stride_core::{
    format_progress, AnalysisSource, FinancialConfig, FinancialProgressCalculator, GoalStore,
    ProgressAnalyzer,
};

use super::{ensure_in_progress, truncate};

/// Record a journal entry and print the estimate it received
///
/// The entry is stored even when no estimate could be made. Paused and
/// completed goals are refused before any analysis runs.
pub async fn cmd_update(
    store: &mut GoalStore,
    analyzer: &ProgressAnalyzer,
    goal_id: &str,
    entry: &str,
) -> Result<()> {
    let goal = store.find_goal(goal_id)?.clone();
    ensure_in_progress(&goal)?;
    let history = store.history(&goal.id);

    println!("📝 Analyzing progress for: {}", goal.title);
    let outcome = analyzer.analyze(&goal, entry, &history).await;

    let recorded = store.record_update(&goal.id, entry, Some(outcome.analysis.clone()))?;
    let analysis = &outcome.analysis;

    println!();
    println!(
        "📊 Progress: {} → {} (+{})",
        format_progress(goal.overall_progress),
        format_progress(recorded.goal.overall_progress),
        format_progress(analysis.progress_increase)
    );
    println!("   {}", analysis.reasoning);
    println!();
    println!("💬 {}", recorded.feedback());

    match outcome.source {
        AnalysisSource::Financial => println!("\n   (computed from amounts, no AI call)"),
        AnalysisSource::Model => {}
        AnalysisSource::ParseFallback | AnalysisSource::Unavailable => {
            if let Some(ref err) = outcome.error {
                println!("\n   ⚠️  AI analysis unavailable: {}", err);
            }
            println!("   💡 Tip: Set OPENAI_API_KEY to enable AI progress estimates");
        }
    }

    Ok(())
}

pub fn cmd_history(store: &GoalStore, goal_id: &str, json: bool) -> Result<()> {
    let goal = store.find_goal(goal_id)?;
    let history = store.history(&goal.id);

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    println!("📜 {} ({})", goal.title, format_progress(goal.overall_progress));
    if history.is_empty() {
        println!("   No journal entries yet.");
        return Ok(());
    }

    for update in &history {
        let when = update.timestamp.with_timezone(&Local);
        let progress = update
            .llm_response
            .as_ref()
            .map(|r| format_progress(r.overall_progress))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {}  {:>5}  {}",
            when.format("%Y-%m-%d %H:%M"),
            progress,
            truncate(&update.journal_entry, 60)
        );
    }

    Ok(())
}

/// Run the financial calculator on free text
pub fn cmd_estimate(
    config: &FinancialConfig,
    goal_text: &str,
    entry: &str,
    previous: Option<f64>,
) -> Result<()> {
    let calculator = FinancialProgressCalculator::new(config.clone());
    let history: Vec<f64> = previous.into_iter().collect();

    match calculator.compute(goal_text, entry, &history) {
        FinancialAssessment::Computed(progress) => {
            println!("💰 {}", progress.explanation);
            println!(
                "   Progress: {} (+{})",
                format_progress(progress.percentage),
                format_progress(progress.delta)
            );
            println!("   {}", progress.feedback);
        }
        FinancialAssessment::NotApplicable(reason) => {
            println!("ℹ️  No financial estimate: {}", reason);
        }
    }

    Ok(())
}
