//! Integration tests for stride-core
//!
//! These tests exercise the full add goal → analyze entry → record update
//! workflow against a store on disk.

use stride_core::{
    ai::MockBackend, AIClient, AnalysisSource, FinancialConfig, GoalStatus, GoalStore, NewGoal,
    ProgressAnalyzer, Settings,
};
use tempfile::TempDir;

fn new_goal(title: &str, context: Option<&str>) -> NewGoal {
    NewGoal {
        title: title.to_string(),
        description: None,
        initial_progress: None,
        context: context.map(String::from),
    }
}

#[tokio::test]
async fn test_financial_goal_workflow() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    let mut store = GoalStore::open(&path).unwrap();
    let analyzer = ProgressAnalyzer::new(None, FinancialConfig::default());

    let goal = store
        .add_goal(new_goal("Bankroll Challenge", Some("Reach $3,000 by March")))
        .unwrap();

    // First entry: 1,500 of 3,000
    let history = store.history(&goal.id);
    let outcome = analyzer
        .analyze(&goal, "Current bankroll: $1,500", &history)
        .await;
    assert_eq!(outcome.source, AnalysisSource::Financial);
    let recorded = store
        .record_update(&goal.id, "Current bankroll: $1,500", Some(outcome.analysis))
        .unwrap();
    assert_eq!(recorded.goal.overall_progress, 50.0);

    // Second entry: delta is measured against the first
    let goal = store.find_goal(&goal.id).unwrap().clone();
    let history = store.history(&goal.id);
    let outcome = analyzer
        .analyze(&goal, "Current bankroll: $2,400", &history)
        .await;
    assert_eq!(outcome.analysis.overall_progress, 80.0);
    assert_eq!(outcome.analysis.progress_increase, 30.0);

    // Hitting the target completes the goal
    let recorded = store
        .record_update(&goal.id, "Current bankroll: $2,400", Some(outcome.analysis))
        .unwrap();
    assert!(!recorded.auto_completed);

    let goal = store.find_goal(&goal.id).unwrap().clone();
    let history = store.history(&goal.id);
    let outcome = analyzer
        .analyze(&goal, "Current bankroll: $3,100", &history)
        .await;
    let recorded = store
        .record_update(&goal.id, "Current bankroll: $3,100", Some(outcome.analysis))
        .unwrap();
    assert!(recorded.auto_completed);
    assert_eq!(recorded.goal.status, GoalStatus::Completed);
    assert!(recorded
        .feedback()
        .starts_with("🎉 Congratulations! Goal completed! "));

    // Everything survived on disk
    let reopened = GoalStore::open(&path).unwrap();
    assert_eq!(reopened.history(&goal.id).len(), 3);
    assert_eq!(reopened.find_goal(&goal.id).unwrap().overall_progress, 100.0);
}

#[tokio::test]
async fn test_model_goal_workflow() {
    let dir = TempDir::new().unwrap();
    let mut store = GoalStore::open(dir.path().join("state.json")).unwrap();
    let analyzer = ProgressAnalyzer::new(Some(AIClient::mock()), FinancialConfig::default());

    let goal = store.add_goal(new_goal("Learn Spanish", None)).unwrap();
    let outcome = analyzer
        .analyze(&goal, "Practiced verbs for an hour", &[])
        .await;
    assert_eq!(outcome.source, AnalysisSource::Model);

    let recorded = store
        .record_update(&goal.id, "Practiced verbs for an hour", Some(outcome.analysis))
        .unwrap();
    assert_eq!(recorded.goal.overall_progress, 5.0);
}

#[tokio::test]
async fn test_failed_analysis_keeps_progress() {
    let dir = TempDir::new().unwrap();
    let mut store = GoalStore::open(dir.path().join("state.json")).unwrap();
    let analyzer = ProgressAnalyzer::new(
        Some(AIClient::Mock(MockBackend::new())),
        FinancialConfig::default(),
    );

    let goal = store.add_goal(new_goal("Learn Spanish", None)).unwrap();
    let first = analyzer.analyze(&goal, "Day one", &[]).await;
    store
        .record_update(&goal.id, "Day one", Some(first.analysis))
        .unwrap();

    let failing = ProgressAnalyzer::new(
        Some(AIClient::Mock(MockBackend::failing())),
        FinancialConfig::default(),
    );
    let goal = store.find_goal(&goal.id).unwrap().clone();
    let outcome = failing.analyze(&goal, "Day two", &[]).await;
    assert_eq!(outcome.source, AnalysisSource::Unavailable);

    // the entry is still saved and the goal does not regress
    let recorded = store
        .record_update(&goal.id, "Day two", Some(outcome.analysis))
        .unwrap();
    assert_eq!(recorded.goal.overall_progress, 5.0);
    assert_eq!(store.history(&goal.id).len(), 2);
}

#[test]
fn test_embedded_settings_drive_calculator() {
    let settings = Settings::embedded().unwrap();
    let analyzer = ProgressAnalyzer::new(None, settings.financial);
    assert!(analyzer.calculator().config().is_financial("Save $500"));
}
