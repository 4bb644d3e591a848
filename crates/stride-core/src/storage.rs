//! Local goal store
//!
//! Goals and their journal updates live in one JSON file on the user's
//! machine (`{ "goals": [...], "updates": [...] }`). Every mutation rewrites
//! the file atomically through a temp file in the same directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    validate_progress, AppState, Goal, GoalStatus, NewGoal, ProgressAnalysis, ProgressUpdate,
};

/// Prefix added to feedback when an update completes its goal
pub const COMPLETION_PREFIX: &str = "🎉 Congratulations! Goal completed! ";

/// Default state file location
pub fn default_state_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("stride").join("state.json"))
}

/// An update that has been recorded, with the goal as it now stands
#[derive(Debug, Clone)]
pub struct RecordedUpdate {
    pub goal: Goal,
    pub update: ProgressUpdate,
    /// This update moved the goal to completed
    pub auto_completed: bool,
}

impl RecordedUpdate {
    /// Feedback to show the user, with a completion banner when the goal
    /// was just completed
    pub fn feedback(&self) -> String {
        let feedback = self
            .update
            .llm_response
            .as_ref()
            .map(|r| r.feedback.as_str())
            .unwrap_or_default();
        if self.auto_completed {
            format!("{}{}", COMPLETION_PREFIX, feedback)
        } else {
            feedback.to_string()
        }
    }
}

/// JSON-file backed store of goals and updates
#[derive(Debug)]
pub struct GoalStore {
    path: PathBuf,
    state: AppState,
}

impl GoalStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                AppState::default()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    Error::InvalidData(format!("Corrupt state file {}: {}", path.display(), e))
                })?
            }
        } else {
            AppState::default()
        };

        debug!(
            path = %path.display(),
            goals = state.goals.len(),
            updates = state.updates.len(),
            "Opened goal store"
        );
        Ok(Self { path, state })
    }

    /// Open the store at the platform default location
    pub fn open_default() -> Result<Self> {
        let path = default_state_path()
            .ok_or_else(|| Error::Config("Could not determine data directory".into()))?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn goals(&self) -> &[Goal] {
        &self.state.goals
    }

    /// Find a goal by full id or unique id prefix
    pub fn find_goal(&self, id: &str) -> Result<&Goal> {
        let index = self.goal_index(id)?;
        Ok(&self.state.goals[index])
    }

    fn goal_index(&self, id: &str) -> Result<usize> {
        let id = id.trim();
        if let Some(index) = self.state.goals.iter().position(|g| g.id == id) {
            return Ok(index);
        }
        if id.is_empty() {
            return Err(Error::NotFound("Goal id is empty".into()));
        }

        let matches: Vec<usize> = self
            .state
            .goals
            .iter()
            .enumerate()
            .filter(|(_, g)| g.id.starts_with(id))
            .map(|(i, _)| i)
            .collect();

        match matches.as_slice() {
            [index] => Ok(*index),
            [] => Err(Error::NotFound(format!("Goal {}", id))),
            _ => Err(Error::InvalidData(format!(
                "Goal id prefix {} matches {} goals",
                id,
                matches.len()
            ))),
        }
    }

    /// Create a goal with 0% progress
    pub fn add_goal(&mut self, new_goal: NewGoal) -> Result<Goal> {
        let title = new_goal.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidData("Goal title is required".into()));
        }

        let now = Utc::now();
        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: non_blank(new_goal.description),
            initial_progress: non_blank(new_goal.initial_progress),
            context: non_blank(new_goal.context),
            overall_progress: 0.0,
            status: GoalStatus::InProgress,
            created_at: now,
            updated_at: now,
        };

        self.state.goals.push(goal.clone());
        self.save()?;
        info!(goal = %goal.id, title = %goal.title, "Goal created");
        Ok(goal)
    }

    pub fn set_status(&mut self, id: &str, status: GoalStatus) -> Result<Goal> {
        let index = self.goal_index(id)?;
        let goal = &mut self.state.goals[index];
        goal.status = status;
        goal.updated_at = Utc::now();
        let goal = goal.clone();

        self.save()?;
        info!(goal = %goal.id, status = %status, "Goal status changed");
        Ok(goal)
    }

    /// Delete a goal and all of its updates
    pub fn delete_goal(&mut self, id: &str) -> Result<Goal> {
        let index = self.goal_index(id)?;
        let goal = self.state.goals.remove(index);
        let before = self.state.updates.len();
        self.state.updates.retain(|u| u.goal_id != goal.id);

        self.save()?;
        info!(
            goal = %goal.id,
            updates = before - self.state.updates.len(),
            "Goal deleted"
        );
        Ok(goal)
    }

    /// Updates for a goal, oldest first
    pub fn history(&self, goal_id: &str) -> Vec<ProgressUpdate> {
        let mut updates: Vec<ProgressUpdate> = self
            .state
            .updates
            .iter()
            .filter(|u| u.goal_id == goal_id)
            .cloned()
            .collect();
        updates.sort_by_key(|u| u.timestamp);
        updates
    }

    /// Record a journal entry and, when present, its analysis
    ///
    /// The goal takes the analysis's overall progress (clamped to [0, 100])
    /// and is marked completed once it reaches 100. Paused and completed
    /// goals reject new entries.
    pub fn record_update(
        &mut self,
        goal_id: &str,
        journal_entry: &str,
        analysis: Option<ProgressAnalysis>,
    ) -> Result<RecordedUpdate> {
        let journal_entry = journal_entry.trim();
        if journal_entry.is_empty() {
            return Err(Error::InvalidData("Journal entry is required".into()));
        }

        let index = self.goal_index(goal_id)?;
        self.state.goals[index].ensure_in_progress()?;
        let now = Utc::now();
        let goal = &mut self.state.goals[index];

        let mut auto_completed = false;
        if let Some(ref analysis) = analysis {
            let progress = validate_progress(analysis.overall_progress);
            auto_completed = progress >= 100.0;
            goal.overall_progress = progress;
            if progress >= 100.0 {
                goal.status = GoalStatus::Completed;
            }
            goal.updated_at = now;
        }

        let update = ProgressUpdate {
            id: Uuid::new_v4().to_string(),
            goal_id: goal.id.clone(),
            journal_entry: journal_entry.to_string(),
            timestamp: now,
            llm_response: analysis,
        };
        let goal = goal.clone();
        self.state.updates.push(update.clone());

        self.save()?;
        info!(
            goal = %goal.id,
            progress = goal.overall_progress,
            auto_completed,
            "Progress update recorded"
        );
        Ok(RecordedUpdate {
            goal,
            update,
            auto_completed,
        })
    }

    /// Remove every goal and update
    pub fn reset(&mut self) -> Result<()> {
        self.state = AppState::default();
        self.save()?;
        info!(path = %self.path.display(), "Goal store reset");
        Ok(())
    }

    /// Write the state file atomically
    fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut temp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut temp, &self.state)?;
        temp.write_all(b"\n")?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, GoalStore) {
        let dir = TempDir::new().unwrap();
        let store = GoalStore::open(dir.path().join("state.json")).unwrap();
        (dir, store)
    }

    fn new_goal(title: &str) -> NewGoal {
        NewGoal {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn analysis(progress: f64) -> ProgressAnalysis {
        ProgressAnalysis {
            overall_progress: progress,
            progress_increase: 5.0,
            reasoning: "r".into(),
            feedback: "Nice work.".into(),
        }
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let (_dir, store) = store();
        assert!(store.goals().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_add_goal_persists() {
        let (dir, mut store) = store();
        let goal = store
            .add_goal(NewGoal {
                title: "  Run a marathon ".into(),
                description: Some("   ".into()),
                initial_progress: Some("5k".into()),
                context: None,
            })
            .unwrap();
        assert_eq!(goal.title, "Run a marathon");
        assert_eq!(goal.description, None);
        assert_eq!(goal.overall_progress, 0.0);
        assert_eq!(goal.status, GoalStatus::InProgress);

        let reopened = GoalStore::open(dir.path().join("state.json")).unwrap();
        assert_eq!(reopened.goals(), &[goal]);
    }

    #[test]
    fn test_add_goal_requires_title() {
        let (_dir, mut store) = store();
        assert!(matches!(
            store.add_goal(new_goal("  ")),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_find_goal_by_prefix() {
        let (_dir, mut store) = store();
        let goal = store.add_goal(new_goal("Learn Spanish")).unwrap();

        assert_eq!(store.find_goal(&goal.id).unwrap().id, goal.id);
        assert_eq!(store.find_goal(&goal.id[..8]).unwrap().id, goal.id);
        assert!(matches!(store.find_goal("zzzz"), Err(Error::NotFound(_))));
        assert!(matches!(store.find_goal(""), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_ambiguous_prefix() {
        let (_dir, mut store) = store();
        store.add_goal(new_goal("One")).unwrap();
        store.add_goal(new_goal("Two")).unwrap();
        store.state.goals[0].id = "abc-1".into();
        store.state.goals[1].id = "abc-2".into();

        assert!(matches!(store.find_goal("abc"), Err(Error::InvalidData(_))));
        assert_eq!(store.find_goal("abc-2").unwrap().title, "Two");
    }

    #[test]
    fn test_record_update_applies_progress() {
        let (_dir, mut store) = store();
        let goal = store.add_goal(new_goal("Learn Spanish")).unwrap();

        let recorded = store
            .record_update(&goal.id, "Practiced verbs", Some(analysis(30.0)))
            .unwrap();
        assert_eq!(recorded.goal.overall_progress, 30.0);
        assert!(!recorded.auto_completed);
        assert_eq!(recorded.feedback(), "Nice work.");
        assert_eq!(store.history(&goal.id).len(), 1);
    }

    #[test]
    fn test_record_update_clamps_and_auto_completes() {
        let (_dir, mut store) = store();
        let goal = store.add_goal(new_goal("Learn Spanish")).unwrap();

        let recorded = store
            .record_update(&goal.id, "Passed the exam", Some(analysis(120.0)))
            .unwrap();
        assert_eq!(recorded.goal.overall_progress, 100.0);
        assert_eq!(recorded.goal.status, GoalStatus::Completed);
        assert!(recorded.auto_completed);
        assert_eq!(
            recorded.feedback(),
            "🎉 Congratulations! Goal completed! Nice work."
        );

        let again = store.record_update(&goal.id, "Still fluent", Some(analysis(40.0)));
        assert!(matches!(again, Err(Error::InvalidData(_))));
        assert_eq!(store.find_goal(&goal.id).unwrap().overall_progress, 100.0);
        assert_eq!(store.history(&goal.id).len(), 1);
    }

    #[test]
    fn test_record_update_rejects_paused_goal() {
        let (_dir, mut store) = store();
        let goal = store.add_goal(new_goal("Learn Spanish")).unwrap();
        store.set_status(&goal.id, GoalStatus::Paused).unwrap();

        let result = store.record_update(&goal.id, "Practiced verbs", Some(analysis(30.0)));
        assert!(matches!(result, Err(Error::InvalidData(_))));
        assert!(store.history(&goal.id).is_empty());

        // resumed goals take entries again
        store.set_status(&goal.id, GoalStatus::InProgress).unwrap();
        let recorded = store
            .record_update(&goal.id, "Practiced verbs", Some(analysis(30.0)))
            .unwrap();
        assert_eq!(recorded.goal.overall_progress, 30.0);
    }

    #[test]
    fn test_record_update_without_analysis_keeps_goal() {
        let (_dir, mut store) = store();
        let goal = store.add_goal(new_goal("Learn Spanish")).unwrap();

        let recorded = store.record_update(&goal.id, "Rest day", None).unwrap();
        assert_eq!(recorded.goal.overall_progress, 0.0);
        assert!(recorded.update.llm_response.is_none());
        assert_eq!(recorded.feedback(), "");
    }

    #[test]
    fn test_record_update_requires_entry() {
        let (_dir, mut store) = store();
        let goal = store.add_goal(new_goal("Learn Spanish")).unwrap();
        assert!(store.record_update(&goal.id, "   ", None).is_err());
    }

    #[test]
    fn test_delete_goal_cascades_updates() {
        let (_dir, mut store) = store();
        let keep = store.add_goal(new_goal("Keep")).unwrap();
        let drop = store.add_goal(new_goal("Drop")).unwrap();
        store.record_update(&keep.id, "k", None).unwrap();
        store.record_update(&drop.id, "d1", None).unwrap();
        store.record_update(&drop.id, "d2", None).unwrap();

        store.delete_goal(&drop.id).unwrap();
        assert_eq!(store.goals().len(), 1);
        assert_eq!(store.state().updates.len(), 1);
        assert!(store.history(&drop.id).is_empty());
    }

    #[test]
    fn test_set_status() {
        let (_dir, mut store) = store();
        let goal = store.add_goal(new_goal("Learn Spanish")).unwrap();
        let paused = store.set_status(&goal.id, GoalStatus::Paused).unwrap();
        assert_eq!(paused.status, GoalStatus::Paused);
    }

    #[test]
    fn test_reset() {
        let (dir, mut store) = store();
        store.add_goal(new_goal("Learn Spanish")).unwrap();
        store.reset().unwrap();

        let reopened = GoalStore::open(dir.path().join("state.json")).unwrap();
        assert!(reopened.goals().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(GoalStore::open(&path), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_reads_records_without_status() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r#"{"goals":[{"id":"g1","title":"Old goal","overallProgress":40,"createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-02T00:00:00Z"}],"updates":[]}"#,
        )
        .unwrap();

        let store = GoalStore::open(&path).unwrap();
        assert_eq!(store.find_goal("g1").unwrap().status, GoalStatus::InProgress);
    }
}
