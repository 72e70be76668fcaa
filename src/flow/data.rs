//! Per-session onboarding data — validated answers plus progress tracking.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{QuestionId, ids};

/// Progress bookkeeping for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progress {
    /// Step the session is currently positioned on, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<QuestionId>,
    /// Completed steps in completion order. Append is idempotent: an id is
    /// never added twice, so the length is monotonically non-decreasing.
    pub completed_steps: Vec<QuestionId>,
    /// Estimated total steps for this session. Revised as branching reveals
    /// or hides steps; consumers must tolerate non-monotonic changes.
    pub total_steps: usize,
    /// Steps passed over without an answer.
    pub skip_count: u32,
}

impl Progress {
    /// Mark a step completed. Returns false if it was already recorded.
    pub fn complete(&mut self, id: QuestionId) -> bool {
        if self.completed_steps.contains(&id) {
            return false;
        }
        self.completed_steps.push(id);
        true
    }

    pub fn is_completed(&self, id: &QuestionId) -> bool {
        self.completed_steps.contains(id)
    }
}

/// The mutable per-session aggregate: every validated answer keyed by
/// question id, a few typed convenience fields merged from them, and the
/// session's progress. Owned by exactly one session, mutated only by the
/// flow engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_objective: Option<String>,
    /// Sports picked on `sport_selection`; drives sport-specific branching.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sports: Vec<String>,
    /// Raw validated answers keyed by question id.
    pub answers: BTreeMap<String, Value>,
    pub progress: Progress,
    pub started_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Default for OnboardingData {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            name: None,
            age: None,
            main_objective: None,
            sports: Vec::new(),
            answers: BTreeMap::new(),
            progress: Progress::default(),
            started_at: now,
            last_updated: now,
        }
    }
}

impl OnboardingData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a validated answer and merge it into the typed fields.
    pub fn record_answer(&mut self, step: &QuestionId, response: Value) {
        match step.as_str() {
            ids::GET_NAME => {
                if let Some(name) = response.as_str() {
                    self.name = Some(name.trim().to_string());
                }
            }
            ids::MAIN_OBJECTIVE => {
                if let Some(objective) = response.as_str() {
                    self.main_objective = Some(objective.to_string());
                }
            }
            ids::PERSONAL_INFO => {
                if let Some(age) = response.get("age").and_then(Value::as_u64) {
                    self.age = Some(age as u32);
                }
            }
            ids::SPORT_SELECTION => {
                if let Some(sports) = response.as_array() {
                    self.sports = sports
                        .iter()
                        .filter_map(|v| v.as_str().map(String::from))
                        .collect();
                }
            }
            _ => {}
        }
        self.answers.insert(step.as_str().to_string(), response);
        self.last_updated = Utc::now();
    }

    pub fn answer(&self, step: &QuestionId) -> Option<&Value> {
        self.answers.get(step.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_answer_merges_typed_fields() {
        let mut data = OnboardingData::new();

        data.record_answer(&QuestionId::from(ids::GET_NAME), json!("  Alice "));
        assert_eq!(data.name.as_deref(), Some("Alice"));

        data.record_answer(&QuestionId::from(ids::MAIN_OBJECTIVE), json!("weight_loss"));
        assert_eq!(data.main_objective.as_deref(), Some("weight_loss"));

        data.record_answer(&QuestionId::from(ids::PERSONAL_INFO), json!({"age": 34}));
        assert_eq!(data.age, Some(34));

        data.record_answer(
            &QuestionId::from(ids::SPORT_SELECTION),
            json!(["running", "cycling"]),
        );
        assert_eq!(data.sports, vec!["running", "cycling"]);
    }

    #[test]
    fn raw_answers_kept_by_question_id() {
        let mut data = OnboardingData::new();
        data.record_answer(&QuestionId::from(ids::SLEEP_SETUP), json!(7.5));
        assert_eq!(
            data.answer(&QuestionId::from(ids::SLEEP_SETUP)),
            Some(&json!(7.5))
        );
        assert!(data.answer(&QuestionId::from(ids::WELCOME)).is_none());
    }

    #[test]
    fn completed_steps_append_is_idempotent() {
        let mut progress = Progress::default();
        assert!(progress.complete(QuestionId::from(ids::WELCOME)));
        assert!(!progress.complete(QuestionId::from(ids::WELCOME)));
        assert_eq!(progress.completed_steps.len(), 1);
        assert!(progress.is_completed(&QuestionId::from(ids::WELCOME)));
    }

    #[test]
    fn serde_roundtrip() {
        let mut data = OnboardingData::new();
        data.record_answer(&QuestionId::from(ids::GET_NAME), json!("Bob"));
        data.progress.complete(QuestionId::from(ids::WELCOME));
        data.progress.total_steps = 12;

        let json = serde_json::to_string(&data).unwrap();
        let parsed: OnboardingData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("Bob"));
        assert_eq!(parsed.progress.completed_steps.len(), 1);
        assert_eq!(parsed.progress.total_steps, 12);
    }
}
