//! Configuration types.

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minutes a user is assumed to spend per question.
    pub minutes_per_question: f64,
    /// Time estimate returned for an unknown pack id. Never zero: an
    /// unknown pack must not imply "no time needed".
    pub fallback_estimate_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            minutes_per_question: 0.5, // 30 seconds per question
            fallback_estimate_minutes: 15,
        }
    }
}
