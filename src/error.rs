//! Error types for the onboarding flow engine.

use crate::catalog::QuestionId;

/// Top-level error type for the flow engine.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The requested pack id is not in the registry. Recoverable: the caller
    /// must surface it to the user before any step is shown.
    #[error("Unknown smart pack: {0}")]
    UnknownPack(String),

    /// The pack exists but compiled to an empty question sequence (the
    /// custom pack without modules, for instance). The session cannot
    /// proceed; the caller must surface it.
    #[error("Pack {0} compiled to an empty question set; cannot proceed")]
    EmptyQuestionSet(String),

    /// A response failed a step's validation rules. The session state is
    /// unchanged; the failure is also attached to the session for the UI.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    /// An operation that requires an in-progress session was called while
    /// the session was not started or already completed.
    #[error("Flow is not in progress (state: {state})")]
    NotActive { state: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// A single failed validation rule on a step transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize)]
#[error("{step}: {message}")]
pub struct ValidationFailure {
    /// Step the response was submitted for.
    pub step: QuestionId,
    /// Message of the first failing rule, in declaration order.
    pub message: String,
}

/// Persistence collaborator errors. Saves are best-effort; these never roll
/// back an in-memory transition.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Snapshot save failed: {0}")]
    SaveFailed(String),

    #[error("Snapshot load failed: {0}")]
    LoadFailed(String),
}

/// Step-graph misconfiguration found by the validation pass. These are
/// build-time defects, not runtime conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Step {step} has a static next-step pointing at unknown step {target}")]
    DanglingNextStep { step: QuestionId, target: QuestionId },

    #[error("Step {0} is not a catalog question")]
    UnknownQuestion(QuestionId),

    #[error("Pack {pack} asks question {question} that has no step in the graph")]
    PackReferencesUnknownStep { pack: String, question: QuestionId },
}

/// Result type alias for the flow engine.
pub type Result<T> = std::result::Result<T, FlowError>;
