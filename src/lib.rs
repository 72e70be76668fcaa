//! FitFlow onboarding — adaptive onboarding flow engine.
//!
//! Decides which onboarding questions to ask, in what order, and when to
//! stop, based on a chosen Smart Pack (or a custom module selection) and
//! the answers collected so far. Rendering, persistence mechanics, and auth
//! are external collaborators; this crate only computes which steps exist,
//! in which order, and what state a session is in.

pub mod catalog;
pub mod compiler;
pub mod config;
pub mod error;
pub mod flow;
pub mod recommend;
pub mod store;

pub use catalog::{Catalog, ModuleId, PackRegistry, QuestionId, QuestionSelection, SmartPack};
pub use compiler::compile_question_set;
pub use config::EngineConfig;
pub use error::{FlowError, GraphError, Result, StoreError, ValidationFailure};
pub use flow::{
    FlowSession, FlowState, OnboardingData, PackChoice, Step, StepGraph, SubmitOutcome,
};
pub use recommend::{estimated_time_for_pack, recommended_packs};
pub use store::{MemoryStore, ProfileStore, SnapshotWriter};
