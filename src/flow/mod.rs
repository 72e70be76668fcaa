//! The flow engine: step graph, per-session data, and the session state
//! machine that walks the graph filtered by a compiled question sequence.

pub mod data;
pub mod graph;
pub mod session;
pub mod step;

pub use data::{OnboardingData, Progress};
pub use graph::StepGraph;
pub use session::{FlowSession, FlowState, PackChoice, SubmitOutcome};
pub use step::{InputType, NextStep, Step, StepOption, StepType, ValidationRule};
