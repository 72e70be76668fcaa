//! Flow session — drives one user's traversal of the step graph, filtered
//! by their compiled question sequence.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::catalog::{CUSTOM_PACK, Catalog, ModuleId, PackRegistry, QuestionId};
use crate::compiler::compile_question_set;
use crate::config::EngineConfig;
use crate::error::{FlowError, Result, ValidationFailure};

use super::data::OnboardingData;
use super::graph::StepGraph;
use super::step::{Step, StepType};

/// What the caller selected when starting the flow.
#[derive(Debug, Clone)]
pub enum PackChoice {
    /// A smart pack by id.
    Pack(String),
    /// The custom pack with an explicit module list.
    Custom(Vec<ModuleId>),
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    NotStarted,
    InProgress,
    Completed,
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// Outcome of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The session advanced to this step.
    Advanced(QuestionId),
    /// No applicable successor remained; the flow is complete.
    Completed,
}

/// Where the advance loop landed (computed before any state is mutated).
enum Advance {
    Next { id: QuestionId, skipped: u32 },
    Completed { skipped: u32 },
}

/// One user's live onboarding session: the compiled question sequence, the
/// accumulated data, and the current position. Owns its `OnboardingData`
/// exclusively; all transitions are synchronous, pure computations.
pub struct FlowSession {
    id: Uuid,
    graph: Arc<StepGraph>,
    catalog: Arc<Catalog>,
    registry: Arc<PackRegistry>,
    config: EngineConfig,
    sequence: Vec<QuestionId>,
    active_modules: Vec<ModuleId>,
    data: OnboardingData,
    state: FlowState,
    last_error: Option<ValidationFailure>,
}

impl FlowSession {
    pub fn new(
        graph: Arc<StepGraph>,
        catalog: Arc<Catalog>,
        registry: Arc<PackRegistry>,
        config: EngineConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            graph,
            catalog,
            registry,
            config,
            sequence: Vec::new(),
            active_modules: Vec::new(),
            data: OnboardingData::new(),
            state: FlowState::NotStarted,
            last_error: None,
        }
    }

    /// Session over the built-in catalog, packs, and step graph.
    pub fn with_defaults() -> Self {
        let catalog = Catalog::default();
        let registry = PackRegistry::builtin(&catalog);
        Self::new(
            Arc::new(StepGraph::default()),
            Arc::new(catalog),
            Arc::new(registry),
            EngineConfig::default(),
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn data(&self) -> &OnboardingData {
        &self.data
    }

    pub fn sequence(&self) -> &[QuestionId] {
        &self.sequence
    }

    pub fn active_modules(&self) -> &[ModuleId] {
        &self.active_modules
    }

    /// Validation failure from the most recent rejected submit, for the UI.
    pub fn last_error(&self) -> Option<&ValidationFailure> {
        self.last_error.as_ref()
    }

    /// The step the session is currently positioned on.
    pub fn current_step(&self) -> Option<&Step> {
        self.data
            .progress
            .current_step
            .as_ref()
            .and_then(|id| self.graph.get(id))
    }

    /// Compile the question set and position on the first applicable step.
    ///
    /// An unknown pack id is a recoverable error the caller must surface
    /// before any step is shown; it never panics.
    pub fn start(&mut self, choice: PackChoice) -> Result<()> {
        let (pack_id, sequence, modules) = match choice {
            PackChoice::Pack(id) => {
                let Some(pack) = self.registry.get(&id) else {
                    return Err(FlowError::UnknownPack(id));
                };
                let modules = pack.modules.clone();
                let sequence = compile_question_set(&self.catalog, &self.registry, &id, None);
                (id, sequence, modules)
            }
            PackChoice::Custom(modules) => {
                let sequence = compile_question_set(
                    &self.catalog,
                    &self.registry,
                    CUSTOM_PACK,
                    Some(&modules),
                );
                (CUSTOM_PACK.to_string(), sequence, modules)
            }
        };

        if sequence.is_empty() {
            return Err(FlowError::EmptyQuestionSet(pack_id));
        }

        self.sequence = sequence;
        self.active_modules = modules;
        self.data = OnboardingData::new();
        self.data.progress.total_steps = self.sequence.len();
        self.last_error = None;
        self.state = FlowState::InProgress;

        // Position on the first applicable step; an inapplicable prefix is
        // skipped without answers.
        let mut skipped = 0u32;
        let mut first = None;
        for id in &self.sequence {
            if self.is_applicable(id) {
                first = Some(id.clone());
                break;
            }
            tracing::debug!(session = %self.id, step = %id, "Skipping inapplicable step at start");
            skipped += 1;
        }
        self.data.progress.skip_count = skipped;

        match first {
            Some(id) => {
                self.data.progress.current_step = Some(id);
                self.recompute_total_steps();
            }
            None => {
                // Nothing to ask: the sequence filtered down to nothing.
                self.finish();
            }
        }
        Ok(())
    }

    /// Submit a response for the current step.
    ///
    /// Question and confirmation steps are validation-gated: on failure the
    /// session is unchanged except that the error is attached for the UI. On
    /// success
    /// the response is merged, the step is completed (idempotently), and the
    /// session advances, skipping successors that are not applicable.
    pub fn submit(&mut self, response: Value) -> Result<SubmitOutcome> {
        if self.state != FlowState::InProgress {
            return Err(FlowError::NotActive {
                state: self.state.to_string(),
            });
        }
        let Some(current_id) = self.data.progress.current_step.clone() else {
            return Err(FlowError::NotActive {
                state: self.state.to_string(),
            });
        };
        let Some(step) = self.graph.get(&current_id) else {
            // Current step vanished from the graph: misconfiguration. Fail
            // loudly in development, complete the flow in production.
            tracing::error!(session = %self.id, step = %current_id, "Current step missing from graph");
            debug_assert!(false, "current step {current_id} missing from graph");
            self.finish();
            return Ok(SubmitOutcome::Completed);
        };

        if matches!(step.step_type, StepType::Question | StepType::Confirmation) {
            if let Err(failure) = step.validate(&response) {
                tracing::debug!(session = %self.id, step = %current_id, error = %failure, "Response rejected");
                self.last_error = Some(failure.clone());
                return Err(FlowError::Validation(failure));
            }
        }

        self.last_error = None;
        self.data.record_answer(&current_id, response.clone());
        self.data.progress.complete(current_id);

        // Resolvers run after the response has been merged into the data.
        let advance = match step.resolve_next(&response, &self.data) {
            Some(next) => self.advance_from(next),
            None => Advance::Completed { skipped: 0 },
        };

        match advance {
            Advance::Next { id, skipped } => {
                self.data.progress.skip_count += skipped;
                self.data.progress.current_step = Some(id.clone());
                self.recompute_total_steps();
                Ok(SubmitOutcome::Advanced(id))
            }
            Advance::Completed { skipped } => {
                self.data.progress.skip_count += skipped;
                self.finish();
                Ok(SubmitOutcome::Completed)
            }
        }
    }

    /// Explicitly pass over a step without an answer. Counts the skip and
    /// never touches `completed_steps`; if the skipped step is the current
    /// one, the session advances past it.
    pub fn skip(&mut self, step_id: &QuestionId) -> Result<()> {
        if self.state != FlowState::InProgress {
            return Err(FlowError::NotActive {
                state: self.state.to_string(),
            });
        }

        self.data.progress.skip_count += 1;
        tracing::debug!(session = %self.id, step = %step_id, "Step skipped");

        if self.data.progress.current_step.as_ref() == Some(step_id) {
            let advance = match self
                .graph
                .get(step_id)
                .and_then(|step| step.resolve_next(&Value::Null, &self.data))
            {
                Some(next) => self.advance_from(next),
                None => Advance::Completed { skipped: 0 },
            };
            match advance {
                Advance::Next { id, skipped } => {
                    self.data.progress.skip_count += skipped;
                    self.data.progress.current_step = Some(id);
                    self.recompute_total_steps();
                }
                Advance::Completed { skipped } => {
                    self.data.progress.skip_count += skipped;
                    self.finish();
                }
            }
        }
        Ok(())
    }

    /// Abort the session, discarding its data. Affects only this session.
    pub fn abort(&mut self) {
        tracing::debug!(session = %self.id, "Session aborted");
        self.sequence.clear();
        self.active_modules.clear();
        self.data = OnboardingData::new();
        self.last_error = None;
        self.state = FlowState::NotStarted;
    }

    /// Completed fraction in `[0, 1]`. `total_steps` is an estimate revised
    /// by branching; the completed count only ever grows.
    pub fn progress_percentage(&self) -> f64 {
        if self.state == FlowState::Completed {
            return 1.0;
        }
        let total = self.data.progress.total_steps;
        if total == 0 {
            return 0.0;
        }
        let fraction = self.data.progress.completed_steps.len() as f64 / total as f64;
        fraction.clamp(0.0, 1.0)
    }

    /// Estimated minutes left, from the remaining applicable steps.
    pub fn estimated_minutes_remaining(&self) -> u32 {
        if self.state != FlowState::InProgress {
            return 0;
        }
        let remaining = self
            .sequence
            .iter()
            .filter(|id| !self.data.progress.is_completed(id) && self.is_applicable(id))
            .count() as f64;
        (remaining * self.config.minutes_per_question).ceil() as u32
    }

    /// A step applies iff it is in the compiled sequence, its condition
    /// passes against the current data, and its required modules intersect
    /// the active set.
    fn is_applicable(&self, id: &QuestionId) -> bool {
        if !self.sequence.contains(id) {
            return false;
        }
        let Some(step) = self.graph.get(id) else {
            return false;
        };
        if !step.condition_passes(&self.data) {
            return false;
        }
        step.required_modules.is_empty()
            || step
                .required_modules
                .iter()
                .any(|m| self.active_modules.contains(m))
    }

    /// Walk forward from a resolved successor until an applicable step is
    /// found, counting skips. A successor id absent from the graph is a
    /// programming error: loud in development, "flow completed" in release.
    fn advance_from(&self, first: QuestionId) -> Advance {
        let mut candidate = first;
        let mut skipped = 0u32;

        // Bounded by graph size; a cycle of inapplicable steps ends the flow.
        for _ in 0..=self.graph.steps().len() {
            let Some(step) = self.graph.get(&candidate) else {
                tracing::error!(
                    session = %self.id,
                    step = %candidate,
                    "Next-step resolver returned unknown step"
                );
                debug_assert!(false, "dangling next-step reference: {candidate}");
                return Advance::Completed { skipped };
            };

            if self.is_applicable(&candidate) {
                return Advance::Next {
                    id: candidate,
                    skipped,
                };
            }

            tracing::debug!(session = %self.id, step = %candidate, "Skipping inapplicable step");
            skipped += 1;
            match step.resolve_next(&Value::Null, &self.data) {
                Some(next) => candidate = next,
                None => return Advance::Completed { skipped },
            }
        }

        tracing::error!(session = %self.id, "Advance loop exceeded graph size, completing flow");
        debug_assert!(false, "advance loop exceeded graph size");
        Advance::Completed { skipped }
    }

    /// Revise the total-step estimate: completed plus the still-applicable
    /// remainder of the sequence. May shrink or grow as branching changes
    /// which steps apply.
    fn recompute_total_steps(&mut self) {
        let remaining = self
            .sequence
            .iter()
            .filter(|id| !self.data.progress.is_completed(id) && self.is_applicable(id))
            .count();
        self.data.progress.total_steps = self.data.progress.completed_steps.len() + remaining;
    }

    fn finish(&mut self) {
        self.data.progress.current_step = None;
        self.data.progress.total_steps = self.data.progress.completed_steps.len();
        self.state = FlowState::Completed;
        tracing::debug!(
            session = %self.id,
            completed = self.data.progress.completed_steps.len(),
            skipped = self.data.progress.skip_count,
            "Flow completed"
        );
    }
}
