//! Step records — the typed nodes of the onboarding step graph.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{ModuleId, QuestionId};
use crate::error::ValidationFailure;

use super::data::OnboardingData;

/// What kind of screen a step drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Info,
    Question,
    Summary,
    Confirmation,
}

/// Input widget a question step expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputType {
    Text,
    Number,
    Slider,
    Toggle,
    SingleSelect,
    MultiSelect,
}

/// One selectable option of a single/multi-select question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOption {
    pub value: String,
    pub label: String,
}

impl StepOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A single validation rule. Rules are evaluated in declaration order; the
/// first failure blocks the transition with its message.
#[derive(Debug, Clone)]
pub enum ValidationRule {
    /// Response must be non-empty (non-null, non-blank string, non-empty
    /// array/object).
    Required { message: String },
    /// Numeric response must be `>= limit`. A non-numeric response fails.
    Min { limit: f64, message: String },
    /// Numeric response must be `<= limit`. A non-numeric response fails.
    Max { limit: f64, message: String },
    /// Arbitrary predicate; `check` returning false fails with `message`.
    Custom {
        check: fn(&Value) -> bool,
        message: String,
    },
}

impl ValidationRule {
    pub fn required(message: impl Into<String>) -> Self {
        Self::Required {
            message: message.into(),
        }
    }

    pub fn min(limit: f64, message: impl Into<String>) -> Self {
        Self::Min {
            limit,
            message: message.into(),
        }
    }

    pub fn max(limit: f64, message: impl Into<String>) -> Self {
        Self::Max {
            limit,
            message: message.into(),
        }
    }

    pub fn custom(check: fn(&Value) -> bool, message: impl Into<String>) -> Self {
        Self::Custom {
            check,
            message: message.into(),
        }
    }

    /// Evaluate against a candidate response. Returns the failure message if
    /// the rule does not pass.
    pub fn check(&self, response: &Value) -> Option<&str> {
        let passes = match self {
            Self::Required { .. } => match response {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                Value::Array(items) => !items.is_empty(),
                Value::Object(map) => !map.is_empty(),
                _ => true,
            },
            Self::Min { limit, .. } => response.as_f64().is_some_and(|n| n >= *limit),
            Self::Max { limit, .. } => response.as_f64().is_some_and(|n| n <= *limit),
            Self::Custom { check, .. } => check(response),
        };
        if passes { None } else { Some(self.message()) }
    }

    fn message(&self) -> &str {
        match self {
            Self::Required { message }
            | Self::Min { message, .. }
            | Self::Max { message, .. }
            | Self::Custom { message, .. } => message,
        }
    }
}

/// Visibility condition: the step only applies when this returns true.
pub type ConditionFn = fn(&OnboardingData) -> bool;

/// Branching resolver: invoked with the validated response (already merged
/// into `data`) and must return an existing step id.
pub type NextStepFn = fn(&Value, &OnboardingData) -> QuestionId;

/// Successor of a step: a fixed id, or a resolver for branching.
#[derive(Debug, Clone)]
pub enum NextStep {
    Step(QuestionId),
    Resolve(NextStepFn),
}

/// One node of the step graph. Statically defined, evaluated dynamically
/// against the live session data.
#[derive(Debug, Clone)]
pub struct Step {
    pub id: QuestionId,
    pub step_type: StepType,
    pub input_type: Option<InputType>,
    pub options: Vec<StepOption>,
    pub validation: Vec<ValidationRule>,
    pub condition: Option<ConditionFn>,
    /// When non-empty, the step only applies if at least one of these
    /// modules is active in the session.
    pub required_modules: Vec<ModuleId>,
    pub next_step: Option<NextStep>,
}

impl Step {
    fn new(id: impl Into<QuestionId>, step_type: StepType) -> Self {
        Self {
            id: id.into(),
            step_type,
            input_type: None,
            options: Vec::new(),
            validation: Vec::new(),
            condition: None,
            required_modules: Vec::new(),
            next_step: None,
        }
    }

    pub fn info(id: impl Into<QuestionId>) -> Self {
        Self::new(id, StepType::Info)
    }

    pub fn question(id: impl Into<QuestionId>, input_type: InputType) -> Self {
        let mut step = Self::new(id, StepType::Question);
        step.input_type = Some(input_type);
        step
    }

    pub fn summary(id: impl Into<QuestionId>) -> Self {
        Self::new(id, StepType::Summary)
    }

    pub fn confirmation(id: impl Into<QuestionId>) -> Self {
        Self::new(id, StepType::Confirmation)
    }

    pub fn with_options(mut self, options: Vec<StepOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_validation(mut self, rules: Vec<ValidationRule>) -> Self {
        self.validation = rules;
        self
    }

    pub fn with_condition(mut self, condition: ConditionFn) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_required_modules(mut self, modules: Vec<ModuleId>) -> Self {
        self.required_modules = modules;
        self
    }

    pub fn then(mut self, next: impl Into<QuestionId>) -> Self {
        self.next_step = Some(NextStep::Step(next.into()));
        self
    }

    pub fn then_resolve(mut self, resolver: NextStepFn) -> Self {
        self.next_step = Some(NextStep::Resolve(resolver));
        self
    }

    /// Run every validation rule against a candidate response, in order.
    /// The first failing rule blocks the transition.
    pub fn validate(&self, response: &Value) -> Result<(), ValidationFailure> {
        for rule in &self.validation {
            if let Some(message) = rule.check(response) {
                return Err(ValidationFailure {
                    step: self.id.clone(),
                    message: message.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Whether the step's visibility condition passes (absent = passes).
    pub fn condition_passes(&self, data: &OnboardingData) -> bool {
        self.condition.is_none_or(|condition| condition(data))
    }

    /// Resolve the successor id, if the step has one.
    pub fn resolve_next(&self, response: &Value, data: &OnboardingData) -> Option<QuestionId> {
        match &self.next_step {
            Some(NextStep::Step(id)) => Some(id.clone()),
            Some(NextStep::Resolve(resolver)) => Some(resolver(response, data)),
            None => None,
        }
    }
}
