//! The onboarding step graph: every step record plus the validation pass
//! that catches misconfigured references before they can strand a session.

use serde_json::Value;

use crate::catalog::{Catalog, ModuleId, PackRegistry, QuestionId, QuestionSelection, ids};
use crate::error::GraphError;

use super::data::OnboardingData;
use super::step::{InputType, NextStep, Step, StepOption, ValidationRule};

/// Id-keyed table of steps. Statically defined, loaded once per process.
#[derive(Debug, Clone)]
pub struct StepGraph {
    steps: Vec<Step>,
}

impl StepGraph {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == *id)
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.get(id).is_some()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Validation pass over the graph, the catalog, and every registered
    /// pack. Static next-step targets must exist in the graph, every step
    /// must be a catalog question, and every pack's fixed ask list must
    /// refer to real steps. Resolver successors can only be checked at
    /// runtime; everything static is checked here.
    ///
    /// Intended to run at startup and in tests so dangling references are a
    /// build-time failure, not a user-facing one.
    pub fn validate(
        &self,
        catalog: &Catalog,
        registry: &PackRegistry,
    ) -> Result<(), Vec<GraphError>> {
        let mut problems = Vec::new();

        for step in &self.steps {
            if !catalog.contains(&step.id) {
                problems.push(GraphError::UnknownQuestion(step.id.clone()));
            }
            if let Some(NextStep::Step(target)) = &step.next_step {
                if !self.contains(target) {
                    problems.push(GraphError::DanglingNextStep {
                        step: step.id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        for pack in registry.all() {
            if let QuestionSelection::Subset { ids } = &pack.questions_to_ask {
                for question in ids {
                    if !self.contains(question) {
                        problems.push(GraphError::PackReferencesUnknownStep {
                            pack: pack.id.clone(),
                            question: question.clone(),
                        });
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            for problem in &problems {
                tracing::error!("Step graph validation: {problem}");
            }
            Err(problems)
        }
    }
}

/// After sport selection: users who picked no sport skip the sport-specific
/// follow-up and go straight to strength setup.
fn after_sport_selection(response: &Value, data: &OnboardingData) -> QuestionId {
    let picked_any = response
        .as_array()
        .is_some_and(|sports| !sports.is_empty())
        || !data.sports.is_empty();
    if picked_any {
        QuestionId::from(ids::SPORT_FREQUENCY)
    } else {
        QuestionId::from(ids::STRENGTH_SETUP)
    }
}

/// Sport frequency only makes sense once at least one sport is selected.
fn has_sports(data: &OnboardingData) -> bool {
    !data.sports.is_empty()
}

fn consent_given(response: &Value) -> bool {
    response.as_bool() == Some(true)
}

impl Default for StepGraph {
    fn default() -> Self {
        let objective_options = vec![
            StepOption::new("performance", "Athletic performance"),
            StepOption::new("health_wellness", "Health & wellness"),
            StepOption::new("body_composition", "Body composition"),
            StepOption::new("energy_sleep", "Energy & sleep"),
            StepOption::new("strength_building", "Building strength"),
            StepOption::new("weight_loss", "Losing weight"),
            StepOption::new("muscle_gain", "Gaining muscle"),
            StepOption::new("holistic", "A bit of everything"),
        ];

        let steps = vec![
            Step::info(ids::WELCOME).then(ids::GET_NAME),
            Step::question(ids::GET_NAME, InputType::Text)
                .with_validation(vec![ValidationRule::required("Please tell us your name")])
                .then(ids::MAIN_OBJECTIVE),
            Step::question(ids::MAIN_OBJECTIVE, InputType::SingleSelect)
                .with_options(objective_options)
                .with_validation(vec![ValidationRule::required("Pick an objective")])
                .then(ids::PERSONAL_INFO),
            Step::question(ids::PERSONAL_INFO, InputType::Number)
                .with_validation(vec![
                    ValidationRule::required("We need a few details"),
                    ValidationRule::custom(
                        |v| v.get("age").and_then(Value::as_f64).is_some_and(|a| a >= 13.0),
                        "You must be at least 13",
                    ),
                    ValidationRule::custom(
                        |v| v.get("age").and_then(Value::as_f64).is_some_and(|a| a <= 120.0),
                        "Enter a valid age",
                    ),
                ])
                .then(ids::SPORT_SELECTION),
            Step::question(ids::SPORT_SELECTION, InputType::MultiSelect)
                .with_options(vec![
                    StepOption::new("running", "Running"),
                    StepOption::new("cycling", "Cycling"),
                    StepOption::new("swimming", "Swimming"),
                    StepOption::new("team_sports", "Team sports"),
                    StepOption::new("racket_sports", "Racket sports"),
                ])
                .with_required_modules(vec![ModuleId::Sport])
                .then_resolve(after_sport_selection),
            Step::question(ids::SPORT_FREQUENCY, InputType::Slider)
                .with_validation(vec![
                    ValidationRule::min(0.0, "Sessions per week cannot be negative"),
                    ValidationRule::max(14.0, "That is more sessions than half-days in a week"),
                ])
                .with_condition(has_sports)
                .with_required_modules(vec![ModuleId::Sport])
                .then(ids::STRENGTH_SETUP),
            Step::question(ids::STRENGTH_SETUP, InputType::SingleSelect)
                .with_options(vec![
                    StepOption::new("build_muscle", "Build muscle"),
                    StepOption::new("get_stronger", "Get stronger"),
                    StepOption::new("tone_up", "Tone up"),
                ])
                .with_validation(vec![ValidationRule::required("Pick a training goal")])
                .with_required_modules(vec![ModuleId::Strength])
                .then(ids::STRENGTH_EXPERIENCE),
            Step::question(ids::STRENGTH_EXPERIENCE, InputType::SingleSelect)
                .with_options(vec![
                    StepOption::new("beginner", "Beginner"),
                    StepOption::new("intermediate", "Intermediate"),
                    StepOption::new("advanced", "Advanced"),
                ])
                .with_validation(vec![ValidationRule::required("Pick your experience level")])
                .with_required_modules(vec![ModuleId::Strength])
                .then(ids::NUTRITION_OBJECTIVE),
            Step::question(ids::NUTRITION_OBJECTIVE, InputType::SingleSelect)
                .with_options(vec![
                    StepOption::new("eat_healthier", "Eat healthier"),
                    StepOption::new("count_macros", "Track macros"),
                    StepOption::new("meal_planning", "Plan my meals"),
                ])
                .with_validation(vec![ValidationRule::required("Pick a nutrition goal")])
                .with_required_modules(vec![ModuleId::Nutrition])
                .then(ids::NUTRITION_PREFERENCES),
            Step::question(ids::NUTRITION_PREFERENCES, InputType::MultiSelect)
                .with_options(vec![
                    StepOption::new("vegetarian", "Vegetarian"),
                    StepOption::new("vegan", "Vegan"),
                    StepOption::new("gluten_free", "Gluten-free"),
                    StepOption::new("no_restrictions", "No restrictions"),
                ])
                .with_required_modules(vec![ModuleId::Nutrition])
                .then(ids::SLEEP_SETUP),
            Step::question(ids::SLEEP_SETUP, InputType::Number)
                .with_validation(vec![
                    ValidationRule::required("Enter your target sleep hours"),
                    ValidationRule::min(4.0, "Target at least 4 hours"),
                    ValidationRule::max(12.0, "Target at most 12 hours"),
                ])
                .with_required_modules(vec![ModuleId::Sleep])
                .then(ids::SLEEP_SCHEDULE),
            Step::question(ids::SLEEP_SCHEDULE, InputType::SingleSelect)
                .with_options(vec![
                    StepOption::new("early_bird", "Early bird"),
                    StepOption::new("night_owl", "Night owl"),
                    StepOption::new("varies", "It varies"),
                ])
                .with_required_modules(vec![ModuleId::Sleep])
                .then(ids::HYDRATION_SETUP),
            Step::question(ids::HYDRATION_SETUP, InputType::Slider)
                .with_validation(vec![
                    ValidationRule::min(1.0, "Set at least one glass a day"),
                    ValidationRule::max(20.0, "Set at most twenty glasses a day"),
                ])
                .with_required_modules(vec![ModuleId::Hydration])
                .then(ids::WELLNESS_CHECKIN),
            Step::question(ids::WELLNESS_CHECKIN, InputType::Toggle)
                .with_required_modules(vec![ModuleId::Wellness])
                .then(ids::FINAL_QUESTIONS),
            Step::summary(ids::FINAL_QUESTIONS).then(ids::PRIVACY_CONSENT),
            // Terminal: no successor.
            Step::confirmation(ids::PRIVACY_CONSENT)
                .with_validation(vec![ValidationRule::custom(
                    consent_given,
                    "You must accept the privacy policy",
                )]),
        ];

        Self::new(steps)
    }
}
