//! Question catalog — the closed universe of onboarding questions and the
//! module → question table.

use serde::{Deserialize, Serialize};

/// Identifier of a single onboarding question.
///
/// Drawn from a closed catalog; the catalog's order defines the canonical
/// "ask everything" sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl PartialEq<str> for QuestionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for QuestionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Well-known question ids of the built-in catalog.
pub mod ids {
    pub const WELCOME: &str = "welcome";
    pub const GET_NAME: &str = "get_name";
    pub const MAIN_OBJECTIVE: &str = "main_objective";
    pub const PERSONAL_INFO: &str = "personal_info";
    pub const SPORT_SELECTION: &str = "sport_selection";
    pub const SPORT_FREQUENCY: &str = "sport_frequency";
    pub const STRENGTH_SETUP: &str = "strength_setup";
    pub const STRENGTH_EXPERIENCE: &str = "strength_experience";
    pub const NUTRITION_OBJECTIVE: &str = "nutrition_objective";
    pub const NUTRITION_PREFERENCES: &str = "nutrition_preferences";
    pub const SLEEP_SETUP: &str = "sleep_setup";
    pub const SLEEP_SCHEDULE: &str = "sleep_schedule";
    pub const HYDRATION_SETUP: &str = "hydration_setup";
    pub const WELLNESS_CHECKIN: &str = "wellness_checkin";
    pub const FINAL_QUESTIONS: &str = "final_questions";
    pub const PRIVACY_CONSENT: &str = "privacy_consent";
}

/// A feature module of the app a user can opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleId {
    Sport,
    Strength,
    Nutrition,
    Sleep,
    Hydration,
    Wellness,
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Sport => "sport",
            Self::Strength => "strength",
            Self::Nutrition => "nutrition",
            Self::Sleep => "sleep",
            Self::Hydration => "hydration",
            Self::Wellness => "wellness",
        };
        write!(f, "{s}")
    }
}

const NO_QUESTIONS: &[QuestionId] = &[];

/// Immutable question catalog: the canonical ordering plus the per-module
/// question lists. Injected into the engine at construction so tests can
/// substitute a reduced catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<QuestionId>,
    module_questions: Vec<(ModuleId, Vec<QuestionId>)>,
}

impl Catalog {
    pub fn new(
        questions: Vec<QuestionId>,
        module_questions: Vec<(ModuleId, Vec<QuestionId>)>,
    ) -> Self {
        Self {
            questions,
            module_questions,
        }
    }

    /// The full canonical ordering — the "ask everything" baseline.
    pub fn all_questions(&self) -> &[QuestionId] {
        &self.questions
    }

    /// Ordered question list for one module. Total over `ModuleId`; a module
    /// with no entry yields an empty list.
    pub fn questions_for_module(&self, module: ModuleId) -> &[QuestionId] {
        self.module_questions
            .iter()
            .find(|(m, _)| *m == module)
            .map_or(NO_QUESTIONS, |(_, qs)| qs.as_slice())
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.questions.contains(id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        use ids::*;

        let questions = [
            WELCOME,
            GET_NAME,
            MAIN_OBJECTIVE,
            PERSONAL_INFO,
            SPORT_SELECTION,
            SPORT_FREQUENCY,
            STRENGTH_SETUP,
            STRENGTH_EXPERIENCE,
            NUTRITION_OBJECTIVE,
            NUTRITION_PREFERENCES,
            SLEEP_SETUP,
            SLEEP_SCHEDULE,
            HYDRATION_SETUP,
            WELLNESS_CHECKIN,
            FINAL_QUESTIONS,
            PRIVACY_CONSENT,
        ]
        .into_iter()
        .map(QuestionId::from)
        .collect();

        let module = |ids: &[&str]| ids.iter().copied().map(QuestionId::from).collect();
        let module_questions = vec![
            (ModuleId::Sport, module(&[SPORT_SELECTION, SPORT_FREQUENCY])),
            (
                ModuleId::Strength,
                module(&[STRENGTH_SETUP, STRENGTH_EXPERIENCE]),
            ),
            (
                ModuleId::Nutrition,
                module(&[NUTRITION_OBJECTIVE, NUTRITION_PREFERENCES]),
            ),
            (ModuleId::Sleep, module(&[SLEEP_SETUP, SLEEP_SCHEDULE])),
            (ModuleId::Hydration, module(&[HYDRATION_SETUP])),
            (ModuleId::Wellness, module(&[WELLNESS_CHECKIN])),
        ];

        Self::new(questions, module_questions)
    }
}
