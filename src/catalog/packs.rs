//! Smart Pack registry — named onboarding templates selecting a subset of
//! the question catalog.

use serde::{Deserialize, Serialize};

use super::questions::{Catalog, ModuleId, QuestionId, ids};

/// Which questions a pack asks.
///
/// `All` is absolute: it means the full catalog regardless of any populated
/// skip list. A fixed subset is returned verbatim by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionSelection {
    All,
    Subset { ids: Vec<QuestionId> },
}

impl QuestionSelection {
    pub fn subset(ids: impl IntoIterator<Item = impl Into<QuestionId>>) -> Self {
        Self::Subset {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// A named onboarding template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartPack {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub modules: Vec<ModuleId>,
    /// Objective keys this pack is recommended for (display metadata).
    pub recommended_for: Vec<String>,
    pub questions_to_ask: QuestionSelection,
    /// Catalog questions this pack deliberately leaves out. Documentation /
    /// cross-check data; the compiler never subtracts it from a fixed list.
    pub questions_to_skip: Vec<QuestionId>,
    /// Display ordering, lower first.
    pub order: u32,
    pub popular: bool,
}

impl SmartPack {
    /// Number of questions this pack asks, measured against `catalog` when
    /// the selection is `All`.
    pub fn question_count(&self, catalog: &Catalog) -> usize {
        match &self.questions_to_ask {
            QuestionSelection::All => catalog.all_questions().len(),
            QuestionSelection::Subset { ids } => ids.len(),
        }
    }
}

/// Id of the distinguished pack whose modules the caller supplies at
/// compile time.
pub const CUSTOM_PACK: &str = "custom";

/// Immutable pack table, keyed by id. Load-once, read-only.
#[derive(Debug, Clone, Default)]
pub struct PackRegistry {
    packs: Vec<SmartPack>,
}

impl PackRegistry {
    pub fn new(packs: Vec<SmartPack>) -> Self {
        Self { packs }
    }

    pub fn get(&self, id: &str) -> Option<&SmartPack> {
        self.packs.iter().find(|p| p.id == id)
    }

    /// All packs, sorted by display order.
    pub fn all(&self) -> Vec<&SmartPack> {
        let mut packs: Vec<&SmartPack> = self.packs.iter().collect();
        packs.sort_by_key(|p| p.order);
        packs
    }

    /// The built-in pack table, with each subset pack's skip list derived as
    /// the catalog complement of its ask list.
    pub fn builtin(catalog: &Catalog) -> Self {
        let splice = |modules: &[ModuleId]| -> QuestionSelection {
            let mut qs: Vec<QuestionId> = [
                ids::WELCOME,
                ids::GET_NAME,
                ids::MAIN_OBJECTIVE,
                ids::PERSONAL_INFO,
            ]
            .into_iter()
            .map(QuestionId::from)
            .collect();
            for m in modules {
                qs.extend(catalog.questions_for_module(*m).iter().cloned());
            }
            qs.push(QuestionId::from(ids::FINAL_QUESTIONS));
            qs.push(QuestionId::from(ids::PRIVACY_CONSENT));
            QuestionSelection::Subset { ids: qs }
        };

        let complement = |selection: &QuestionSelection| -> Vec<QuestionId> {
            match selection {
                QuestionSelection::All => Vec::new(),
                QuestionSelection::Subset { ids } => catalog
                    .all_questions()
                    .iter()
                    .filter(|q| !ids.contains(q))
                    .cloned()
                    .collect(),
            }
        };

        let mut packs = vec![
            SmartPack {
                id: "complete_transformation".to_string(),
                name: "Complete Transformation".to_string(),
                description: "The full program: training, nutrition, sleep, hydration and wellness."
                    .to_string(),
                icon: "rocket".to_string(),
                modules: vec![
                    ModuleId::Sport,
                    ModuleId::Strength,
                    ModuleId::Nutrition,
                    ModuleId::Sleep,
                    ModuleId::Hydration,
                    ModuleId::Wellness,
                ],
                recommended_for: vec![
                    "body_composition".to_string(),
                    "holistic".to_string(),
                ],
                questions_to_ask: QuestionSelection::All,
                questions_to_skip: Vec::new(),
                order: 1,
                popular: true,
            },
            SmartPack {
                id: "muscle_building".to_string(),
                name: "Muscle Building".to_string(),
                description: "Strength training and nutrition focused on building muscle."
                    .to_string(),
                icon: "dumbbell".to_string(),
                modules: vec![ModuleId::Sport, ModuleId::Strength, ModuleId::Nutrition],
                recommended_for: vec![
                    "muscle_gain".to_string(),
                    "strength_building".to_string(),
                    "performance".to_string(),
                ],
                questions_to_ask: splice(&[
                    ModuleId::Sport,
                    ModuleId::Strength,
                    ModuleId::Nutrition,
                ]),
                questions_to_skip: Vec::new(),
                order: 2,
                popular: true,
            },
            SmartPack {
                id: "wellness_balance".to_string(),
                name: "Wellness Balance".to_string(),
                description: "Nutrition, sleep and recovery for overall balance.".to_string(),
                icon: "leaf".to_string(),
                modules: vec![
                    ModuleId::Nutrition,
                    ModuleId::Sleep,
                    ModuleId::Hydration,
                    ModuleId::Wellness,
                ],
                recommended_for: vec![
                    "health_wellness".to_string(),
                    "energy_sleep".to_string(),
                    "weight_loss".to_string(),
                ],
                questions_to_ask: splice(&[
                    ModuleId::Nutrition,
                    ModuleId::Sleep,
                    ModuleId::Hydration,
                    ModuleId::Wellness,
                ]),
                questions_to_skip: Vec::new(),
                order: 3,
                popular: false,
            },
            SmartPack {
                id: "daily_health".to_string(),
                name: "Daily Health".to_string(),
                description: "A light daily routine: eat well, drink enough, check in."
                    .to_string(),
                icon: "sun".to_string(),
                modules: vec![ModuleId::Nutrition, ModuleId::Hydration, ModuleId::Wellness],
                recommended_for: vec!["health_wellness".to_string()],
                questions_to_ask: splice(&[
                    ModuleId::Nutrition,
                    ModuleId::Hydration,
                    ModuleId::Wellness,
                ]),
                questions_to_skip: Vec::new(),
                order: 4,
                popular: false,
            },
            SmartPack {
                id: CUSTOM_PACK.to_string(),
                name: "Custom".to_string(),
                description: "Pick the modules you care about.".to_string(),
                icon: "sliders".to_string(),
                modules: Vec::new(),
                recommended_for: Vec::new(),
                questions_to_ask: QuestionSelection::Subset { ids: Vec::new() },
                questions_to_skip: Vec::new(),
                order: 5,
                popular: false,
            },
        ];

        for pack in &mut packs {
            if pack.id != CUSTOM_PACK {
                pack.questions_to_skip = complement(&pack.questions_to_ask);
            }
        }

        Self::new(packs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (Catalog, PackRegistry) {
        let catalog = Catalog::default();
        let registry = PackRegistry::builtin(&catalog);
        (catalog, registry)
    }

    #[test]
    fn lookup_by_id() {
        let (_, registry) = registry();
        assert!(registry.get("muscle_building").is_some());
        assert!(registry.get("does-not-exist").is_none());
    }

    #[test]
    fn packs_sorted_by_order() {
        let (_, registry) = registry();
        let orders: Vec<u32> = registry.all().iter().map(|p| p.order).collect();
        let mut sorted = orders.clone();
        sorted.sort_unstable();
        assert_eq!(orders, sorted);
    }

    #[test]
    fn ask_and_skip_lists_are_disjoint() {
        let (catalog, registry) = registry();
        for pack in registry.all() {
            if let QuestionSelection::Subset { ids } = &pack.questions_to_ask {
                for q in ids {
                    assert!(catalog.contains(q), "{}: {q} not in catalog", pack.id);
                    assert!(
                        !pack.questions_to_skip.contains(q),
                        "{}: {q} both asked and skipped",
                        pack.id
                    );
                }
            }
        }
    }

    #[test]
    fn complete_transformation_asks_all() {
        let (_, registry) = registry();
        let pack = registry.get("complete_transformation").unwrap();
        assert_eq!(pack.questions_to_ask, QuestionSelection::All);
        assert!(pack.questions_to_skip.is_empty());
    }

    #[test]
    fn daily_health_has_ten_questions() {
        let (catalog, registry) = registry();
        let pack = registry.get("daily_health").unwrap();
        assert_eq!(pack.question_count(&catalog), 10);
    }

    #[test]
    fn custom_pack_is_empty() {
        let (_, registry) = registry();
        let pack = registry.get(CUSTOM_PACK).unwrap();
        assert!(pack.modules.is_empty());
        assert_eq!(
            pack.questions_to_ask,
            QuestionSelection::Subset { ids: Vec::new() }
        );
        assert!(pack.questions_to_skip.is_empty());
    }

    #[test]
    fn selection_serde_is_tagged() {
        let all: QuestionSelection = serde_json::from_str(r#"{"kind":"all"}"#).unwrap();
        assert_eq!(all, QuestionSelection::All);

        let subset: QuestionSelection =
            serde_json::from_str(r#"{"kind":"subset","ids":["welcome"]}"#).unwrap();
        assert_eq!(
            subset,
            QuestionSelection::Subset {
                ids: vec![QuestionId::from("welcome")]
            }
        );
    }
}
