//! Pack recommendations and time estimates.

use crate::catalog::{Catalog, PackRegistry};
use crate::config::EngineConfig;

/// Ordered pack ids recommended for a user's main objective, most relevant
/// first. Total over any input: an unrecognized objective falls back to
/// `["custom"]` so the UI always has something to offer.
pub fn recommended_packs(main_objective: &str) -> Vec<String> {
    let ids: &[&str] = match main_objective {
        "performance" => &["muscle_building", "complete_transformation"],
        "health_wellness" => &["wellness_balance", "daily_health"],
        "body_composition" => &["complete_transformation", "muscle_building"],
        "energy_sleep" => &["wellness_balance", "daily_health"],
        "strength_building" => &["muscle_building"],
        "weight_loss" => &["wellness_balance", "muscle_building"],
        "muscle_gain" => &["muscle_building", "complete_transformation"],
        "holistic" => &["complete_transformation", "wellness_balance"],
        other => {
            tracing::debug!(objective = other, "Unrecognized objective, recommending custom pack");
            &["custom"]
        }
    };
    ids.iter().map(|id| id.to_string()).collect()
}

/// Estimated minutes to finish a pack: `ceil(questions × minutes_per_question)`.
/// Unknown pack → the configured fallback (15 minutes by default, never zero).
pub fn estimated_time_for_pack(
    catalog: &Catalog,
    registry: &PackRegistry,
    pack_id: &str,
    config: &EngineConfig,
) -> u32 {
    let Some(pack) = registry.get(pack_id) else {
        tracing::warn!(pack = pack_id, "Unknown smart pack, using fallback time estimate");
        return config.fallback_estimate_minutes;
    };
    let count = pack.question_count(catalog) as f64;
    (count * config.minutes_per_question).ceil() as u32
}
