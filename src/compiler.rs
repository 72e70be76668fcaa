//! Question set compiler — turns a pack id (or custom module list) into the
//! ordered question sequence for a session.
//!
//! Pure and deterministic: identical inputs always yield identical output.

use crate::catalog::{CUSTOM_PACK, Catalog, ModuleId, PackRegistry, QuestionId, QuestionSelection, ids};

/// Fixed identity/consent questions every module-generated sequence carries.
/// Module questions are spliced in immediately before `final_questions`.
const BASE_SEQUENCE: &[&str] = &[
    ids::WELCOME,
    ids::GET_NAME,
    ids::MAIN_OBJECTIVE,
    ids::PERSONAL_INFO,
    ids::FINAL_QUESTIONS,
    ids::PRIVACY_CONSENT,
];

/// Compile the ordered question sequence for a session.
///
/// Soft failure by contract: an unknown `pack_id` logs a diagnostic and
/// returns an empty sequence. The caller must treat emptiness as "cannot
/// proceed", never as a crash.
pub fn compile_question_set(
    catalog: &Catalog,
    registry: &PackRegistry,
    pack_id: &str,
    custom_modules: Option<&[ModuleId]>,
) -> Vec<QuestionId> {
    let Some(pack) = registry.get(pack_id) else {
        tracing::warn!(pack = pack_id, "Unknown smart pack, compiling empty question set");
        return Vec::new();
    };

    if pack.id == CUSTOM_PACK {
        if let Some(modules) = custom_modules {
            return questions_for_modules(catalog, modules);
        }
    }

    match &pack.questions_to_ask {
        // "all" is absolute: the skip list is ignored.
        QuestionSelection::All => catalog.all_questions().to_vec(),
        // A fixed list is returned verbatim; the skip list is cross-check
        // metadata, never subtracted here.
        QuestionSelection::Subset { ids } => ids.clone(),
    }
}

/// Build a sequence from the base identity/consent questions with each
/// module's questions spliced in before `final_questions`, in caller module
/// order. Duplicate ids are dropped; the first occurrence keeps its position.
pub fn questions_for_modules(catalog: &Catalog, modules: &[ModuleId]) -> Vec<QuestionId> {
    let mut sequence: Vec<QuestionId> = BASE_SEQUENCE
        .iter()
        .copied()
        .map(QuestionId::from)
        .collect();

    // Splice point stays fixed: module questions always precede the final
    // summary/consent pair.
    let mut insert_at = sequence
        .iter()
        .position(|q| q == ids::FINAL_QUESTIONS)
        .unwrap_or(sequence.len());

    for module in modules {
        for question in catalog.questions_for_module(*module) {
            if sequence.contains(question) {
                tracing::debug!(module = %module, question = %question, "Duplicate question dropped");
                continue;
            }
            sequence.insert(insert_at, question.clone());
            insert_at += 1;
        }
    }

    sequence
}
