//! Configuration data for the onboarding flow: the question catalog and the
//! Smart Pack registry.
//!
//! Both are immutable, load-once values injected into the engine at
//! construction. Nothing here performs I/O.

pub mod packs;
pub mod questions;

pub use packs::{CUSTOM_PACK, PackRegistry, QuestionSelection, SmartPack};
pub use questions::{Catalog, ModuleId, QuestionId, ids};
