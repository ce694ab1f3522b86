//! Data access layer
//!
//! Storage sits behind the [`ProfileStore`] trait; the in-memory
//! implementation serves development and tests.

pub mod profile;

pub use profile::{
    CreateIntakeLog, EditOutcome, InMemoryProfileStore, IntakeOutcome, IntakeRecord,
    ProfileEdit, ProfileRecord, ProfileStore,
};
