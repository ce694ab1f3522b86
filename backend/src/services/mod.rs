//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the profile store and the target engine.

pub mod intake;
pub mod profile;
pub mod targets;

pub use intake::IntakeService;
pub use profile::ProfileService;
pub use targets::TargetsService;
