//! Core engine for academic applications built from versioned supporting
//! materials, each reviewed independently by multiple reviewers.
//!
//! The crate folds raw per-reviewer decisions into per-material verdicts,
//! rolls those verdicts up into application lifecycle transitions, and gates
//! every mutating action against the current lifecycle stage. Storage is
//! abstracted behind repository traits; HTTP and persistence adapters live
//! outside this crate.

pub mod config;
pub mod telemetry;
pub mod workflows;

pub use config::{AppConfig, AppEnvironment, ConfigError};
pub use workflows::admission::{AdmissionService, AdmissionServiceError};
