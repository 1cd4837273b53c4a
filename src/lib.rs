#![forbid(unsafe_code)]
//! Startup arbitration for a foreign component's translation override.
//!
//! [`freeze_at_startup`] probes the host registry and reads the settings file
//! once; [`ArbitrationGate`] and [`DriftChecker`] answer from that frozen
//! decision for the rest of the process.

pub mod config;
pub mod constants;
pub mod drift;
pub mod gate;
pub mod probe;
pub mod snapshot;
pub mod status;

pub use drift::DriftChecker;
pub use gate::{ArbitrationGate, OverrideCanceller};
pub use probe::{ManifestDirRegistry, ModuleRegistry, StaticRegistry};
pub use snapshot::{DecisionSnapshot, SnapshotCell, StartupOutcome, freeze_at_startup};
pub use status::RestartStatus;
