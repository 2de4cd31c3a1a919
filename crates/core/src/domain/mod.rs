// Domain Layer - Catalog, probe results and the report skeleton

pub mod catalog;
pub mod error;
pub mod probe_result;
pub mod report;

// Re-exports
pub use catalog::{Catalog, Probe, ProbeKind, Section};
pub use error::DomainError;
pub use probe_result::ProbeResult;
pub use report::{ProbeOutcome, Report, RunPhase, SectionSummary};
