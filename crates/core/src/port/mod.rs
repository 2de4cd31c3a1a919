// Port Layer - Interfaces for external dependencies

pub mod clock; // For deterministic testing
pub mod probe_runner;

// Re-exports
pub use clock::{Clock, SystemClock};
pub use probe_runner::ProbeRunner;
