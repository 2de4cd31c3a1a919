// Host Triage Core - Domain Logic & Ports
// NO infrastructure dependencies: probes run through the ProbeRunner port,
// the artifact is any io::Write handed in by the composition root.

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
