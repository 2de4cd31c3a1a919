// Host Triage Infrastructure - System Adapters
// Implements: ProbeRunner (shell), report artifact writer, privilege detection
// Unix-only: probes run through a POSIX shell and share one pipe for output.

#[cfg(unix)]
pub mod artifact;
#[cfg(unix)]
pub mod privilege;
#[cfg(unix)]
pub mod shell_runner;

#[cfg(unix)]
pub use artifact::{open_artifact, ArtifactWriter, Tee};
#[cfg(unix)]
pub use privilege::{effective_privilege, Privilege};
#[cfg(unix)]
pub use shell_runner::{RunnerConfig, ShellProbeRunner};
