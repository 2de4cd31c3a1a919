// Probe Runner Port
// Abstraction for executing one opaque probe command

use crate::domain::ProbeResult;
use async_trait::async_trait;

/// Probe Runner trait
///
/// Implementations:
/// - ShellProbeRunner (infra-system): runs the command through a shell interpreter
/// - MockProbeRunner: scripted results for tests
///
/// There is deliberately no error type: a missing tool, a denied read or an
/// interpreter that cannot start all come back as a `ProbeResult` with a
/// non-zero exit status and the failure text as output.
#[async_trait]
pub trait ProbeRunner: Send + Sync {
    /// Execute `command` once and capture its combined output and exit status
    async fn run(&self, command: &str) -> ProbeResult;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock Probe Runner: scripted output per command, records every call
    pub struct MockProbeRunner {
        scripted: HashMap<String, (Vec<u8>, i32)>,
        calls: Mutex<Vec<String>>,
    }

    impl MockProbeRunner {
        pub fn new() -> Self {
            Self {
                scripted: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Script the result for one command text
        pub fn with(mut self, command: &str, output: impl Into<Vec<u8>>, exit_code: i32) -> Self {
            self.scripted
                .insert(command.to_string(), (output.into(), exit_code));
            self
        }

        /// Commands executed so far, in order
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Default for MockProbeRunner {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ProbeRunner for MockProbeRunner {
        async fn run(&self, command: &str) -> ProbeResult {
            self.calls.lock().unwrap().push(command.to_string());

            // Unscripted commands behave like a missing tool
            let (output, exit_code) = self.scripted.get(command).cloned().unwrap_or_else(|| {
                (
                    format!("bash: {}: command not found\n", command).into_bytes(),
                    127,
                )
            });

            ProbeResult::new(command, output, exit_code).with_duration(1)
        }
    }
}
