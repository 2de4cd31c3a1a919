// Probe Result Domain Model

/// Exit status recorded when the interpreter could not be spawned
pub const EXIT_SPAWN_FAILED: i32 = 127;

/// Exit status recorded when the probe's output or status could not be collected
pub const EXIT_CAPTURE_FAILED: i32 = 126;

/// Exit status recorded when a configured probe timeout expired
pub const EXIT_TIMED_OUT: i32 = 124;

/// Outcome of exactly one probe execution.
///
/// A failed probe is data: the runner always produces one of these, never an error.
/// There are no mutating methods; the value is fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    command: String,
    output: Vec<u8>,
    exit_code: i32,
    duration_ms: i64,
    truncated: bool,
    timed_out: bool,
}

impl ProbeResult {
    pub fn new(command: impl Into<String>, output: impl Into<Vec<u8>>, exit_code: i32) -> Self {
        Self {
            command: command.into(),
            output: output.into(),
            exit_code,
            duration_ms: 0,
            truncated: false,
            timed_out: false,
        }
    }

    pub fn with_duration(mut self, duration_ms: i64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn with_timed_out(mut self, timed_out: bool) -> Self {
        self.timed_out = timed_out;
        self
    }

    /// Command text exactly as declared in the catalog
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Combined stdout/stderr, raw
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    /// Runner hit its byte cap and discarded the rest of the output
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}
