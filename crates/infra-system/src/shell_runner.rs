// Shell probe runner
// reason: tokio::process + one OS pipe shared by stdout and stderr, so a
// probe's diagnostics and data keep the order they were emitted in
use async_trait::async_trait;
use std::io;
use std::os::fd::OwnedFd;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::unix::pipe;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use triage_core::domain::probe_result::{EXIT_CAPTURE_FAILED, EXIT_SPAWN_FAILED, EXIT_TIMED_OUT};
use triage_core::domain::ProbeResult;
use triage_core::port::{Clock, ProbeRunner};

/// Default per-probe capture limit (1 MiB)
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// How long a timed-out probe gets between SIGTERM and SIGKILL
pub const TERMINATE_GRACE: Duration = Duration::from_secs(2);

const READ_CHUNK_BYTES: usize = 8192;

/// Runner settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Interpreter invoked as `<shell> -c <command>`
    pub shell: String,
    /// Prefix the interpreter with `sudo -n`
    pub elevate: bool,
    pub max_output_bytes: usize,
    /// No timeout unless set: a hanging probe hangs the run
    pub timeout: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shell: "bash".to_string(),
            elevate: false,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            timeout: None,
        }
    }
}

#[derive(Error, Debug)]
enum CaptureError {
    #[error("failed to start probe interpreter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to collect probe output: {0}")]
    Collect(#[source] io::Error),
}

impl CaptureError {
    /// Shell conventions: 127 when nothing ran, 126 when it ran but could not be observed
    fn exit_code(&self) -> i32 {
        match self {
            CaptureError::Spawn { .. } => EXIT_SPAWN_FAILED,
            CaptureError::Collect(_) => EXIT_CAPTURE_FAILED,
        }
    }
}

/// Bytes read from the probe, bounded by the byte cap
struct CapturedOutput {
    bytes: Vec<u8>,
    limit: usize,
    truncated: bool,
}

impl CapturedOutput {
    fn new(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit,
            truncated: false,
        }
    }

    /// Read to EOF; bytes past the limit are drained and dropped
    async fn read_from<R: AsyncRead + Unpin>(&mut self, mut reader: R) -> io::Result<()> {
        let mut chunk = [0u8; READ_CHUNK_BYTES];
        loop {
            let n = reader.read(&mut chunk).await?;
            if n == 0 {
                return Ok(());
            }
            let take = n.min(self.limit.saturating_sub(self.bytes.len()));
            self.bytes.extend_from_slice(&chunk[..take]);
            if take < n {
                self.truncated = true;
            }
        }
    }

    fn push_note(&mut self, note: &str) {
        if !self.bytes.is_empty() && !self.bytes.ends_with(b"\n") {
            self.bytes.push(b'\n');
        }
        self.bytes.extend_from_slice(note.as_bytes());
        self.bytes.push(b'\n');
    }
}

struct Capture {
    output: CapturedOutput,
    exit_code: i32,
    timed_out: bool,
}

/// Runs each probe as `<shell> -c <command>` (optionally under `sudo -n`)
pub struct ShellProbeRunner {
    config: RunnerConfig,
    clock: Arc<dyn Clock>,
}

impl ShellProbeRunner {
    /// Create a new shell runner
    ///
    /// # Example
    /// ```ignore
    /// let runner = ShellProbeRunner::new(RunnerConfig::default(), Arc::new(SystemClock));
    /// ```
    pub fn new(config: RunnerConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Full argv for one probe; the command text is passed as a single argument
    pub fn argv(&self, command: &str) -> Vec<String> {
        let mut argv = Vec::with_capacity(5);
        if self.config.elevate {
            argv.push("sudo".to_string());
            argv.push("-n".to_string());
        }
        argv.push(self.config.shell.clone());
        argv.push("-c".to_string());
        argv.push(command.to_string());
        argv
    }

    async fn spawn_and_capture(&self, command: &str) -> Result<Capture, CaptureError> {
        let argv = self.argv(command);
        let (reader, writer) = io::pipe().map_err(CaptureError::Collect)?;

        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(writer.try_clone().map_err(CaptureError::Collect)?)
            .stderr(writer)
            .process_group(0)
            .kill_on_drop(true);

        let spawned = cmd.spawn();
        // The parent's copies of the write end must close, or EOF never arrives
        drop(cmd);
        let mut child = spawned.map_err(|source| CaptureError::Spawn {
            program: argv[0].clone(),
            source,
        })?;

        let receiver =
            pipe::Receiver::from_owned_fd(OwnedFd::from(reader)).map_err(CaptureError::Collect)?;
        let mut output = CapturedOutput::new(self.config.max_output_bytes);

        let waited = {
            let collect = async {
                output.read_from(receiver).await?;
                child.wait().await
            };
            match self.config.timeout {
                Some(limit) => tokio::time::timeout(limit, collect).await.ok(),
                None => Some(collect.await),
            }
        };

        match waited {
            Some(status) => {
                let status = status.map_err(CaptureError::Collect)?;
                if output.truncated {
                    output.push_note(&format!(
                        "[output truncated at {} bytes]",
                        self.config.max_output_bytes
                    ));
                }
                Ok(Capture {
                    output,
                    exit_code: exit_code(status),
                    timed_out: false,
                })
            }
            None => {
                let limit = self.config.timeout.unwrap_or_default();
                warn!(command = %command, timeout = ?limit, "Probe timed out, terminating");
                terminate(&mut child).await;
                output.push_note(&format!("[probe timed out after {:?}]", limit));
                Ok(Capture {
                    output,
                    exit_code: EXIT_TIMED_OUT,
                    timed_out: true,
                })
            }
        }
    }
}

/// Numeric status; a signal-terminated probe reads as 128 + signal
fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}

/// SIGTERM the probe's process group, then SIGKILL after the grace period
async fn terminate(child: &mut Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Some(pid) = child.id() {
        let group = Pid::from_raw(pid as i32);
        if let Err(e) = killpg(group, Signal::SIGTERM) {
            debug!(pid = pid, error = %e, "SIGTERM to probe group failed");
        }
        if tokio::time::timeout(TERMINATE_GRACE, child.wait()).await.is_ok() {
            info!(pid = pid, "Timed-out probe exited after SIGTERM");
            return;
        }
        warn!(pid = pid, "Probe ignored SIGTERM, sending SIGKILL");
        let _ = killpg(group, Signal::SIGKILL);
    }
    let _ = child.kill().await;
}

#[async_trait]
impl ProbeRunner for ShellProbeRunner {
    async fn run(&self, command: &str) -> ProbeResult {
        let start = self.clock.now_millis();
        debug!(command = %command, "Starting probe");

        let result = match self.spawn_and_capture(command).await {
            Ok(capture) => ProbeResult::new(command, capture.output.bytes, capture.exit_code)
                .with_truncated(capture.output.truncated)
                .with_timed_out(capture.timed_out),
            Err(e) => {
                warn!(command = %command, error = %e, "Probe could not be executed");
                ProbeResult::new(command, format!("{}\n", e), e.exit_code())
            }
        };

        let duration_ms = self.clock.now_millis() - start;
        debug!(
            command = %command,
            exit_code = result.exit_code(),
            duration_ms = duration_ms,
            "Probe finished"
        );
        result.with_duration(duration_ms)
    }
}
