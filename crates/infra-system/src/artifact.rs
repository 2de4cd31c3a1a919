// Report artifact writer with optional console mirror
//
// Mirroring is a wrapper that fans writes out, not a separate code path: the
// assembler writes once and the Tee delivers the same bytes to both sides.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Stdout, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use tracing::{info, warn};
use triage_core::AppError;

/// Report files can hold host details; keep them owner-only
pub const ARTIFACT_MODE: u32 = 0o600;

/// Writer that duplicates every write to an optional mirror.
///
/// The primary decides the outcome of a write. A mirror error is logged once
/// and the mirror is dropped; it never changes what reaches the primary.
pub struct Tee<A: Write, B: Write> {
    primary: A,
    mirror: Option<B>,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(primary: A, mirror: Option<B>) -> Self {
        Self { primary, mirror }
    }

    pub fn into_parts(self) -> (A, Option<B>) {
        (self.primary, self.mirror)
    }

    fn mirror_with(&mut self, op: impl FnOnce(&mut B) -> io::Result<()>) {
        if let Some(mirror) = self.mirror.as_mut() {
            if let Err(e) = op(mirror) {
                warn!(error = %e, "Console mirror failed; continuing with the report file only");
                self.mirror = None;
            }
        }
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.primary.write(buf)?;
        self.mirror_with(|m| m.write_all(&buf[..written]));
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        self.mirror_with(|m| m.flush());
        Ok(())
    }
}

/// The production writer: buffered report file plus optional stdout mirror
pub type ArtifactWriter = Tee<BufWriter<File>, Stdout>;

/// Create (or truncate) the report artifact at `path`.
///
/// Runs before any section so an unwritable destination fails fast.
///
/// # Errors
/// - AppError::ArtifactWrite if the file cannot be created
pub fn open_artifact(path: &Path, mirror: bool) -> Result<ArtifactWriter, AppError> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(ARTIFACT_MODE)
        .open(path)
        .map_err(|e| AppError::artifact_write(path, e))?;

    info!(path = %path.display(), mirror = mirror, "Report artifact opened");
    Ok(Tee::new(BufWriter::new(file), mirror.then(io::stdout)))
}
