// Report Assembler - runs the catalog and streams the report

pub mod constants;
pub mod format;

use crate::application::policy::render_output;
use crate::domain::{Catalog, ProbeOutcome, Report};
use crate::error::{AppError, Result};
use crate::port::{Clock, ProbeRunner};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Report Assembler
///
/// Owns the catalog and drives the probe runner strictly in catalog order:
/// every probe of section N completes before section N+1's header is written.
/// Each header and probe block is flushed as soon as it is written, so an
/// interrupted run leaves a well-formed prefix of the report.
pub struct ReportAssembler {
    catalog: Catalog,
    runner: Arc<dyn ProbeRunner>,
    clock: Arc<dyn Clock>,
}

impl ReportAssembler {
    /// Create a new assembler
    ///
    /// # Arguments
    /// * `catalog` - Probes to run, in report order
    /// * `runner` - Probe runner adapter (shell in production, mock in tests)
    /// * `clock` - Clock for run timestamps
    pub fn new(catalog: Catalog, runner: Arc<dyn ProbeRunner>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            runner,
            clock,
        }
    }

    /// Run every probe and write the report to `out`.
    ///
    /// `destination` is only used for the closing line and error context; the
    /// caller opens (and truncates) the artifact before calling, so an
    /// unwritable destination fails before any section is attempted.
    ///
    /// # Errors
    /// - AppError::ArtifactWrite if writing or flushing `out` fails. Probe
    ///   failures never surface here; they are recorded in the report.
    pub async fn generate<W: Write + ?Sized>(&self, out: &mut W, destination: &Path) -> Result<Report> {
        let span = info_span!(
            "triage_run",
            run_id = %Uuid::new_v4(),
            destination = %destination.display()
        );
        self.generate_inner(out, destination).instrument(span).await
    }

    async fn generate_inner<W: Write + ?Sized>(&self, out: &mut W, destination: &Path) -> Result<Report> {
        let io_err = |e| AppError::artifact_write(destination, e);
        let mut report = Report::new(destination, self.clock.now());

        info!(
            sections = self.catalog.sections().len(),
            probes = self.catalog.probe_count(),
            "Starting triage run"
        );

        for section in self.catalog.sections() {
            report.begin_section(section.name())?;
            format::write_section_header(out, section.name()).map_err(io_err)?;
            out.flush().map_err(io_err)?;

            info!(section = %section.name(), probes = section.probes().len(), "Section started");

            for probe in section.probes() {
                format::write_probe_start(out, probe.command()).map_err(io_err)?;
                out.flush().map_err(io_err)?;

                let result = self.runner.run(probe.command()).await;
                let rendered = render_output(probe, &result);

                format::write_probe_end(out, &rendered.bytes, result.exit_code()).map_err(io_err)?;
                out.flush().map_err(io_err)?;

                debug!(
                    command = %probe.command(),
                    exit_code = result.exit_code(),
                    duration_ms = result.duration_ms(),
                    bytes = rendered.bytes.len(),
                    redacted_keys = rendered.redacted_keys,
                    withheld_lines = rendered.withheld_lines,
                    decoded_payloads = rendered.decoded_payloads,
                    used_fallback = rendered.used_fallback,
                    dropped_lines = rendered.dropped_lines,
                    "Probe recorded"
                );
                if !result.succeeded() {
                    warn!(
                        section = %section.name(),
                        command = %probe.command(),
                        exit_code = result.exit_code(),
                        timed_out = result.timed_out(),
                        "Probe failed (recorded, continuing)"
                    );
                }

                report.record(ProbeOutcome {
                    command: result.command().to_string(),
                    exit_code: result.exit_code(),
                    duration_ms: result.duration_ms(),
                })?;
            }
        }

        format::write_completion(out, destination).map_err(io_err)?;
        out.flush().map_err(io_err)?;
        report.finalize(self.clock.now())?;

        let elapsed_ms = report
            .finished_at()
            .map(|end| (end - report.started_at()).num_milliseconds())
            .unwrap_or_default();
        info!(
            probes = report.probe_count(),
            failed = report.failed_count(),
            elapsed_ms = elapsed_ms,
            "Triage run complete"
        );

        Ok(report)
    }
}
