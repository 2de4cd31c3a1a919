// Report Domain Model
//
// The Report is the structural skeleton of one run. Captured output is
// streamed to the artifact and never held here.

use crate::domain::error::{DomainError, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Run state machine: Init -> (SectionHeader -> ProbeLoop)* -> Finalize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    /// Index of the section currently receiving probe outcomes
    InSection(usize),
    Finalized,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Init => write!(f, "INIT"),
            RunPhase::InSection(idx) => write!(f, "SECTION[{}]", idx),
            RunPhase::Finalized => write!(f, "FINALIZED"),
        }
    }
}

/// What the report remembers about one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub command: String,
    pub exit_code: i32,
    pub duration_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub name: String,
    pub probes: Vec<ProbeOutcome>,
}

#[derive(Debug, Clone)]
pub struct Report {
    destination: PathBuf,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    sections: Vec<SectionSummary>,
    phase: RunPhase,
}

impl Report {
    /// Start a fresh report in the Init phase
    pub fn new(destination: impl Into<PathBuf>, started_at: DateTime<Utc>) -> Self {
        Self {
            destination: destination.into(),
            started_at,
            finished_at: None,
            sections: Vec::new(),
            phase: RunPhase::Init,
        }
    }

    /// Transition to a new section (from Init or a previous section)
    pub fn begin_section(&mut self, name: impl Into<String>) -> Result<()> {
        if self.phase == RunPhase::Finalized {
            return Err(DomainError::InvalidStateTransition {
                from: self.phase.to_string(),
                to: "SECTION".to_string(),
            });
        }
        self.sections.push(SectionSummary {
            name: name.into(),
            probes: Vec::new(),
        });
        self.phase = RunPhase::InSection(self.sections.len() - 1);
        Ok(())
    }

    /// Record a probe outcome into the open section
    pub fn record(&mut self, outcome: ProbeOutcome) -> Result<()> {
        match self.phase {
            RunPhase::InSection(idx) => {
                self.sections[idx].probes.push(outcome);
                Ok(())
            }
            other => Err(DomainError::InvalidStateTransition {
                from: other.to_string(),
                to: "PROBE".to_string(),
            }),
        }
    }

    /// Close the run; no transition leaves Finalized
    pub fn finalize(&mut self, finished_at: DateTime<Utc>) -> Result<()> {
        if self.phase == RunPhase::Finalized {
            return Err(DomainError::InvalidStateTransition {
                from: self.phase.to_string(),
                to: RunPhase::Finalized.to_string(),
            });
        }
        self.phase = RunPhase::Finalized;
        self.finished_at = Some(finished_at);
        Ok(())
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn sections(&self) -> &[SectionSummary] {
        &self.sections
    }

    /// Section names with their probe counts, in report order
    pub fn skeleton(&self) -> Vec<(String, usize)> {
        self.sections
            .iter()
            .map(|s| (s.name.clone(), s.probes.len()))
            .collect()
    }

    pub fn probe_count(&self) -> usize {
        self.sections.iter().map(|s| s.probes.len()).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.probes.iter())
            .filter(|p| p.exit_code != 0)
            .count()
    }
}
