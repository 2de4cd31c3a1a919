// Catalog authoring checks
//
// Secret handling is decided when the catalog is written: no probe may read
// raw secret-bearing files, and key probes must derive fingerprints. These
// checks run in tests and behind `host-triage catalog --check`, not per run.

use crate::domain::{Catalog, ProbeKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// Private SSH keys (public halves end in .pub and are allowed) and shadow files
static RE_SECRET_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:id_(?:rsa|dsa|ecdsa|ed25519)|ssh_host_[a-z0-9*]+_key|/etc/g?shadow-?)(?:[^.\w-]|$)")
        .expect("secret path pattern is valid")
});

static RE_FINGERPRINT_TOOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ssh-keygen\s+-l").expect("fingerprint tool pattern is valid"));

/// One authoring rule broken by one catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogViolation {
    pub section: String,
    pub command: Option<String>,
    pub reason: String,
}

impl std::fmt::Display for CatalogViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.command {
            Some(command) => write!(f, "[{}] `{}`: {}", self.section, command, self.reason),
            None => write!(f, "[{}]: {}", self.section, self.reason),
        }
    }
}

/// True when `command` references a private key or shadow file
pub fn references_secret_path(command: &str) -> bool {
    RE_SECRET_PATH.is_match(command)
}

/// Check every section and probe; returns all violations found
pub fn check_catalog(catalog: &Catalog) -> Result<(), Vec<CatalogViolation>> {
    let mut violations = Vec::new();
    let mut names = HashSet::new();

    for section in catalog.sections() {
        let name = section.name().to_string();

        if name.trim().is_empty() {
            violations.push(CatalogViolation {
                section: name.clone(),
                command: None,
                reason: "section name is empty".to_string(),
            });
        } else if !names.insert(name.clone()) {
            violations.push(CatalogViolation {
                section: name.clone(),
                command: None,
                reason: "section name is declared twice".to_string(),
            });
        }

        for probe in section.probes() {
            let command = probe.command();
            let mut violation = |reason: &str| {
                violations.push(CatalogViolation {
                    section: name.clone(),
                    command: Some(command.to_string()),
                    reason: reason.to_string(),
                })
            };

            if command.trim().is_empty() {
                violation("command text is empty");
            }
            if references_secret_path(command) {
                violation("reads a secret-bearing file; emit a fingerprint or summary instead");
            }
            if probe.kind() == ProbeKind::KeyFingerprint && !RE_FINGERPRINT_TOOL.is_match(command) {
                violation("key probe does not derive fingerprints with `ssh-keygen -l`");
            }
            if probe.max_lines() == Some(0) {
                violation("output cap of zero lines");
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
