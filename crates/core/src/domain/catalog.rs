// Probe Catalog Domain Model
//
// A catalog is static data: an ordered list of sections, each an ordered list
// of probes. It is built once at startup and consumed read-only.

/// How the assembler treats a probe's captured output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// Output is written as captured (after global secret redaction)
    Plain,
    /// Subject is key material: only fingerprint lines may reach the report
    KeyFingerprint,
    /// Output carries encoded blobs that are decoded for display only
    EncodedPayload,
}

impl std::fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeKind::Plain => write!(f, "plain"),
            ProbeKind::KeyFingerprint => write!(f, "key-fingerprint"),
            ProbeKind::EncodedPayload => write!(f, "encoded-payload"),
        }
    }
}

/// One read-only diagnostic command.
///
/// Fields are private: the command text is fixed once the probe is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    command: String,
    kind: ProbeKind,
    max_lines: Option<usize>,
    fallback: Option<String>,
}

impl Probe {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            kind: ProbeKind::Plain,
            max_lines: None,
            fallback: None,
        }
    }

    /// Probe over key material; must emit fingerprints, never key bytes
    pub fn key_fingerprint(command: impl Into<String>) -> Self {
        Self {
            kind: ProbeKind::KeyFingerprint,
            ..Self::new(command)
        }
    }

    /// Probe whose output holds base64 payloads worth decoding for the reader
    pub fn encoded_payload(command: impl Into<String>) -> Self {
        Self {
            kind: ProbeKind::EncodedPayload,
            ..Self::new(command)
        }
    }

    /// Bound the rendered output to `max_lines` lines
    pub fn capped(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }

    /// Message written instead of empty output when the probe fails
    pub fn with_fallback(mut self, message: impl Into<String>) -> Self {
        self.fallback = Some(message.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn kind(&self) -> ProbeKind {
        self.kind
    }

    pub fn max_lines(&self) -> Option<usize> {
        self.max_lines
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }
}

/// A named, ordered group of probes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    probes: Vec<Probe>,
}

impl Section {
    pub fn new(name: impl Into<String>, probes: Vec<Probe>) -> Self {
        Self {
            name: name.into(),
            probes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }
}

/// Ordered list of sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    sections: Vec<Section>,
}

impl Catalog {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Build a catalog from ordered `(section, command)` pairs.
    ///
    /// Consecutive pairs sharing a section name are grouped; a name that
    /// reappears later opens a new section at that position.
    ///
    /// # Example
    /// ```text
    /// let catalog = Catalog::from_pairs([("A", "echo hi"), ("B", "false")]);
    /// assert_eq!(catalog.sections().len(), 2);
    /// ```
    pub fn from_pairs<I, S, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: Into<String>,
    {
        let mut sections: Vec<Section> = Vec::new();
        for (section, command) in pairs {
            let section = section.into();
            let probe = Probe::new(command);
            match sections.last_mut() {
                Some(last) if last.name == section => last.probes.push(probe),
                _ => sections.push(Section::new(section, vec![probe])),
            }
        }
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All probes in report order, paired with their section name
    pub fn probes(&self) -> impl Iterator<Item = (&str, &Probe)> {
        self.sections
            .iter()
            .flat_map(|s| s.probes.iter().map(move |p| (s.name.as_str(), p)))
    }

    pub fn probe_count(&self) -> usize {
        self.sections.iter().map(|s| s.probes.len()).sum()
    }
}
