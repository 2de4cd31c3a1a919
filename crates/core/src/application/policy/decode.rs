// Embedded payload decoding (display only)
//
// Decoded text is rendered into the report annex and nowhere else: it is
// never executed and never written to another file. Key blocks hidden in a
// payload are redacted before the text is kept.

use super::redact::redact_private_keys;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Shortest token considered a payload
pub const MIN_TOKEN_LEN: usize = 16;

/// Upper bound on annex entries per probe
pub const MAX_DECODED_ENTRIES: usize = 32;

/// Decoded text longer than this is cut
pub const MAX_DECODED_CHARS: usize = 512;

const TOKEN_PREFIX_CHARS: usize = 12;

static RE_BASE64_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"[A-Za-z0-9+/]{{{},}}={{0,2}}", MIN_TOKEN_LEN))
        .expect("base64 token pattern is valid")
});

/// One payload found in a probe's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub token: String,
    pub text: String,
    /// Private key blocks removed from the decoded text
    pub redacted_keys: usize,
}

/// Find base64 tokens in `output` that decode to printable UTF-8 text
pub fn find_payloads(output: &[u8]) -> Vec<DecodedPayload> {
    let text = String::from_utf8_lossy(output);
    let mut seen = HashSet::new();
    let mut payloads = Vec::new();

    for token in RE_BASE64_TOKEN.find_iter(&text).map(|m| m.as_str()) {
        if payloads.len() >= MAX_DECODED_ENTRIES {
            break;
        }
        if !seen.insert(token) {
            continue;
        }
        if let Some((text, redacted_keys)) = decode_printable(token) {
            payloads.push(DecodedPayload {
                token: token.to_string(),
                text,
                redacted_keys,
            });
        }
    }

    payloads
}

/// Render the annex lines appended below the probe output
pub fn render_annex(payloads: &[DecodedPayload]) -> Vec<u8> {
    let mut annex = Vec::new();
    for payload in payloads {
        let prefix: String = payload.token.chars().take(TOKEN_PREFIX_CHARS).collect();
        annex.extend_from_slice(
            format!("[decoded] {}...: {}\n", prefix, escape_for_display(&payload.text)).as_bytes(),
        );
    }
    annex
}

fn decode_printable(token: &str) -> Option<(String, usize)> {
    let bytes = STANDARD
        .decode(token)
        .or_else(|_| STANDARD_NO_PAD.decode(token.trim_end_matches('=')))
        .ok()?;
    let (redacted, redacted_keys) = redact_private_keys(&bytes);
    let text = String::from_utf8(redacted.into_owned()).ok()?;

    let printable = text
        .chars()
        .all(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'));
    if !printable || text.trim().is_empty() {
        return None;
    }

    Some((text.chars().take(MAX_DECODED_CHARS).collect(), redacted_keys))
}

/// Keep the decoded payload on one report line
fn escape_for_display(text: &str) -> String {
    text.chars()
        .flat_map(|c| match c {
            '\n' | '\r' | '\t' => c.escape_default().collect::<Vec<_>>(),
            _ => vec![c],
        })
        .collect()
}
