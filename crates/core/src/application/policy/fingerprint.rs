// Key-fingerprint filter for probes whose subject is key material

use super::redact::REDACTED_PRIVATE_KEY;
use once_cell::sync::Lazy;
use regex::bytes::Regex;

pub const WITHHELD_LINE: &[u8] = b"[withheld: not a key fingerprint]";

// `ssh-keygen -l` format: "<bits> SHA256:<digest> <comment> (<type>)"
static RE_FINGERPRINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+ (?:SHA256|MD5):[A-Za-z0-9+/=:]+(?: .*)?$").expect("fingerprint pattern is valid")
});

/// True if `line` (without its newline) is a fingerprint line
pub fn is_fingerprint_line(line: &[u8]) -> bool {
    RE_FINGERPRINT.is_match(line)
}

/// Replace every non-blank line that is not a fingerprint.
///
/// Returns the filtered output and the number of lines withheld.
pub fn withhold_non_fingerprints(output: &[u8]) -> (Vec<u8>, usize) {
    let mut filtered = Vec::with_capacity(output.len());
    let mut withheld = 0;

    for line in output.split_inclusive(|b| *b == b'\n') {
        let (body, newline) = match line.strip_suffix(b"\n") {
            Some(body) => (body, true),
            None => (line, false),
        };
        let body = body.strip_suffix(b"\r").unwrap_or(body);

        let keep = body.iter().all(u8::is_ascii_whitespace)
            || body == REDACTED_PRIVATE_KEY
            || is_fingerprint_line(body);

        if keep {
            filtered.extend_from_slice(line);
        } else {
            filtered.extend_from_slice(WITHHELD_LINE);
            if newline {
                filtered.push(b'\n');
            }
            withheld += 1;
        }
    }

    (filtered, withheld)
}
