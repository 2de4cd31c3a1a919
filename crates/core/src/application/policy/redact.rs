// Secret redaction applied to every probe's output

use once_cell::sync::Lazy;
use regex::bytes::{NoExpand, Regex};
use std::borrow::Cow;

pub const REDACTED_PRIVATE_KEY: &[u8] = b"[REDACTED PRIVATE KEY]";

// PEM private key blocks (RSA, EC, OPENSSH, ENCRYPTED, PKCS#8...).
// An unterminated block is redacted through the end of the output.
// Byte mode (-u): the body may hold any bytes, valid UTF-8 or not.
static RE_PEM_PRIVATE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s-u)-----BEGIN [A-Z0-9 ]*PRIVATE KEY-----.*?(?:-----END [A-Z0-9 ]*PRIVATE KEY-----|\z)",
    )
    .expect("private key pattern is valid")
});

/// Replace private key blocks; returns the output and the number of blocks removed
pub fn redact_private_keys(output: &[u8]) -> (Cow<'_, [u8]>, usize) {
    let count = RE_PEM_PRIVATE_KEY.find_iter(output).count();
    if count == 0 {
        return (Cow::Borrowed(output), 0);
    }
    (
        RE_PEM_PRIVATE_KEY.replace_all(output, NoExpand(REDACTED_PRIVATE_KEY)),
        count,
    )
}

/// True when `output` still carries private key material
pub fn contains_private_key(output: &[u8]) -> bool {
    RE_PEM_PRIVATE_KEY.is_match(output)
}
