//! Fingerprint line extraction
//!
//! cloud-init prints the host keys it generates as MD5 fingerprints
//! (`2048 5e:4f:...:a1 root@ip-10-0-0-1 (RSA)`). Any line carrying
//! sixteen colon-separated lowercase hex pairs is treated as one.

use crate::types::FingerprintLine;
use regex::bytes::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

static FINGERPRINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)([0-9a-f]{2}(:|\b)){16}").expect("fingerprint pattern is valid")
});

/// Check whether a single line contains a fingerprint-shaped run of hex pairs
pub fn is_fingerprint_line(line: &[u8]) -> bool {
    FINGERPRINT_RE.is_match(line)
}

/// Extract distinct fingerprint lines from normalized console text
///
/// Lines keep their trailing newline; the last fragment may not have one.
/// Lines are returned in first-seen order and byte-identical repeats
/// (a banner echoed by a second boot, say) are dropped.
pub fn extract_fingerprint_lines(text: &[u8]) -> Vec<FingerprintLine> {
    let mut seen: HashSet<&[u8]> = HashSet::new();
    let mut lines = Vec::new();

    for line in text.split_inclusive(|&b| b == b'\n') {
        if seen.contains(line) {
            continue;
        }
        if is_fingerprint_line(line) {
            seen.insert(line);
            lines.push(FingerprintLine::new(line));
        }
    }

    debug!(matched = lines.len(), "Extracted fingerprint lines");
    lines
}
