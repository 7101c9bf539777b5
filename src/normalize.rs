//! Terminal escape stripping
//!
//! Console output is captured from a serial port, so it carries VT100
//! colour codes and carriage returns. This is a heuristic, not a
//! terminal emulator: CSI-like sequences (`ESC [`, parameter bytes, then
//! a letter) and bare `\r` bytes are removed.

const ESC: u8 = 0x1b;

/// Remove escape sequences and carriage returns from raw console bytes
///
/// Runs in one pass. A sequence that only forms once its inner parts are
/// gone (`ESC \r [A`, `ESC [ ESC [A A`) is removed as well, so the result
/// never contains anything left to strip.
pub fn strip_escapes(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());

    for &byte in input {
        if byte == b'\r' {
            continue;
        }
        if byte.is_ascii_alphabetic() {
            if let Some(start) = open_sequence_start(&out) {
                out.truncate(start);
                continue;
            }
        }
        out.push(byte);
    }

    out
}

/// Bytes that end the parameter run of a sequence
fn ends_parameters(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'[' || byte == b']'
}

/// Offset of the `ESC [` whose parameter bytes run to the end of `out`
fn open_sequence_start(out: &[u8]) -> Option<usize> {
    let params = out.iter().rev().take_while(|&&b| !ends_parameters(b)).count();
    let bracket = out.len().checked_sub(params + 1)?;
    let esc = bracket.checked_sub(1)?;

    (out[bracket] == b'[' && out[esc] == ESC).then_some(esc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::bytes::Regex;

    /// Regex removal repeated until nothing matches
    fn strip_by_regex(input: &[u8]) -> Vec<u8> {
        let re = Regex::new(r"(?-u)\x1b\[[^a-zA-Z\[\]]*?[a-zA-Z]|\r").unwrap();
        let mut current = input.to_vec();
        while re.is_match(&current) {
            current = re.replace_all(&current, &b""[..]).into_owned();
        }
        current
    }

    const SAMPLES: [&[u8]; 10] = [
        b"",
        b"\r\r\r",
        b"\x1b[1m\x1b[31mred\x1b[0m\r\n",
        b"x\x1b\r[Ay",
        b"x\x1b[\x1b[AAy",
        b"\x1b\x1b[[[Z]]\x1b[9",
        b"\x1b[?25l\x1b[2J\x1b[H[  OK  ] Reached target\r\n",
        b"\x1b]0;title\x07\x1b[1;1H",
        b"a\x1b[\x1b]b\x1b[12\x1b[3mc",
        b"\x1b[\x1b[\x1b[AB\x1b\r\r[9Cz",
    ];

    #[test]
    fn test_strips_colour_codes() {
        let input = b"\x1b[0;32m  OK  \x1b[0m] Started OpenSSH\n";
        assert_eq!(strip_escapes(input), b"  OK  ] Started OpenSSH\n");
    }

    #[test]
    fn test_strips_carriage_returns() {
        assert_eq!(strip_escapes(b"line one\r\nline two\r\n"), b"line one\nline two\n");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let input = b"ci-info: no authorized ssh keys\n";
        assert_eq!(strip_escapes(input), input.to_vec());
    }

    #[test]
    fn test_non_utf8_bytes_inside_sequence() {
        assert_eq!(strip_escapes(b"a\x1b[\xff\xfe1mb"), b"ab");
    }

    #[test]
    fn test_unterminated_sequence_left_alone() {
        assert_eq!(strip_escapes(b"tail\x1b[12;3"), b"tail\x1b[12;3");
    }

    #[test]
    fn test_spliced_sequences_are_removed() {
        assert_eq!(strip_escapes(b"x\x1b\r[Ay"), b"xy");
        assert_eq!(strip_escapes(b"x\x1b[\x1b[AAy"), b"xy");
    }

    #[test]
    fn test_matches_repeated_regex_removal() {
        for input in SAMPLES {
            assert_eq!(strip_escapes(input), strip_by_regex(input), "input {:?}", input);
        }
    }

    #[test]
    fn test_deeply_nested_sequences() {
        let depth = 20_000;
        let mut input = b"\x1b[".repeat(depth);
        input.extend(std::iter::repeat(b'A').take(depth));
        input.extend_from_slice(b"login: \r\n");

        assert_eq!(strip_escapes(&input), b"login: \n");
    }

    #[test]
    fn test_idempotent() {
        for input in SAMPLES {
            let once = strip_escapes(input);
            let twice = strip_escapes(&once);
            assert_eq!(once, twice, "input {:?}", input);
            assert!(once.len() <= input.len());
        }
    }
}
