//! Parsing of previously printed digest listings.
//!
//! Both line shapes are recognised on every line, whatever `--tag` says:
//!
//! ```text
//! 66c7f0f4...8f4ba8e0  a.out
//! SM3 (a.out) = 66c7f0f4...8f4ba8e0
//! ```

use std::io::BufRead;
use std::path::{Path, PathBuf};

use sm3::Hash256;
use thiserror::Error;
use tracing::debug;

use crate::name::path_from_bytes;

const HEX_LEN: usize = 2 * sm3::DIGEST_LEN;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecklistEntry {
    pub file_name: PathBuf,
    pub expected: Hash256,
}

#[derive(Error, Debug)]
pub enum ChecklistError {
    #[error("{source_name}:{line}: improperly formatted SM3 checksum line")]
    Malformed { source_name: String, line: usize },

    #[error("{source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },
}

/// Parses one checklist line, without its terminator.
pub fn parse_line(line: &[u8]) -> Option<ChecklistEntry> {
    match line.strip_prefix(b"SM3") {
        Some(rest) => parse_tag(rest),
        None => parse_classic(line),
    }
}

// SM3 (name) = hex, also seen as SM3(name) = hex
fn parse_tag(rest: &[u8]) -> Option<ChecklistEntry> {
    let rest = trim_start(rest).strip_prefix(b"(")?;
    let close = rest.iter().rposition(|&b| b == b')')?;
    let hex = trim_start(&rest[close + 1..]).strip_prefix(b"=")?;
    entry(&rest[..close], trim_end(trim_start(hex)))
}

// hex, one separator, an optional mode marker, then the name
fn parse_classic(line: &[u8]) -> Option<ChecklistEntry> {
    if line.len() < HEX_LEN {
        return None;
    }
    let (hex, rest) = line.split_at(HEX_LEN);
    let rest = match rest.split_first() {
        Some((sep, rest)) if sep.is_ascii_whitespace() => rest,
        _ => return None,
    };
    let name = match rest.split_first() {
        Some((&b' ', name)) | Some((&b'*', name)) => name,
        _ => rest,
    };
    entry(name, hex)
}

fn entry(name: &[u8], hex: &[u8]) -> Option<ChecklistEntry> {
    if name.is_empty() {
        return None;
    }
    let expected = Hash256::from_hex(std::str::from_utf8(hex).ok()?).ok()?;
    Some(ChecklistEntry {
        file_name: path_from_bytes(name),
        expected,
    })
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes.iter().take_while(|b| b.is_ascii_whitespace()).count();
    &bytes[skip..]
}

fn trim_end(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .rev()
        .take_while(|b| b.is_ascii_whitespace())
        .count();
    &bytes[..bytes.len() - skip]
}

/// Reads a whole listing. Any malformed line rejects the listing.
///
/// Lines are taken as raw bytes, so file names need not be UTF-8. Entries
/// naming `-` are dropped; the rest keep their order.
pub fn read_checklist<R: BufRead>(
    mut reader: R,
    source_name: &str,
) -> Result<Vec<ChecklistEntry>, ChecklistError> {
    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|error| ChecklistError::Io {
                source_name: source_name.to_owned(),
                error,
            })?;
        if n == 0 {
            break;
        }
        line_no += 1;

        let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let entry = parse_line(line).ok_or_else(|| ChecklistError::Malformed {
            source_name: source_name.to_owned(),
            line: line_no,
        })?;
        if entry.file_name == Path::new("-") {
            debug!(source_name, line = line_no, "skipping stdin entry");
            continue;
        }
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ABC: &str = "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0";

    fn abc(name: &str) -> ChecklistEntry {
        ChecklistEntry {
            file_name: PathBuf::from(name),
            expected: Hash256::from_hex(ABC).unwrap(),
        }
    }

    #[test]
    fn bsd_tag_with_and_without_space() {
        assert_eq!(parse_line(format!("SM3 (a.out) = {}", ABC).as_bytes()), Some(abc("a.out")));
        assert_eq!(parse_line(format!("SM3(a.out) = {}", ABC).as_bytes()), Some(abc("a.out")));
        assert_eq!(
            parse_line(format!("SM3 (odd (name)) = {}", ABC).as_bytes()),
            Some(abc("odd (name)"))
        );
    }

    #[test]
    fn classic_separators() {
        assert_eq!(parse_line(format!("{} a.out", ABC).as_bytes()), Some(abc("a.out")));
        assert_eq!(parse_line(format!("{}  a.out", ABC).as_bytes()), Some(abc("a.out")));
        assert_eq!(parse_line(format!("{} *a.out", ABC).as_bytes()), Some(abc("a.out")));
        assert_eq!(parse_line(format!("{}\ta.out", ABC).as_bytes()), Some(abc("a.out")));
        assert_eq!(
            parse_line(format!("{}  with space", ABC.to_uppercase()).as_bytes()),
            Some(abc("with space"))
        );
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(parse_line(b""), None);
        assert_eq!(parse_line(ABC.as_bytes()), None);
        assert_eq!(parse_line(format!("{} ", ABC).as_bytes()), None);
        assert_eq!(parse_line(format!("{}a.out", ABC).as_bytes()), None);
        assert_eq!(parse_line(format!("{} a.out", &ABC[1..]).as_bytes()), None);
        assert_eq!(parse_line(format!("SM3 (a.out) {}", ABC).as_bytes()), None);
        assert_eq!(parse_line(b"SM3 (a.out) = 1234"), None);
    }

    #[test]
    fn listing_keeps_order_and_drops_stdin() {
        let listing = format!(
            "{h}  b.txt\r\nSM3 (-) = {h}\nSM3 (a.txt) = {h}\n{h}  -\n",
            h = ABC
        );
        let entries = read_checklist(listing.as_bytes(), "sums").unwrap();
        assert_eq!(entries, vec![abc("b.txt"), abc("a.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_kept_verbatim() {
        let mut listing = format!("{}  caf", ABC).into_bytes();
        listing.extend_from_slice(b"\xe9\nSM3 (na\xefve) = ");
        listing.extend_from_slice(ABC.as_bytes());
        listing.push(b'\n');

        let entries = read_checklist(&listing[..], "sums").unwrap();
        assert_eq!(
            entries,
            vec![
                ChecklistEntry {
                    file_name: path_from_bytes(b"caf\xe9"),
                    expected: Hash256::from_hex(ABC).unwrap(),
                },
                ChecklistEntry {
                    file_name: path_from_bytes(b"na\xefve"),
                    expected: Hash256::from_hex(ABC).unwrap(),
                },
            ]
        );
    }

    #[test]
    fn last_line_without_newline() {
        let listing = format!("{}  a.out", ABC);
        let entries = read_checklist(listing.as_bytes(), "sums").unwrap();
        assert_eq!(entries, vec![abc("a.out")]);
    }

    #[test]
    fn one_bad_line_rejects_the_listing() {
        let listing = format!("{h}  a\n\n{h}  b\n", h = ABC);
        let err = read_checklist(listing.as_bytes(), "sums").unwrap_err();
        assert!(matches!(err, ChecklistError::Malformed { ref source_name, line: 2 } if source_name == "sums"));
        assert_eq!(
            err.to_string(),
            "sums:2: improperly formatted SM3 checksum line"
        );
    }
}
