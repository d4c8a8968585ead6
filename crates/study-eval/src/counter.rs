//! Identifier counter file.
//!
//! The counter is read once when the evaluator is created and written back
//! at finalize. Nothing in the session increments it; operators bump the
//! value in the file between sessions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EvaluatorError, Result};
use crate::io::write_atomic;

const DEFAULT_IDENTIFIER_INDEX: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CounterFile {
    #[serde(rename = "identifierIdx", default = "default_index")]
    identifier_idx: u32,
}

fn default_index() -> u32 {
    DEFAULT_IDENTIFIER_INDEX
}

/// Reads the identifier index from the counter file.
///
/// A missing file yields the default index 1.
pub fn load_identifier_index(path: &Path) -> Result<u32> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no evaluator config, using default identifier index");
        return Ok(DEFAULT_IDENTIFIER_INDEX);
    }

    let content = fs::read_to_string(path).map_err(|e| EvaluatorError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;

    let file: CounterFile =
        serde_json::from_str(&content).map_err(|e| EvaluatorError::InvalidConfig {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(file.identifier_idx)
}

/// Writes the identifier index to the counter file.
pub fn save_identifier_index(path: &Path, index: u32) -> Result<()> {
    let file = CounterFile {
        identifier_idx: index,
    };
    let content = serde_json::to_string_pretty(&file).map_err(|e| EvaluatorError::InvalidConfig {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_atomic(path, content.as_bytes())
}

/// Expands `{0}` and `{0:Dn}` placeholders in `pattern` with `index`.
///
/// Anything else is copied verbatim.
pub fn format_identifier(pattern: &str, index: u32) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    while let Some(start) = rest.find("{0") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        if let Some(tail) = after.strip_prefix('}') {
            out.push_str(&index.to_string());
            rest = tail;
            continue;
        }

        if let Some((width, tail)) = parse_padding(after) {
            out.push_str(&format!("{index:0width$}"));
            rest = tail;
            continue;
        }

        out.push_str("{0");
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Parses `:Dn}` and returns `n` with the remaining text.
fn parse_padding(text: &str) -> Option<(usize, &str)> {
    let format = text.strip_prefix(":D")?;
    let end = format.find('}')?;
    let width = format[..end].parse().ok()?;
    Some((width, &format[end + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_defaults_to_one() {
        let dir = tempdir().unwrap();
        let index = load_identifier_index(&dir.path().join("evaluator.json")).unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn counter_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/evaluator.json");

        save_identifier_index(&path, 17).unwrap();
        assert_eq!(load_identifier_index(&path).unwrap(), 17);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["identifierIdx"], 17);
    }

    #[test]
    fn missing_key_defaults_to_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("evaluator.json");
        fs::write(&path, "{}").unwrap();
        assert_eq!(load_identifier_index(&path).unwrap(), 1);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("evaluator.json");
        fs::write(&path, "{ \"identifierIdx\": ").unwrap();
        assert!(matches!(
            load_identifier_index(&path),
            Err(EvaluatorError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn identifier_patterns() {
        assert_eq!(format_identifier("{0}", 4), "4");
        assert_eq!(format_identifier("P{0:D3}", 4), "P004");
        assert_eq!(format_identifier("run-{0}-{0}", 12), "run-12-12");
        assert_eq!(format_identifier("plain", 4), "plain");
        assert_eq!(format_identifier("{0:Dx}", 4), "{0:Dx}");
        assert_eq!(format_identifier("{1}", 4), "{1}");
    }
}
