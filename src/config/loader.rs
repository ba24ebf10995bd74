//! Substitution file discovery and parsing.

use crate::domain::SubstitutionTable;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Literal find → replace mapping as it appears on disk.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct SubsMap(BTreeMap<String, String>);

impl From<SubsMap> for SubstitutionTable {
    fn from(SubsMap(map): SubsMap) -> Self {
        SubstitutionTable::new(map.into_iter().collect())
    }
}

/// Load the substitution table.
///
/// With an explicit `subs_path`, any read or parse failure is fatal. When
/// the file is auto-discovered in `search_dir` instead, failures warn and
/// fall back to the built-in defaults; no file at all also means defaults.
pub fn load_substitutions(
    search_dir: &Path,
    subs_path: Option<&Path>,
) -> Result<SubstitutionTable> {
    let explicit = subs_path.is_some();

    let discovered = match subs_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_subs(search_dir),
    };

    let Some(subs_file) = discovered else {
        return Ok(SubstitutionTable::default());
    };

    let content = match fs::read_to_string(&subs_file)
        .with_context(|| format!("Failed reading substitution file: {}", subs_file.display()))
    {
        Ok(content) => content,
        Err(e) => {
            if explicit {
                return Err(e);
            }
            tracing::warn!("Ignoring unreadable substitution file {}: {}", subs_file.display(), e);
            return Ok(SubstitutionTable::default());
        }
    };

    let ext = subs_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "json" => parse_json_subs(&content, &subs_file),
        "toml" => parse_toml_subs(&content, &subs_file),
        "yaml" | "yml" => parse_yaml_subs(&content, &subs_file),
        other => Err(anyhow::anyhow!(
            "Unsupported substitution file extension '.{}' for {}",
            other,
            subs_file.display()
        )),
    };

    match parsed {
        Ok(table) => Ok(table),
        Err(e) => {
            if explicit {
                return Err(e);
            }
            tracing::warn!(
                "Failed to parse auto-discovered substitution file {}: {}",
                subs_file.display(),
                e
            );
            Ok(SubstitutionTable::default())
        }
    }
}

/// Parse a JSON substitution file, supporting a nested `substitutions` key.
fn parse_json_subs(content: &str, subs_file: &Path) -> Result<SubstitutionTable> {
    let raw: serde_json::Value = serde_json::from_str(content)
        .with_context(|| format!("Invalid JSON syntax: {}", subs_file.display()))?;

    let value = match raw.get("substitutions").cloned() {
        Some(nested) => nested,
        None => raw,
    };

    let map: SubsMap = serde_json::from_value(value)
        .with_context(|| format!("Invalid substitution mapping: {}", subs_file.display()))?;
    Ok(map.into())
}

/// Parse a TOML substitution file, supporting a nested `[substitutions]` table.
fn parse_toml_subs(content: &str, subs_file: &Path) -> Result<SubstitutionTable> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", subs_file.display()))?;

    let value = match raw.get("substitutions").cloned() {
        Some(nested) => nested,
        None => raw,
    };

    let map: SubsMap = value
        .try_into()
        .with_context(|| format!("Invalid substitution mapping: {}", subs_file.display()))?;
    Ok(map.into())
}

/// Parse a YAML substitution file, supporting a nested `substitutions` key.
fn parse_yaml_subs(content: &str, subs_file: &Path) -> Result<SubstitutionTable> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", subs_file.display()))?;

    let value = match raw.get("substitutions").cloned() {
        Some(nested) => nested,
        None => raw,
    };

    let map: SubsMap = serde_yaml::from_value(value)
        .with_context(|| format!("Invalid substitution mapping: {}", subs_file.display()))?;
    Ok(map.into())
}

fn discover_subs(search_dir: &Path) -> Option<PathBuf> {
    let candidates = [
        "subs.json",
        ".subs.json",
        "subs.toml",
        ".subs.toml",
        "subs.yml",
        ".subs.yml",
        "subs.yaml",
        ".subs.yaml",
    ];

    for candidate in candidates {
        let path = search_dir.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_file_present() {
        let tmp = TempDir::new().expect("tmp");
        let table = load_substitutions(tmp.path(), None).expect("table");
        assert_eq!(table, SubstitutionTable::default());
    }

    #[test]
    fn loads_discovered_json() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("subs.json"), r#"{"[.]": ".", "[at]": "@"}"#).expect("write");

        let table = load_substitutions(tmp.path(), None).expect("table");
        assert_eq!(table.len(), 2);
        assert_eq!(table.apply("scam[.]com"), "scam.com");
    }

    #[test]
    fn loads_nested_toml_table() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("rules.toml");
        fs::write(&path, "[substitutions]\n\"[.]\" = \".\"\n\"(dot)\" = \".\"\n").expect("write");

        let table = load_substitutions(tmp.path(), Some(&path)).expect("table");
        assert_eq!(table.len(), 2);
        assert_eq!(table.apply("bad(dot)net"), "bad.net");
    }

    #[test]
    fn loads_yaml_mapping() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("subs.yml");
        fs::write(&path, "\"[.]\": \".\"\n").expect("write");

        let table = load_substitutions(tmp.path(), Some(&path)).expect("table");
        assert_eq!(table.apply("a[.]b"), "a.b");
    }

    #[test]
    fn explicit_missing_file_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let missing = tmp.path().join("nope.json");
        assert!(load_substitutions(tmp.path(), Some(&missing)).is_err());
    }

    #[test]
    fn explicit_bad_mapping_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("subs.json");
        // values must be strings, not integers
        fs::write(&path, r#"{"[.]": 3}"#).expect("write");

        assert!(load_substitutions(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn explicit_unknown_extension_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("subs.ini");
        fs::write(&path, "[.]=.\n").expect("write");

        assert!(load_substitutions(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn discovered_bad_file_falls_back_to_defaults() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("subs.json"), "not json at all").expect("write");

        let table = load_substitutions(tmp.path(), None).expect("table");
        assert_eq!(table, SubstitutionTable::default());
    }

    #[test]
    fn file_rules_apply_in_key_order() {
        let tmp = TempDir::new().expect("tmp");
        // BTreeMap orders keys, so "aa" runs before "ab" regardless of file order
        fs::write(tmp.path().join("subs.json"), r#"{"ab": "x", "aa": "b"}"#).expect("write");

        let table = load_substitutions(tmp.path(), None).expect("table");
        // "aab" -> "aa" rule first -> "bb"; "ab" rule then finds nothing
        assert_eq!(table.apply("aab"), "bb");
    }
}
