//! # rodo-cli: CLI Tool for the RODO Assessment Stack
//!
//! Provides the `rodo` command-line interface for working with assessment
//! documents offline, without the HTTP service.
//!
//! ## Subcommands
//!
//! - `rodo template`: Print the built-in questionnaire, or a blank
//!   assessment document ready to be filled in.
//! - `rodo summary`: Progress, tallies, compliance and risk of an
//!   assessment file.
//! - `rodo risk`: Likelihood × impact / controls risk score.
//! - `rodo weighted`: Weighted score of a risk-area list.
//! - `rodo compare`: Compare two area-score snapshots.
//!
//! ```bash
//! rodo template --new "Ocena RODO - Dział IT" > ocena.json
//! rodo summary ocena.json
//! rodo risk --likelihood 4 --impact 5 --controls 2
//! rodo compare q2.yaml q1.yaml --json
//! ```
//!
//! Input files are JSON, or YAML when the extension is `.yaml` or `.yml`.

pub mod compare;
pub mod risk;
pub mod summary;
pub mod template;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read and parse a JSON or YAML document, chosen by file extension.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML document {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON document {}", path.display()))
    }
}

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodo_scoring::AreaScore;

    #[test]
    fn load_json_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, r#"[{"id": 1, "name": "Zgody", "score": 75.0}]"#).unwrap();

        let scores: Vec<AreaScore> = load_document(&path).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].name, "Zgody");
    }

    #[test]
    fn load_yaml_document_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["scores.yaml", "scores.YML"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "- id: 2\n  name: Rejestr\n  score: 40\n").unwrap();
            let scores: Vec<AreaScore> = load_document(&path).unwrap();
            assert_eq!(scores[0].id, 2);
            assert_eq!(scores[0].score, 40.0);
        }
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_document::<Vec<AreaScore>>(Path::new("/nonexistent/rodo.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/rodo.json"));
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_document::<Vec<AreaScore>>(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse JSON"));
    }
}
