use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tax_core::{BracketIssue, BracketSet, TaxBracket};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when loading bracket configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parse error: {0}")]
    Csv(String),

    #[error("invalid bracket configuration: {}", join_issues(.0))]
    Invalid(Vec<BracketIssue>),
}

impl From<csv::Error> for ConfigError {
    fn from(err: csv::Error) -> Self {
        ConfigError::Csv(err.to_string())
    }
}

fn join_issues(issues: &[BracketIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// On-disk format of a bracket file, picked from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Csv,
}

impl ConfigFormat {
    /// `.csv` (any case) selects CSV; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// A single bracket as written in a configuration file.
///
/// - `rate`: the marginal rate as a percentage (e.g. `22` for 22%)
/// - `up_to`: the upper bound of the bracket (absent, `null`, or an empty
///   CSV cell for the open-ended top bracket)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub rate: f64,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub up_to: Option<f64>,
}

impl From<BracketRecord> for TaxBracket {
    fn from(record: BracketRecord) -> Self {
        TaxBracket {
            rate: record.rate,
            upper_bound: record.up_to,
        }
    }
}

/// Accepts a number, `null`, or a string holding a number. Blank strings
/// are treated as `null` so empty CSV cells mean "no upper bound".
fn deserialize_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
struct JsonConfig {
    brackets: Vec<BracketRecord>,
}

/// Loader for bracket configuration files.
///
/// Every entry point returns a [`BracketSet`], so the brackets come back
/// sorted ascending by upper bound with the open-ended bracket last,
/// whatever order the file lists them in. Semantic problems (see
/// [`BracketSet::validate`]) are logged as warnings, never rejected here.
pub struct BracketConfigLoader;

impl BracketConfigLoader {
    /// Parse a JSON document of the form
    /// `{"brackets": [{"rate": 10, "up_to": 1000}, {"rate": 20, "up_to": null}]}`.
    pub fn from_json_str(input: &str) -> Result<BracketSet, ConfigError> {
        let config: JsonConfig = serde_json::from_str(input)?;
        Ok(Self::build(config.brackets))
    }

    /// Same as [`from_json_str`](Self::from_json_str) for any reader.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<BracketSet, ConfigError> {
        let config: JsonConfig = serde_json::from_reader(reader)?;
        Ok(Self::build(config.brackets))
    }

    /// Parse CSV with a `rate,up_to` header. Column order does not matter
    /// and whitespace around values is ignored.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<BracketSet, ConfigError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(Self::build(records))
    }

    /// Read `path` from disk, choosing the format by extension.
    pub fn load_from_file(path: &Path) -> Result<BracketSet, ConfigError> {
        let format = ConfigFormat::from_path(path);
        debug!(path = %path.display(), ?format, "loading bracket configuration");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match format {
            ConfigFormat::Json => Self::from_json_str(&contents),
            ConfigFormat::Csv => Self::from_csv_reader(contents.as_bytes()),
        }
    }

    /// Like [`load_from_file`](Self::load_from_file), but any semantic issue
    /// fails the load with [`ConfigError::Invalid`].
    pub fn load_strict(path: &Path) -> Result<BracketSet, ConfigError> {
        let brackets = Self::load_from_file(path)?;
        let issues = brackets.validate();
        if issues.is_empty() {
            Ok(brackets)
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }

    fn build(records: Vec<BracketRecord>) -> BracketSet {
        let brackets = BracketSet::new(records.into_iter().map(TaxBracket::from).collect());
        debug!(count = brackets.len(), "parsed brackets");

        for issue in brackets.validate() {
            warn!(%issue, "questionable bracket configuration");
        }

        brackets
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const TWO_BRACKETS_JSON: &str = r#"{
        "brackets": [
            { "rate": 20, "up_to": null },
            { "rate": 10, "up_to": 1000 }
        ]
    }"#;

    // -----------------------------------------------------------------------
    // JSON
    // -----------------------------------------------------------------------

    #[test]
    fn test_json_brackets_are_sorted() {
        let brackets = BracketConfigLoader::from_json_str(TWO_BRACKETS_JSON).unwrap();

        assert_eq!(
            brackets.brackets(),
            &[TaxBracket::bounded(10.0, 1000.0), TaxBracket::open_ended(20.0)]
        );
    }

    #[test]
    fn test_json_missing_up_to_is_open_ended() {
        let json = r#"{"brackets": [{"rate": 37}]}"#;

        let brackets = BracketConfigLoader::from_json_str(json).unwrap();

        assert_eq!(brackets.brackets(), &[TaxBracket::open_ended(37.0)]);
    }

    #[test]
    fn test_json_fractional_values() {
        let json = r#"{"brackets": [{"rate": 12.5, "up_to": 999.99}]}"#;

        let brackets = BracketConfigLoader::from_json_str(json).unwrap();

        assert_eq!(brackets.brackets(), &[TaxBracket::bounded(12.5, 999.99)]);
    }

    #[test]
    fn test_json_ignores_unknown_fields() {
        let json = r#"{"name": "test", "brackets": [{"rate": 10, "up_to": 5, "note": "x"}]}"#;

        let brackets = BracketConfigLoader::from_json_str(json).unwrap();

        assert_eq!(brackets.len(), 1);
    }

    #[test]
    fn test_json_missing_rate_is_an_error() {
        let json = r#"{"brackets": [{"up_to": 1000}]}"#;

        let err = BracketConfigLoader::from_json_str(json).unwrap_err();

        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().contains("rate"));
    }

    #[test]
    fn test_json_missing_brackets_key_is_an_error() {
        let err = BracketConfigLoader::from_json_str(r#"{"rates": []}"#).unwrap_err();

        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_json_malformed_document_is_an_error() {
        let err = BracketConfigLoader::from_json_str(r#"{"brackets": [{"rate": 10,"#).unwrap_err();

        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_json_non_numeric_rate_is_an_error() {
        let json = r#"{"brackets": [{"rate": "ten"}]}"#;

        assert!(BracketConfigLoader::from_json_str(json).is_err());
    }

    #[test]
    fn test_json_empty_list_loads() {
        let brackets = BracketConfigLoader::from_json_str(r#"{"brackets": []}"#).unwrap();

        assert!(brackets.is_empty());
    }

    #[test]
    fn test_json_reader_matches_str() {
        let from_str = BracketConfigLoader::from_json_str(TWO_BRACKETS_JSON).unwrap();
        let from_reader = BracketConfigLoader::from_json_reader(TWO_BRACKETS_JSON.as_bytes()).unwrap();

        assert_eq!(from_str, from_reader);
    }

    // -----------------------------------------------------------------------
    // CSV
    // -----------------------------------------------------------------------

    #[test]
    fn test_csv_empty_up_to_is_open_ended() {
        let csv = "rate,up_to\n20,\n10,1000\n";

        let brackets = BracketConfigLoader::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(
            brackets.brackets(),
            &[TaxBracket::bounded(10.0, 1000.0), TaxBracket::open_ended(20.0)]
        );
    }

    #[test]
    fn test_csv_tolerates_whitespace_and_column_order() {
        let csv = "up_to , rate\n 1000 , 10 \n   , 20\n";

        let brackets = BracketConfigLoader::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(
            brackets.brackets(),
            &[TaxBracket::bounded(10.0, 1000.0), TaxBracket::open_ended(20.0)]
        );
    }

    #[test]
    fn test_csv_without_up_to_column() {
        let csv = "rate\n15\n";

        let brackets = BracketConfigLoader::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(brackets.brackets(), &[TaxBracket::open_ended(15.0)]);
    }

    #[test]
    fn test_csv_invalid_number_is_an_error() {
        let csv = "rate,up_to\n10,lots\n";

        let err = BracketConfigLoader::from_csv_reader(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, ConfigError::Csv(_)));
    }

    #[test]
    fn test_csv_missing_rate_column_is_an_error() {
        let csv = "up_to\n1000\n";

        let err = BracketConfigLoader::from_csv_reader(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, ConfigError::Csv(_)));
    }

    // -----------------------------------------------------------------------
    // Format selection and errors
    // -----------------------------------------------------------------------

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("brackets.csv")), ConfigFormat::Csv);
        assert_eq!(ConfigFormat::from_path(Path::new("BRACKETS.CSV")), ConfigFormat::Csv);
        assert_eq!(ConfigFormat::from_path(Path::new("config.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Json);
    }

    #[test]
    fn test_invalid_error_lists_every_issue() {
        let err = ConfigError::Invalid(vec![
            BracketIssue::Empty,
            BracketIssue::MultipleOpenEnded { count: 2 },
        ]);

        assert_eq!(
            err.to_string(),
            "invalid bracket configuration: no brackets defined; \
             2 brackets have no upper bound; only the last one is ever applied"
        );
    }
}
