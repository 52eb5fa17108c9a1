// src/config.rs
use crate::error::{ConnectorError, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use url::Url;

/// Where FRED serves a single series as CSV.
pub const DEFAULT_CSV_BASE_URL: &str = "https://fred.stlouisfed.org/graph/fredgraph.csv";

/// Column the host treats as the timestamp unless told otherwise.
pub const DEFAULT_DATETIME_COLUMN: &str = "DATE";

/// Name the value column is published under.
pub const PRICE_COLUMN: &str = "PRICE";

/// The `fred` section of a pipe's parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    pub series_id: Option<String>,
}

impl SeriesConfig {
    pub fn new(series_id: impl Into<String>) -> Self {
        Self {
            series_id: Some(series_id.into()),
        }
    }

    /// The series id, if one is set and not blank.
    pub fn series_id(&self) -> Option<&str> {
        self.series_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// The `columns` section: which fetched column holds the timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub datetime: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            datetime: DEFAULT_DATETIME_COLUMN.to_string(),
        }
    }
}

/// Typed form of the host's parameter document:
///
/// ```yaml
/// fred:
///   series_id: GDP
/// columns:
///   datetime: DATE
/// ```
///
/// Missing sections fall back to their defaults and unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeParameters {
    pub fred: SeriesConfig,
    pub columns: ColumnMapping,
}

impl PipeParameters {
    pub fn for_series(series_id: impl Into<String>) -> Self {
        Self {
            fred: SeriesConfig::new(series_id),
            columns: ColumnMapping::default(),
        }
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_yaml_str(&read_to_string(path.as_ref())?)
    }

    /// Fill unset parts from `defaults` without touching anything already configured.
    pub fn merge_defaults(&mut self, defaults: &PipeParameters) {
        if self.fred.series_id.is_none() {
            self.fred.series_id = defaults.fred.series_id.clone();
        }
        if self.columns.datetime.trim().is_empty() {
            self.columns.datetime = defaults.columns.datetime.clone();
        }
    }
}

/// One managed series as the host sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipe {
    pub name: String,
    #[serde(default)]
    pub parameters: PipeParameters,
}

impl Pipe {
    pub fn new(name: impl Into<String>, parameters: PipeParameters) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

/// Construction-time settings for `FredConnector`. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorSettings {
    pub csv_base_url: Url,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            csv_base_url: Url::parse(DEFAULT_CSV_BASE_URL).expect("default FRED URL should parse"),
        }
    }
}

impl ConnectorSettings {
    pub fn with_csv_base_url(base: &str) -> Result<Self> {
        Ok(Self {
            csv_base_url: Url::parse(base)?,
        })
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn load_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_yaml_str(&read_to_string(path.as_ref())?)
    }
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| ConnectorError::Settings(format!("reading {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn blank_series_id_counts_as_unset() {
        assert_eq!(SeriesConfig::default().series_id(), None);
        assert_eq!(SeriesConfig::new("").series_id(), None);
        assert_eq!(SeriesConfig::new("   ").series_id(), None);
        assert_eq!(SeriesConfig::new(" GDP ").series_id(), Some("GDP"));
    }

    #[test]
    fn parameters_parse_host_shape() -> Result<()> {
        let json = r#"{"fred": {"series_id": "UNRATE"}, "columns": {"datetime": "DATE"}, "tags": ["x"]}"#;
        let params = PipeParameters::from_json_str(json)?;
        assert_eq!(params, PipeParameters::for_series("UNRATE"));

        let yaml = "fred:\n  series_id: null\n";
        let params = PipeParameters::from_yaml_str(yaml)?;
        assert_eq!(params.fred.series_id, None);
        assert_eq!(params.columns.datetime, "DATE");
        Ok(())
    }

    #[test]
    fn merge_keeps_existing_values() {
        let mut params = PipeParameters {
            fred: SeriesConfig::new("CPIAUCSL"),
            columns: ColumnMapping {
                datetime: "observation_date".into(),
            },
        };
        params.merge_defaults(&PipeParameters::default());
        assert_eq!(params.fred.series_id(), Some("CPIAUCSL"));
        assert_eq!(params.columns.datetime, "observation_date");

        let mut empty = PipeParameters {
            fred: SeriesConfig::default(),
            columns: ColumnMapping {
                datetime: String::new(),
            },
        };
        empty.merge_defaults(&PipeParameters::default());
        assert_eq!(empty, PipeParameters::default());
    }

    #[test]
    fn settings_load_from_yaml_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "csv_base_url: http://localhost:8080/fredgraph.csv")?;
        let settings = ConnectorSettings::load_yaml(tmp.path())?;
        assert_eq!(
            settings.csv_base_url.as_str(),
            "http://localhost:8080/fredgraph.csv"
        );

        assert_eq!(
            ConnectorSettings::from_yaml_str("{}")?,
            ConnectorSettings::default()
        );
        Ok(())
    }

    #[test]
    fn bad_base_url_is_a_settings_error() {
        let err = ConnectorSettings::with_csv_base_url("not a url").unwrap_err();
        assert!(matches!(err, ConnectorError::Settings(_)));
    }
}
