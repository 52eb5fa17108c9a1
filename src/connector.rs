// src/connector.rs
use crate::{
    config::{ConnectorSettings, Pipe, PipeParameters},
    error::{ConnectorError, FetchError, Result},
    fetch::{series_url, CsvSource},
    process::{parse_csv_table, publish_value_column},
};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, trace, warn};

/// Extra host options. Accepted and ignored.
pub type ExtraOptions = BTreeMap<String, serde_json::Value>;

/// What a host needs from a data-source plugin.
pub trait Connector {
    /// Default parameters for a freshly registered pipe.
    fn describe_defaults(&self) -> PipeParameters;

    /// Fetch rows for `pipe`, optionally bounded by `begin`/`end`.
    fn fetch(
        &self,
        pipe: &Pipe,
        begin: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        extra: &ExtraOptions,
    ) -> Result<RecordBatch>;
}

/// Pulls one FRED series as CSV and republishes its value column as `PRICE`.
#[derive(Debug, Clone)]
pub struct FredConnector<S = Client> {
    settings: ConnectorSettings,
    source: S,
}

impl FredConnector<Client> {
    pub fn new(settings: ConnectorSettings) -> Self {
        Self::with_source(settings, Client::new())
    }
}

impl Default for FredConnector<Client> {
    fn default() -> Self {
        Self::new(ConnectorSettings::default())
    }
}

impl<S: CsvSource> FredConnector<S> {
    /// Use a caller-built source, e.g. a `reqwest::blocking::Client` with timeouts.
    pub fn with_source(settings: ConnectorSettings, source: S) -> Self {
        Self { settings, source }
    }

    pub fn settings(&self) -> &ConnectorSettings {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Series id unset, datetime column `DATE`.
    pub fn describe_defaults() -> PipeParameters {
        PipeParameters::default()
    }

    /// Download the whole history of the pipe's series.
    ///
    /// `begin`/`end` are not applied: the full series is always fetched and
    /// the host filters by its own sync time. If the CSV has no column named
    /// after the series the table comes back untouched.
    #[instrument(level = "info", skip(self, pipe, extra), fields(pipe = %pipe.name))]
    pub fn fetch_series(
        &self,
        pipe: &Pipe,
        begin: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        extra: &ExtraOptions,
    ) -> Result<RecordBatch> {
        let series_id = pipe
            .parameters
            .fred
            .series_id()
            .ok_or_else(|| ConnectorError::Configuration {
                pipe: pipe.name.clone(),
            })?;

        if begin.is_some() || end.is_some() {
            debug!(?begin, ?end, "time bounds ignored; fetching full history");
        }
        if !extra.is_empty() {
            trace!(keys = ?extra.keys().collect::<Vec<_>>(), "ignoring extra options");
        }

        let url = series_url(&self.settings.csv_base_url, series_id);
        info!(series_id, %url, "fetching series");

        let fetch_err = |source: FetchError| ConnectorError::Fetch {
            url: url.clone(),
            source,
        };

        let body = self.source.get_csv(&url).map_err(fetch_err)?;
        let table = parse_csv_table(&body).map_err(fetch_err)?;

        let out = match publish_value_column(&table, series_id)
            .map_err(|e| fetch_err(FetchError::from(e)))?
        {
            Some(batch) => batch,
            None => {
                warn!(
                    series_id,
                    "value column not found in response; returning table unchanged"
                );
                table
            }
        };

        info!(series_id, rows = out.num_rows(), "fetched series");
        Ok(out)
    }
}

impl<S: CsvSource> Connector for FredConnector<S> {
    fn describe_defaults(&self) -> PipeParameters {
        Self::describe_defaults()
    }

    fn fetch(
        &self,
        pipe: &Pipe,
        begin: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        extra: &ExtraOptions,
    ) -> Result<RecordBatch> {
        self.fetch_series(pipe, begin, end, extra)
    }
}
