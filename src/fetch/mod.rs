// src/fetch/mod.rs
use crate::error::FetchError;
use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

/// Anything that can hand back the CSV body living at a URL.
#[cfg_attr(test, mockall::automock)]
pub trait CsvSource {
    fn get_csv(&self, url: &Url) -> Result<String, FetchError>;
}

/// Blocking GET; any non-2xx status is an error. No retries.
impl CsvSource for Client {
    fn get_csv(&self, url: &Url) -> Result<String, FetchError> {
        debug!(%url, "GET");
        let resp = self
            .get(url.clone())
            .send()
            .map_err(FetchError::Request)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        resp.text().map_err(FetchError::Body)
    }
}

/// `<base>?id=<series_id>`, keeping whatever query the base already carries.
pub fn series_url(base: &Url, series_id: &str) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().append_pair("id", series_id);
    url
}
