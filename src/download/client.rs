use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://travellermap.com/data";

/// Poster styles and scales fetched when posters are requested
pub const POSTER_STYLES: &[&str] = &["poster", "atlas", "fasa"];
pub const POSTER_SCALES: &[u32] = &[64, 128];

const TIMEOUT: Duration = Duration::from_secs(30);
const RETRIES: u32 = 5;

/// Blocking client for the Traveller Map data API
pub struct TravellerMapClient {
    client: Client,
    base_url: Url,
}

impl TravellerMapClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("travellermap-ingest/", env!("CARGO_PKG_VERSION")))
            .timeout(TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid Traveller Map URL: {}", base_url))?;
        Ok(Self { client, base_url })
    }

    /// Raw JSON sector list for a tag (e.g. `OTU`)
    pub fn fetch_sector_list(&self, tag: &str) -> Result<String> {
        let url = self.base_url.clone();
        self.text(
            self.client
                .get(url)
                .query(&[("tag", tag), ("requireData", "1")]),
        )
        .context("Failed to fetch sector list")
    }

    /// Sector data in the default text format
    pub fn fetch_sector_text(&self, sector: &str, milieu: &str) -> Result<String> {
        let url = self.url(&["sec"])?;
        self.text(
            self.client
                .get(url)
                .query(&[("sector", sector), ("milieu", milieu)]),
        )
        .with_context(|| format!("Failed to fetch sector text for {}", sector))
    }

    /// Sector metadata document (JSON)
    pub fn fetch_metadata(&self, sector: &str, milieu: &str) -> Result<String> {
        let url = self.url(&[sector, "metadata"])?;
        self.text(
            self.client
                .get(url)
                .query(&[("milieu", milieu), ("accept", "application/json")]),
        )
        .with_context(|| format!("Failed to fetch metadata for {}", sector))
    }

    /// Worlds in T5 tab-delimited format; empty when the sector has no data
    pub fn fetch_tab_delimited(&self, sector: &str, milieu: &str) -> Result<String> {
        let url = self.url(&["sec"])?;
        self.text(self.client.get(url).query(&[
            ("sector", sector),
            ("milieu", milieu),
            ("type", "TabDelimited"),
        ]))
        .with_context(|| format!("Failed to fetch tab-delimited data for {}", sector))
    }

    /// Poster PDF for one style and scale
    pub fn fetch_poster(&self, sector: &str, milieu: &str, style: &str, scale: u32) -> Result<Vec<u8>> {
        let url = self.url(&[sector, "image"])?;
        let scale = scale.to_string();
        let response = self.send(self.client.get(url).query(&[
            ("milieu", milieu),
            ("accept", "application/pdf"),
            ("style", style),
            ("options", "9211"),
            ("scale", scale.as_str()),
        ]))?;
        let bytes = response
            .bytes()
            .with_context(|| format!("Failed to read {} poster for {}", style, sector))?;
        Ok(bytes.to_vec())
    }

    /// Base URL with extra path segments appended (each one percent-encoded)
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Base URL cannot have path segments: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn text(&self, request: RequestBuilder) -> Result<String> {
        let response = self.send(request)?;
        response.text().context("Failed to read response")
    }

    /// Send with a fixed number of retries on transport errors. HTTP error
    /// statuses are not retried.
    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let mut attempt = 0;
        loop {
            let this_try = request
                .try_clone()
                .context("Request body cannot be retried")?;
            match this_try.send() {
                Ok(response) => {
                    debug!(url = %response.url(), status = %response.status(), "response");
                    return response.error_for_status().context("Request failed");
                }
                Err(e) if attempt < RETRIES && (e.is_connect() || e.is_timeout()) => {
                    attempt += 1;
                    warn!(attempt, error = %e, "retrying request");
                }
                Err(e) => return Err(e).context("Request failed"),
            }
        }
    }
}
