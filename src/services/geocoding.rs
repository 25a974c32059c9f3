use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};

#[async_trait]
pub trait AddressVerifier: Send + Sync {
    /// Whether `address` resolves to at least one known place.
    async fn verify(&self, address: &str) -> anyhow::Result<bool>;
}

/// Accepts any non-blank address. Used when no geocoder is configured.
pub struct AcceptAnyAddress;

#[async_trait]
impl AddressVerifier for AcceptAnyAddress {
    async fn verify(&self, address: &str) -> anyhow::Result<bool> {
        Ok(!address.trim().is_empty())
    }
}

/// Nominatim-compatible search endpoint (`/search?q=..&format=json`).
pub struct NominatimGeocoder {
    url: String,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(url: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AddressVerifier for NominatimGeocoder {
    async fn verify(&self, address: &str) -> anyhow::Result<bool> {
        let resp = self
            .client
            .get(format!("{}/search", self.url))
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, concat!("housecall-booking/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .context("failed to call geocoder")?
            .error_for_status()
            .context("geocoder returned error")?;

        let places: Vec<serde_json::Value> = resp
            .json()
            .await
            .context("failed to parse geocoder response")?;

        Ok(!places.is_empty())
    }
}
