//! HTTP downloads for the Docker signing key and the YAMS installer.

use anyhow::{Context, Result};
use std::time::Duration;

pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("yams-bootstrap/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("create HTTP client")?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("GET {}", url))?
            .error_for_status()
            .with_context(|| format!("GET {}", url))?;
        let bytes = response
            .bytes()
            .with_context(|| format!("read body of {}", url))?;
        Ok(bytes.to_vec())
    }
}
