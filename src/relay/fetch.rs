use crate::{Error, Result, config::UpstreamConfig};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tracing::debug;

/// Downloads the generated image from wherever the model left it.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.fetch_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        debug!("Fetching generated image");

        // Errors carry the status or cause only; the result URL stays internal.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(Error::fetch(format!("HTTP {}", response.status())));
        }

        response
            .bytes()
            .await
            .map_err(|e| Error::fetch(e.without_url().to_string()))
    }
}
