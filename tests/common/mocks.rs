use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tryon_relay::{
    Error, Result,
    config::PredictionParameters,
    gradio::{InferenceClient, PredictionResult},
    relay::ImageFetcher,
};

/// One call seen by [`MockInferenceClient`].
#[derive(Debug, Clone)]
pub struct RecordedPrediction {
    pub person_image: Bytes,
    pub garment_image: Bytes,
    pub params: PredictionParameters,
}

/// Mock inference client for testing
#[derive(Debug)]
pub struct MockInferenceClient {
    pub result: Option<PredictionResult>,
    pub calls: Arc<Mutex<Vec<RecordedPrediction>>>,
    pub error: Option<String>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self {
            result: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn returning_url(url: &str) -> Self {
        Self::new().with_result(PredictionResult {
            data: vec![json!({"path": "/tmp/gradio/out.png", "url": url})],
        })
    }

    pub fn with_result(mut self, result: PredictionResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn get_calls(&self) -> Vec<RecordedPrediction> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockInferenceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn predict(
        &self,
        person_image: Bytes,
        garment_image: Bytes,
        params: &PredictionParameters,
    ) -> Result<PredictionResult> {
        self.calls.lock().unwrap().push(RecordedPrediction {
            person_image,
            garment_image,
            params: params.clone(),
        });

        if let Some(ref error) = self.error {
            return Err(Error::upstream(error.clone()));
        }

        self.result
            .clone()
            .ok_or_else(|| Error::upstream("No mock prediction configured"))
    }
}

/// Serves fixed bytes per URL; anything else answers like a 404.
#[derive(Debug, Default)]
pub struct StaticImageFetcher {
    pub images: HashMap<String, Bytes>,
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl StaticImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, url: &str, bytes: &'static [u8]) -> Self {
        self.images.insert(url.to_string(), Bytes::from_static(bytes));
        self
    }

    pub fn get_requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageFetcher for StaticImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        self.requested.lock().unwrap().push(url.to_string());

        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| Error::fetch("HTTP 404 Not Found"))
    }
}
