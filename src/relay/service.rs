use super::fetch::ImageFetcher;
use super::types::{ResponseImage, UploadRequest};
use crate::{Result, config::PredictionParameters, gradio::InferenceClient};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs one try-on: predict with the model, then download its output.
pub struct RelayService {
    inference: Arc<dyn InferenceClient>,
    fetcher: Arc<dyn ImageFetcher>,
    params: PredictionParameters,
}

impl RelayService {
    pub fn new(
        inference: Arc<dyn InferenceClient>,
        fetcher: Arc<dyn ImageFetcher>,
        params: PredictionParameters,
    ) -> Self {
        Self {
            inference,
            fetcher,
            params,
        }
    }

    pub async fn virtual_try_on(&self, upload: UploadRequest) -> Result<ResponseImage> {
        info!(
            person_bytes = upload.person_image.len(),
            clothing_bytes = upload.clothing_image.len(),
            "Processing virtual try-on"
        );

        let result = self
            .inference
            .predict(upload.person_image, upload.clothing_image, &self.params)
            .await?;
        debug!(outputs = result.data.len(), "Prediction completed");

        let output_url = result.output_url()?;
        let bytes = self.fetcher.fetch(&output_url).await?;

        info!(image_bytes = bytes.len(), "Try-on image ready");
        Ok(ResponseImage::png(bytes))
    }
}
