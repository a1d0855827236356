use super::events::{EventStreamParser, ServerEvent};
use super::types::*;
use crate::{Error, Result, config::PredictionParameters, config::UpstreamConfig};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

const PERSON_FILE_NAME: &str = "person.png";
const GARMENT_FILE_NAME: &str = "garment.png";

/// Submits try-on jobs to the hosted model.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn predict(
        &self,
        person_image: Bytes,
        garment_image: Bytes,
        params: &PredictionParameters,
    ) -> Result<PredictionResult>;
}

/// Client for a Gradio app's HTTP API.
#[derive(Debug, Clone)]
pub struct GradioClient {
    http: reqwest::Client,
    root: String,
    api_prefix: String,
    endpoint: String,
}

impl GradioClient {
    /// Locates the app and reads its config. Fails if the app is unreachable.
    pub async fn connect(config: &UpstreamConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        let root = match &config.base_url {
            Some(base_url) => base_url.trim_end_matches('/').to_string(),
            None => resolve_space_host(&http, &config.hub_url, &config.space).await?,
        };

        debug!("Fetching Gradio config from {}", root);
        let app_config = fetch_app_config(&http, &root).await?;
        let endpoint = config.endpoint.trim_start_matches('/').to_string();
        app_config.ensure_endpoint(&endpoint)?;
        let api_prefix = app_config
            .api_prefix
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();

        info!(
            "Connected to Gradio app at {} (version: {}, api prefix: '{}')",
            root,
            app_config.version.as_deref().unwrap_or("unknown"),
            api_prefix
        );

        Ok(Self {
            http,
            root,
            api_prefix,
            endpoint,
        })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.root, self.api_prefix, path)
    }

    /// Uploads files in one request and returns their server-side paths in order.
    async fn upload(&self, files: Vec<(&'static str, Bytes)>) -> Result<Vec<FileData>> {
        let mut form = Form::new();
        for (name, bytes) in &files {
            form = form.part("files", Part::bytes(bytes.to_vec()).file_name(*name));
        }

        let response = self
            .http
            .post(self.api_url("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("Failed to upload inputs: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::upstream(format!(
                "Upload rejected with HTTP {}",
                response.status()
            )));
        }

        let paths: Vec<String> = response
            .json()
            .await
            .map_err(|e| Error::malformed(format!("Invalid upload response: {}", e)))?;

        if paths.len() != files.len() {
            return Err(Error::malformed(format!(
                "Upload returned {} paths for {} files",
                paths.len(),
                files.len()
            )));
        }

        Ok(paths
            .into_iter()
            .zip(files)
            .map(|(path, (name, bytes))| FileData::uploaded(path, name, bytes.len()))
            .collect())
    }

    async fn submit(&self, payload: &Value) -> Result<String> {
        let response = self
            .http
            .post(self.api_url(&format!("/call/{}", self.endpoint)))
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("Failed to submit prediction: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(format!(
                "Prediction rejected with HTTP {}: {}",
                status, body
            )));
        }

        let call: CallResponse = response
            .json()
            .await
            .map_err(|e| Error::malformed(format!("Invalid submit response: {}", e)))?;
        Ok(call.event_id)
    }

    async fn await_result(&self, event_id: &str) -> Result<PredictionResult> {
        let url = self.api_url(&format!("/call/{}/{}", self.endpoint, event_id));
        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("Failed to open result stream: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::upstream(format!(
                "Result stream rejected with HTTP {}",
                response.status()
            )));
        }

        let mut parser = EventStreamParser::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::upstream(format!("Result stream interrupted: {}", e)))?
        {
            for event in parser.push(&chunk) {
                if let Some(result) = interpret_event(event)? {
                    return Ok(result);
                }
            }
        }

        if let Some(event) = parser.finish() {
            if let Some(result) = interpret_event(event)? {
                return Ok(result);
            }
        }

        Err(Error::malformed(
            "result stream ended before the prediction completed",
        ))
    }
}

#[async_trait]
impl InferenceClient for GradioClient {
    async fn predict(
        &self,
        person_image: Bytes,
        garment_image: Bytes,
        params: &PredictionParameters,
    ) -> Result<PredictionResult> {
        let mut uploaded = self
            .upload(vec![
                (PERSON_FILE_NAME, person_image),
                (GARMENT_FILE_NAME, garment_image),
            ])
            .await?
            .into_iter();

        let (Some(person), Some(garment)) = (uploaded.next(), uploaded.next()) else {
            return Err(Error::internal("upload returned fewer files than sent"));
        };

        let payload = build_payload(person, garment, params);
        let event_id = self.submit(&payload).await?;
        debug!("Prediction submitted with event id {}", event_id);

        self.await_result(&event_id).await
    }
}

/// Positional inputs of the try-on endpoint.
pub fn build_payload(person: FileData, garment: FileData, params: &PredictionParameters) -> Value {
    let editor = EditorValue {
        background: person,
        layers: Vec::new(),
        composite: None,
    };

    json!({
        "data": [
            editor,
            garment,
            params.garment_description,
            params.apply_mask,
            params.apply_crop,
            params.denoise_steps,
            params.seed,
        ]
    })
}

fn interpret_event(event: ServerEvent) -> Result<Option<PredictionResult>> {
    match event.event.as_str() {
        "complete" => {
            let data: Vec<Value> = serde_json::from_str(&event.data).map_err(|e| {
                Error::malformed(format!("Invalid prediction output: {}", e))
            })?;
            Ok(Some(PredictionResult { data }))
        }
        "error" => Err(Error::upstream(error_message(&event.data))),
        other => {
            debug!("Ignoring '{}' event", other);
            Ok(None)
        }
    }
}

fn error_message(data: &str) -> String {
    let trimmed = data.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return "prediction failed".to_string();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(message)) => message,
        _ => data.to_string(),
    }
}

async fn resolve_space_host(http: &reqwest::Client, hub_url: &str, space: &str) -> Result<String> {
    let url = format!("{}/api/spaces/{}/host", hub_url.trim_end_matches('/'), space);
    debug!("Resolving Space host for {}", space);

    let response = http
        .get(&url)
        .send()
        .await
        .map_err(|e| Error::upstream(format!("Failed to resolve Space {}: {}", space, e)))?;

    if !response.status().is_success() {
        return Err(Error::upstream(format!(
            "Space {} could not be resolved: HTTP {}",
            space,
            response.status()
        )));
    }

    let host: SpaceHost = response
        .json()
        .await
        .map_err(|e| Error::malformed(format!("Invalid Space host response: {}", e)))?;
    Ok(host.host.trim_end_matches('/').to_string())
}

async fn fetch_app_config(http: &reqwest::Client, root: &str) -> Result<AppConfig> {
    let response = http
        .get(format!("{}/config", root))
        .send()
        .await
        .map_err(|e| Error::upstream(format!("Failed to reach Gradio app: {}", e)))?;

    if !response.status().is_success() {
        return Err(Error::upstream(format!(
            "Gradio config request failed with HTTP {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| Error::malformed(format!("Invalid Gradio config: {}", e)))
}
