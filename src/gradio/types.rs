use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of the Hugging Face `/api/spaces/{id}/host` lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct SpaceHost {
    pub host: String,
}

/// The subset of a Gradio app's `/config` document the client needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub api_prefix: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// One event handler of the app. `api_name` is `false` or absent when hidden.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dependency {
    #[serde(default)]
    pub api_name: Option<Value>,
}

impl AppConfig {
    /// Fails unless `endpoint` can be called through `/call/{endpoint}`.
    pub fn ensure_endpoint(&self, endpoint: &str) -> Result<()> {
        // Gradio 3 apps only speak the websocket queue.
        if self.protocol.as_deref() == Some("ws") {
            return Err(Error::upstream(
                "Gradio app only supports the websocket protocol",
            ));
        }

        let exposed = self.dependencies.iter().any(|dependency| {
            dependency
                .api_name
                .as_ref()
                .and_then(Value::as_str)
                .map(|name| name.trim_start_matches('/'))
                == Some(endpoint)
        });

        if !exposed {
            return Err(Error::upstream(format!(
                "Gradio app does not expose endpoint /{}",
                endpoint
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    #[serde(rename = "_type")]
    pub file_type: String,
}

impl Default for FileMeta {
    fn default() -> Self {
        Self {
            file_type: "gradio.FileData".to_string(),
        }
    }
}

/// Gradio's descriptor for a file held by the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileData {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(default)]
    pub meta: FileMeta,
}

impl FileData {
    pub fn uploaded(path: String, orig_name: &str, size: usize) -> Self {
        Self {
            path,
            url: None,
            orig_name: Some(orig_name.to_string()),
            size: Some(size),
            meta: FileMeta::default(),
        }
    }
}

/// Value of an image-editor input: a background plus drawable layers.
#[derive(Debug, Clone, Serialize)]
pub struct EditorValue {
    pub background: FileData,
    pub layers: Vec<FileData>,
    pub composite: Option<FileData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallResponse {
    pub event_id: String,
}

/// Output of a completed prediction, as sent in the `complete` event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResult {
    pub data: Vec<Value>,
}

impl PredictionResult {
    /// URL of the first output file.
    pub fn output_url(&self) -> Result<String> {
        let first = self
            .data
            .first()
            .ok_or_else(|| Error::malformed("prediction returned no outputs"))?;

        let output = first
            .as_object()
            .ok_or_else(|| Error::malformed("first prediction output is not a file"))?;

        match output.get("url").and_then(Value::as_str) {
            Some(url) if !url.is_empty() => Ok(url.to_string()),
            _ => Err(Error::malformed("first prediction output has no url")),
        }
    }
}
