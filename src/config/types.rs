use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub prediction: PredictionParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    /// Upper bound for the whole multipart body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Where the Gradio app lives and how to talk to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Hugging Face Space id, used when `base_url` is not set.
    #[serde(default = "default_space")]
    pub space: String,
    /// Direct root URL of the Gradio app. Skips Space host resolution.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_hub_url")]
    pub hub_url: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout for inference calls. `None` waits forever.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Timeout for downloading the generated image. `None` waits forever.
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
}

/// Fixed parameters sent with every try-on prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionParameters {
    #[serde(default = "default_garment_description")]
    pub garment_description: String,
    #[serde(default = "default_true")]
    pub apply_mask: bool,
    #[serde(default)]
    pub apply_crop: bool,
    #[serde(default = "default_denoise_steps")]
    pub denoise_steps: u32,
    #[serde(default = "default_seed")]
    pub seed: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            space: default_space(),
            base_url: None,
            hub_url: default_hub_url(),
            endpoint: default_endpoint(),
            request_timeout_secs: None,
            fetch_timeout_secs: None,
        }
    }
}

impl Default for PredictionParameters {
    fn default() -> Self {
        Self {
            garment_description: default_garment_description(),
            apply_mask: true,
            apply_crop: false,
            denoise_steps: default_denoise_steps(),
            seed: default_seed(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_space() -> String {
    "yisol/IDM-VTON".to_string()
}

fn default_hub_url() -> String {
    "https://huggingface.co".to_string()
}

fn default_endpoint() -> String {
    "/tryon".to_string()
}

fn default_garment_description() -> String {
    "A beautiful garment".to_string()
}

fn default_true() -> bool {
    true
}

fn default_denoise_steps() -> u32 {
    30
}

fn default_seed() -> i64 {
    42
}
