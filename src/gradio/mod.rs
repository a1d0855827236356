mod client;
mod events;
mod types;

pub use client::{GradioClient, InferenceClient, build_payload};
pub use events::{EventStreamParser, ServerEvent};
pub use types::{AppConfig, CallResponse, Dependency, EditorValue, FileData, FileMeta, PredictionResult, SpaceHost};
