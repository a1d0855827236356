mod fetch;
mod service;
mod types;

pub use fetch::{HttpImageFetcher, ImageFetcher};
pub use service::RelayService;
pub use types::{CLOTHING_IMAGE_FIELD, IMAGE_PNG, PERSON_IMAGE_FIELD, ResponseImage, UploadRequest};
