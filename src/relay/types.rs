use crate::{Error, Result};
use bytes::Bytes;

pub const PERSON_IMAGE_FIELD: &str = "person_image";
pub const CLOTHING_IMAGE_FIELD: &str = "clothing_image";
pub const IMAGE_PNG: &str = "image/png";

const MISSING_IMAGES: &str = "Both person_image and clothing_image are required";

/// The two images of one try-on request. Both are present and non-empty.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub person_image: Bytes,
    pub clothing_image: Bytes,
}

impl UploadRequest {
    pub fn new(person_image: Option<Bytes>, clothing_image: Option<Bytes>) -> Result<Self> {
        match (person_image, clothing_image) {
            (Some(person_image), Some(clothing_image))
                if !person_image.is_empty() && !clothing_image.is_empty() =>
            {
                Ok(Self {
                    person_image,
                    clothing_image,
                })
            }
            _ => Err(Error::validation(MISSING_IMAGES)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResponseImage {
    pub bytes: Bytes,
    pub content_type: &'static str,
}

impl ResponseImage {
    pub fn png(bytes: Bytes) -> Self {
        Self {
            bytes,
            content_type: IMAGE_PNG,
        }
    }
}
