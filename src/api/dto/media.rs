//! Media upload DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::storage::MediaCategory;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Which container/folder receives the file
    pub category: MediaCategory,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Public URL of the stored object
    #[schema(example = "http://localhost:8080/media/avatar/0b7e9f0c-8a9b-4a36-9a0c-2f1d5f2e4c11.png")]
    pub url: String,
}

/// Multipart form accepted by the upload endpoint (documentation only).
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
