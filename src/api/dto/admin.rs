//! Runtime administration DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct LogLevelRequest {
    /// A level (`debug`) or an `EnvFilter` directive list
    #[validate(length(min = 1, max = 512, message = "Level cannot be empty"))]
    #[schema(example = "info,astro_rs=debug")]
    pub level: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogLevelResponse {
    pub level: String,
}
