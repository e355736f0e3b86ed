//! API models for the image upload side-channel.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Upload result envelope. `file_path` is the absolute URL the client later
/// stores into image/receipt fields of resource records.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub file_path: Option<String>,
}
