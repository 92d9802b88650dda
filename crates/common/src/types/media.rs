use serde::{Deserialize, Serialize};

/// A file selected for upload. `data` is the base64 encoded content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub name: String,
    pub mime_type: String,
    pub data: String,
}

/// One entry per uploaded file, in submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedMedia {
    pub url: String,
    pub name: String,
    pub size: u64,
}
