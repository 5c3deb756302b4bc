//! Video handles and their serializable descriptors.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Serializable shadow of a [`VideoHandle`].
///
/// Survives a snapshot/rehydration round trip; the handle itself does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoDescriptor {
    /// Original file name
    pub name: String,
    /// MIME type reported for the file (e.g. "video/mp4")
    pub mime_type: String,
    /// File size in bytes
    pub size_bytes: u64,
}

impl VideoDescriptor {
    /// Check whether the descriptor classifies the file as video content.
    pub fn is_video(&self) -> bool {
        is_video_mime(&self.mime_type)
    }
}

/// In-memory reference to the selected video content.
///
/// Owned by the current session only. It deliberately implements neither
/// `Serialize` nor `Deserialize`: it cannot be reconstructed from a
/// [`VideoDescriptor`] and has to be re-selected after a redirect.
pub struct VideoHandle {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl VideoHandle {
    /// Create a handle over already-loaded bytes.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Check whether the handle holds video content (MIME type `video/*`).
    pub fn is_video(&self) -> bool {
        is_video_mime(&self.mime_type)
    }

    /// Derive the serializable descriptor for this handle.
    pub fn descriptor(&self) -> VideoDescriptor {
        VideoDescriptor {
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            size_bytes: self.size_bytes(),
        }
    }

    /// Encode the content as `data:<mime>;base64,<data>`.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

impl fmt::Debug for VideoHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoHandle")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// Check whether a MIME type denotes video content.
pub fn is_video_mime(mime_type: &str) -> bool {
    mime_type.trim().to_ascii_lowercase().starts_with("video/")
}

/// Split a base64 data URI into its MIME type and encoded payload.
pub fn parse_data_uri(uri: &str) -> ModelResult<(&str, &str)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ModelError::invalid_data_uri("missing data: prefix"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ModelError::invalid_data_uri("missing payload separator"))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| ModelError::invalid_data_uri("payload is not base64"))?;
    if mime_type.is_empty() {
        return Err(ModelError::invalid_data_uri("missing MIME type"));
    }
    Ok((mime_type, payload))
}

/// Guess a MIME type from a file extension.
///
/// Unknown extensions map to `application/octet-stream`, which is not video.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mpeg" | "mpg" => "video/mpeg",
        "3gp" => "video/3gpp",
        "ogv" => "video/ogg",
        _ => "application/octet-stream",
    }
}
