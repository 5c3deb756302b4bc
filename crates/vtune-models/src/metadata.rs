//! Video metadata: title, description and tags.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Publishable metadata for a video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    /// Ordered, duplicate-free, non-empty tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl VideoMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tags,
        }
    }

    /// True if any field carries content.
    pub fn has_content(&self) -> bool {
        !self.title.is_empty() || !self.description.is_empty() || !self.tags.is_empty()
    }

    /// Validate and normalize for commit.
    ///
    /// Tags are trimmed, empty tags dropped and exact duplicates removed
    /// (first occurrence wins). Title, description and the resulting tag list
    /// must be non-empty.
    pub fn normalized(self) -> ModelResult<Self> {
        if self.title.trim().is_empty() {
            return Err(ModelError::invalid_metadata("title must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(ModelError::invalid_metadata("description must not be empty"));
        }

        let tags = normalize_tags(self.tags);
        if tags.is_empty() {
            return Err(ModelError::invalid_metadata("at least one tag is required"));
        }

        Ok(Self {
            title: self.title,
            description: self.description,
            tags,
        })
    }

    /// Check the stored-tag invariants without modifying anything.
    pub fn validate(&self) -> ModelResult<()> {
        let normalized = self.clone().normalized()?;
        if normalized.tags != self.tags {
            return Err(ModelError::invalid_metadata(
                "tags must be trimmed, non-empty and unique",
            ));
        }
        Ok(())
    }
}

/// Trim tags, drop empty ones and remove exact duplicates, keeping order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}
