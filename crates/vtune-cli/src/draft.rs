//! Editable metadata draft for step 3.

use vtune_models::VideoMetadata;

/// Title, description and tags being edited before commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataDraft {
    pub title: String,
    pub description: String,
    tags: Vec<String>,
}

impl MetadataDraft {
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Add a tag. Blank and already present tags are ignored.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty() && self.tags.is_empty()
    }

    pub fn to_metadata(&self) -> VideoMetadata {
        VideoMetadata::new(self.title.clone(), self.description.clone(), self.tags.clone())
    }
}

impl From<VideoMetadata> for MetadataDraft {
    fn from(metadata: VideoMetadata) -> Self {
        let mut draft = Self {
            title: metadata.title,
            description: metadata.description,
            tags: Vec::new(),
        };
        for tag in &metadata.tags {
            draft.add_tag(tag);
        }
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_tag_trims_and_skips_duplicates() {
        let mut draft = MetadataDraft::default();
        assert!(draft.add_tag(" surf "));
        assert!(!draft.add_tag("surf"));
        assert!(!draft.add_tag("   "));
        assert!(draft.add_tag("Surf"));
        assert_eq!(draft.tags(), ["surf", "Surf"]);
    }

    #[test]
    fn test_remove_tag() {
        let mut draft = MetadataDraft::from(VideoMetadata::new(
            "T",
            "D",
            vec!["a".into(), "b".into(), "a".into()],
        ));
        assert_eq!(draft.tags(), ["a", "b"]);
        assert!(draft.remove_tag("a"));
        assert!(!draft.remove_tag("zzz"));
        assert_eq!(draft.to_metadata().tags, vec!["b"]);
    }
}
