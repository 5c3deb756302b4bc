//! Background audio catalogue.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// A royalty-free background track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudioTrack {
    pub id: String,
    pub display_name: String,
    pub artist: String,
    /// Location of the audio asset
    pub source_ref: String,
}

/// Catalogue entry as static data.
struct CatalogEntry {
    id: &'static str,
    display_name: &'static str,
    artist: &'static str,
    source_ref: &'static str,
}

/// The fixed set of selectable tracks.
pub const AUDIO_CATALOG: &[(&str, &str, &str, &str)] = &[
    ("track1", "Morning Routine", "Lofi Chillhop", "/audio/placeholder1.mp3"),
    ("track2", "Focus Flow", "Ambient Beats", "/audio/placeholder2.mp3"),
    ("track3", "Uplifting Journey", "Cinematic Pop", "/audio/placeholder3.mp3"),
    ("track4", "Sunset Vibes", "Acoustic Cafe", "/audio/placeholder4.mp3"),
    ("track5", "Tech Pulse", "Electronic Future", "/audio/placeholder5.mp3"),
];

fn entries() -> impl Iterator<Item = CatalogEntry> {
    AUDIO_CATALOG
        .iter()
        .map(|&(id, display_name, artist, source_ref)| CatalogEntry {
            id,
            display_name,
            artist,
            source_ref,
        })
}

impl From<CatalogEntry> for AudioTrack {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            display_name: entry.display_name.to_string(),
            artist: entry.artist.to_string(),
            source_ref: entry.source_ref.to_string(),
        }
    }
}

impl AudioTrack {
    /// All catalogue tracks in display order.
    pub fn catalog() -> Vec<AudioTrack> {
        entries().map(AudioTrack::from).collect()
    }

    /// Look up a catalogue track by id.
    pub fn find(id: &str) -> Option<AudioTrack> {
        entries().find(|e| e.id == id).map(AudioTrack::from)
    }

    /// Check that this selection is exactly one of the catalogue entries.
    pub fn validate(&self) -> ModelResult<()> {
        match AudioTrack::find(&self.id) {
            Some(known) if &known == self => Ok(()),
            _ => Err(ModelError::UnknownTrack(self.id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_five_tracks() {
        let tracks = AudioTrack::catalog();
        assert_eq!(tracks.len(), 5);
        assert_eq!(tracks[2].id, "track3");
        assert_eq!(tracks[2].display_name, "Uplifting Journey");
    }

    #[test]
    fn test_find_and_validate() {
        let track = AudioTrack::find("track3").unwrap();
        assert!(track.validate().is_ok());
        assert!(AudioTrack::find("track9").is_none());
    }

    #[test]
    fn test_validate_rejects_tampered_entry() {
        let mut track = AudioTrack::find("track1").unwrap();
        track.source_ref = "/elsewhere.mp3".into();
        assert_eq!(track.validate(), Err(ModelError::UnknownTrack("track1".into())));
    }
}
