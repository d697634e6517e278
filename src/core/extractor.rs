use crate::core::{SongRecord, VideoItem};
use crate::core::classifier::reject_empty;
use crate::error::{ExtractError, RulesError};
use crate::utils::remove_marker;
use serde::{Deserialize, Serialize};

/// Title separators, suffix markers and link base used to build a song record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorRules {
    /// Tried in order; the first one present in the title is used.
    pub separators: Vec<String>,
    /// Stripped from the song name in order, exact and lower-cased.
    pub suffixes: Vec<String>,
    pub watch_url_base: String,
}

impl Default for ExtractorRules {
    fn default() -> Self {
        Self {
            separators: [" - ", " – ", " | ", " : ", ": "]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            suffixes: [
                "(Official Video)",
                "(Official Audio)",
                "[Official Video]",
                "[Official Audio]",
                "(Lyric Video)",
                "(HD)",
                "(4K)",
                "(Live)",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            watch_url_base: "https://www.youtube.com/watch?v=".to_string(),
        }
    }
}

impl ExtractorRules {
    /// An empty separator would split every title before its first character.
    pub fn validate(&self) -> Result<(), RulesError> {
        reject_empty("separators", &self.separators)?;
        reject_empty("suffixes", &self.suffixes)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SongExtractor {
    rules: ExtractorRules,
}

impl SongExtractor {
    pub fn new(rules: ExtractorRules) -> Self {
        Self { rules }
    }

    /// Builds the record for a video the classifier accepted.
    ///
    /// Titles are assumed to read "Artist - Song"; the reverse order is not detected.
    pub fn extract(&self, item: &VideoItem) -> Result<SongRecord, ExtractError> {
        let video_id = item.video_id().ok_or_else(|| ExtractError::MissingVideoId {
            title: item.title.clone(),
        })?;

        let (artist, song) = self.split_artist_song(&item.title, &item.channel_title);

        Ok(SongRecord {
            song_name: self.strip_suffixes(&song),
            artist,
            url: self.watch_url(video_id),
        })
    }

    /// Returns `(artist, song)`. Without a separator the channel stands in for the
    /// artist and the whole title is the song.
    pub fn split_artist_song(&self, title: &str, channel: &str) -> (String, String) {
        for separator in &self.rules.separators {
            if let Some((artist, song)) = title.split_once(separator.as_str()) {
                return (artist.trim().to_string(), song.trim().to_string());
            }
        }

        (channel.to_string(), title.to_string())
    }

    pub fn strip_suffixes(&self, song: &str) -> String {
        self.rules
            .suffixes
            .iter()
            .fold(song.to_string(), |name, marker| remove_marker(&name, marker))
    }

    pub fn watch_url(&self, video_id: &str) -> String {
        format!("{}{}", self.rules.watch_url_base, video_id)
    }
}
