use serde::Serialize;

/// One liked video, already normalised from the platform's loose JSON.
///
/// Text fields are never absent: the fetch boundary substitutes empty strings.
/// The identifier can live in two places depending on which API resource the
/// record came from, so both are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoItem {
    pub id: Option<String>,
    pub content_video_id: Option<String>,
    pub title: String,
    pub channel_title: String,
    pub category_id: Option<String>,
    pub description: String,
}

impl VideoItem {
    /// The identifier used for the watch link, `id` taking precedence.
    pub fn video_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.content_video_id.as_deref())
    }
}

/// A row of the exported table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongRecord {
    #[serde(rename = "Song Name")]
    pub song_name: String,
    #[serde(rename = "Artist")]
    pub artist: String,
    #[serde(rename = "URL")]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_prefers_top_level_id() {
        let item = VideoItem {
            id: Some("top".to_string()),
            content_video_id: Some("nested".to_string()),
            ..Default::default()
        };
        assert_eq!(item.video_id(), Some("top"));
    }

    #[test]
    fn test_video_id_falls_back_to_content_details() {
        let item = VideoItem {
            content_video_id: Some("nested".to_string()),
            ..Default::default()
        };
        assert_eq!(item.video_id(), Some("nested"));
        assert_eq!(VideoItem::default().video_id(), None);
    }
}
