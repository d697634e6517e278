use crate::core::VideoItem;

fn sample(id: &str, title: &str, channel: &str, category: &str, description: &str) -> VideoItem {
    VideoItem {
        id: Some(id.to_string()),
        content_video_id: None,
        title: title.to_string(),
        channel_title: channel.to_string(),
        category_id: Some(category.to_string()),
        description: description.to_string(),
    }
}

/// A music-category video, a cat compilation, and a music video outside the
/// music category.
pub fn sample_items() -> Vec<VideoItem> {
    vec![
        sample(
            "video1",
            "Artist - Song Name (Official Video)",
            "ArtistVEVO",
            "10",
            "Check out this new music video.",
        ),
        sample(
            "video2",
            "Funny Cat Compilation 2024",
            "CatLovers",
            "15",
            "Meow.",
        ),
        sample(
            "video3",
            "New Song feat. Someone",
            "MusicLabel",
            "24",
            "Official Audio",
        ),
    ]
}
