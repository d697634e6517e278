use crate::core::VideoItem;
use crate::error::RulesError;
use crate::utils::{dedup_keywords, find_keyword};
use serde::{Deserialize, Serialize};

/// Keyword sets and the category code that mark a video as music.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    pub music_category_id: String,
    pub channel_keywords: Vec<String>,
    pub title_keywords: Vec<String>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            music_category_id: "10".to_string(),
            channel_keywords: to_strings(&[
                "vevo",
                "official artist channel",
                "records",
                "music",
                "production",
                "audio",
                "label",
                "entertainment",
            ]),
            title_keywords: to_strings(&[
                "official music video",
                "official audio",
                "lyrics video",
                "ft.",
                "feat.",
                "remix",
                "prod.",
                "music by",
                "directed by",
            ]),
        }
    }
}

impl ClassifierRules {
    /// An empty keyword would match every video.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.music_category_id.trim().is_empty() {
            return Err(RulesError::EmptyCategory);
        }
        reject_empty("channel_keywords", &self.channel_keywords)?;
        reject_empty("title_keywords", &self.title_keywords)
    }
}

pub(crate) fn reject_empty(list: &'static str, entries: &[String]) -> Result<(), RulesError> {
    if entries.iter().any(|entry| entry.is_empty()) {
        return Err(RulesError::EmptyEntry { list });
    }
    Ok(())
}

fn to_strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Which rule accepted a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchReason {
    Category,
    ChannelKeyword(String),
    TitleKeyword(String),
}

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: ClassifierRules,
}

impl Classifier {
    /// Keywords are lower-cased and de-duplicated here so matching can stay a plain
    /// substring test.
    pub fn new(rules: ClassifierRules) -> Self {
        let normalise = |keywords: Vec<String>| {
            dedup_keywords(keywords.into_iter().map(|k| k.to_lowercase()).collect())
        };

        Self {
            rules: ClassifierRules {
                music_category_id: rules.music_category_id,
                channel_keywords: normalise(rules.channel_keywords),
                title_keywords: normalise(rules.title_keywords),
            },
        }
    }

    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }

    pub fn classify(&self, item: &VideoItem) -> bool {
        self.match_reason(item).is_some()
    }

    /// Category first, then channel name, then title. The description is
    /// not consulted.
    pub fn match_reason(&self, item: &VideoItem) -> Option<MatchReason> {
        if item.category_id.as_deref() == Some(self.rules.music_category_id.as_str()) {
            return Some(MatchReason::Category);
        }

        let channel = item.channel_title.to_lowercase();
        if let Some(keyword) = find_keyword(&channel, &self.rules.channel_keywords) {
            return Some(MatchReason::ChannelKeyword(keyword.to_string()));
        }

        let title = item.title.to_lowercase();
        if let Some(keyword) = find_keyword(&title, &self.rules.title_keywords) {
            return Some(MatchReason::TitleKeyword(keyword.to_string()));
        }

        None
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierRules::default())
    }
}
