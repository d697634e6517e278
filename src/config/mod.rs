use crate::core::{ClassifierRules, ExtractorRules};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_file: PathBuf,
    pub client_secrets: PathBuf,
    pub token_file: PathBuf,
    pub page_size: u32,
    pub api_base: String,
    pub classifier: ClassifierRules,
    pub extractor: ExtractorRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("liked_music.csv"),
            client_secrets: PathBuf::from("client_secrets.json"),
            token_file: PathBuf::from("token.json"),
            page_size: 50,
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            classifier: ClassifierRules::default(),
            extractor: ExtractorRules::default(),
        }
    }
}

impl Config {
    /// Defaults when no file is given, otherwise the TOML file layered over them.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Parses and validates; empty rule entries are rejected.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.classifier.validate()?;
        config.extractor.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() -> anyhow::Result<()> {
        assert_eq!(Config::from_toml("")?, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_rules_keep_defaults() -> anyhow::Result<()> {
        let config = Config::from_toml(
            r#"
            output_file = "out.csv"

            [classifier]
            channel_keywords = ["musik"]
            "#,
        )?;

        assert_eq!(config.output_file, PathBuf::from("out.csv"));
        assert_eq!(config.classifier.channel_keywords, vec!["musik".to_string()]);
        assert_eq!(config.classifier.music_category_id, "10");
        assert_eq!(config.extractor, ExtractorRules::default());
        assert_eq!(config.page_size, 50);
        Ok(())
    }

    #[test]
    fn test_empty_rule_entries_are_rejected() {
        let empty_keyword = Config::from_toml(
            r#"
            [classifier]
            channel_keywords = ["vevo", ""]
            "#,
        );
        assert!(empty_keyword.is_err());

        let empty_separator = Config::from_toml(
            r#"
            [extractor]
            separators = [""]
            "#,
        );
        let message = empty_separator.unwrap_err().to_string();
        assert!(message.contains("separators"));
    }
}
