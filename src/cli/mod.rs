use crate::config::Config;
use crate::core::{emit, run_samples, Classifier, Pipeline, SongExtractor};
use crate::output::CsvSink;
use crate::platform::{AuthOutcome, Authenticator, LikedVideoSource, YouTubeClient};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "yt-liked-music")]
#[command(about = "Export the music among your liked YouTube videos to CSV")]
#[command(version)]
pub struct Cli {
    /// Run with built-in sample data to verify the filtering and parsing logic
    #[arg(long)]
    pub test: bool,

    /// Output CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML config file with paths and matching rules
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// OAuth client secrets downloaded from Google Cloud Console
    #[arg(long)]
    pub client_secrets: Option<PathBuf>,

    /// Where the OAuth token is cached between runs
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Loads the config file and applies command line overrides.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(output) = &self.output {
            config.output_file = output.clone();
        }
        if let Some(secrets) = &self.client_secrets {
            config.client_secrets = secrets.clone();
        }
        if let Some(token_file) = &self.token_file {
            config.token_file = token_file.clone();
        }
        Ok(config)
    }

    pub async fn run(&self) -> Result<()> {
        let config = self.resolve_config()?;
        let pipeline = Pipeline::new(
            Classifier::new(config.classifier.clone()),
            SongExtractor::new(config.extractor.clone()),
        );

        if self.test {
            return self.run_test(&pipeline);
        }

        let authenticator = Authenticator::new(&config.client_secrets, &config.token_file);
        let access_token = match authenticator.authenticate().await {
            AuthOutcome::Ready(token) => token,
            AuthOutcome::SetupRequired(instructions) => {
                println!("\nError: {}", instructions);
                return Ok(());
            }
            AuthOutcome::CredentialError(reason) => {
                error!("Authentication failed: {}", reason);
                return Ok(());
            }
        };

        let source = YouTubeClient::new(access_token, config.api_base.clone(), config.page_size);
        info!("Reading liked videos from {}", source.name());
        let items = source.fetch_liked().await;

        info!("Filtering and parsing music content...");
        let output = pipeline.run(&items)?;
        info!(
            "{} of {} liked videos look like music, {} unique",
            output.summary.music, output.summary.total, output.summary.unique
        );

        let mut sink = CsvSink::new(&config.output_file);
        emit(&output, &mut sink)
    }

    fn run_test(&self, pipeline: &Pipeline) -> Result<()> {
        println!("Running in TEST mode with mock data...");
        let report = run_samples(pipeline)?;

        println!("Mock processed {} videos.", report.processed);
        println!("Identified {} as music.", report.records.len());
        for record in &report.records {
            println!(" - {} | {} ({})", record.artist, record.song_name, record.url);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() -> Result<()> {
        let cli = Cli::parse_from(["yt-liked-music", "-o", "mine.csv", "--token-file", "t.json"]);
        let config = cli.resolve_config()?;

        assert_eq!(config.output_file, PathBuf::from("mine.csv"));
        assert_eq!(config.token_file, PathBuf::from("t.json"));
        assert_eq!(config.client_secrets, PathBuf::from("client_secrets.json"));
        assert!(!cli.test);
        Ok(())
    }

    #[tokio::test]
    async fn test_sample_mode_needs_no_credentials() -> Result<()> {
        let cli = Cli::parse_from(["yt-liked-music", "--test"]);
        cli.run().await
    }
}
