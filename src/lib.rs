pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod platform;
pub mod utils;

pub use crate::core::{Classifier, Pipeline, SongExtractor, SongRecord, VideoItem};
pub use error::ExtractError;
pub use platform::{LikedVideoSource, YouTubeClient};
