pub mod auth;
pub mod youtube;

use crate::core::VideoItem;
use async_trait::async_trait;

pub use auth::{AuthOutcome, Authenticator};
pub use youtube::YouTubeClient;

/// Produces every liked video of the signed-in user.
///
/// Implementations own paging and retries. On failure they return whatever was
/// collected so far instead of an error.
#[async_trait]
pub trait LikedVideoSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_liked(&self) -> Vec<VideoItem>;
}
