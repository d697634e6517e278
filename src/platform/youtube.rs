use crate::core::VideoItem;
use crate::error::FetchError;
use crate::platform::LikedVideoSource;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info};
use url::Url;

/// Loose shape of one `videos.list` entry. Everything is optional so that a
/// partial record still deserializes; defaults are filled in by `From`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVideo {
    pub id: Option<String>,
    pub snippet: Option<ApiSnippet>,
    pub content_details: Option<ApiContentDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSnippet {
    pub title: Option<String>,
    pub channel_title: Option<String>,
    pub category_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiContentDetails {
    pub video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVideoPage {
    #[serde(default)]
    pub items: Vec<ApiVideo>,
    pub next_page_token: Option<String>,
}

impl From<ApiVideo> for VideoItem {
    fn from(video: ApiVideo) -> Self {
        let snippet = video.snippet.unwrap_or_default();
        VideoItem {
            id: video.id,
            content_video_id: video.content_details.and_then(|d| d.video_id),
            title: snippet.title.unwrap_or_default(),
            channel_title: snippet.channel_title.unwrap_or_default(),
            category_id: snippet.category_id,
            description: snippet.description.unwrap_or_default(),
        }
    }
}

pub fn parse_page(body: &str) -> Result<ApiVideoPage, FetchError> {
    Ok(serde_json::from_str(body)?)
}

pub struct YouTubeClient {
    client: reqwest::Client,
    access_token: String,
    api_base: String,
    pub page_size: u32,
}

impl YouTubeClient {
    pub fn new(access_token: impl Into<String>, api_base: impl Into<String>, page_size: u32) -> Self {
        Self::with_http_client(reqwest::Client::new(), access_token, api_base, page_size)
    }

    pub fn with_http_client(
        client: reqwest::Client,
        access_token: impl Into<String>,
        api_base: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            client,
            access_token: access_token.into(),
            api_base: api_base.into(),
            page_size,
        }
    }

    pub fn page_url(&self, page_token: Option<&str>) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{}/videos", self.api_base.trim_end_matches('/')))?;
        url.query_pairs_mut()
            .append_pair("part", "snippet,contentDetails")
            .append_pair("myRating", "like")
            .append_pair("maxResults", &self.page_size.to_string());
        if let Some(token) = page_token {
            url.query_pairs_mut().append_pair("pageToken", token);
        }
        Ok(url)
    }

    pub async fn fetch_page(&self, page_token: Option<&str>) -> Result<ApiVideoPage, FetchError> {
        let url = self.page_url(page_token)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_page(&body)
    }

    /// Pages through the liked videos, appending to `items` as it goes so a failure
    /// part-way leaves everything gathered so far in place.
    async fn collect_into(&self, items: &mut Vec<VideoItem>) -> Result<(), FetchError> {
        let mut next_page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(next_page_token.as_deref()).await?;
            items.extend(page.items.into_iter().map(VideoItem::from));

            next_page_token = page.next_page_token;
            if next_page_token.is_none() {
                return Ok(());
            }

            info!("Retrieved {} videos...", items.len());
        }
    }
}

#[async_trait]
impl LikedVideoSource for YouTubeClient {
    fn name(&self) -> &'static str {
        "YouTube"
    }

    async fn fetch_liked(&self) -> Vec<VideoItem> {
        info!("Fetching liked videos...");

        let mut items = Vec::new();
        if let Err(e) = self.collect_into(&mut items).await {
            error!("Error fetching liked videos: {}", e);
        }

        info!("Finished fetching. Total liked videos found: {}", items.len());
        items
    }
}
