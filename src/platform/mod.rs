pub mod catalog;
pub mod probe;
pub mod session;

use feedsync::{EpisodeSource, ListedEpisode, Podcast, SourceError};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use serde::Deserialize;
use tracing::debug;

use crate::config::PlatformConfig;
use session::Session;

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    msg: String,
    #[serde(rename = "postcastList", default)]
    episodes: Vec<ListingRow>,
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    id: u64,
    title: Option<String>,
    url: Option<String>,
    date: Option<String>,
    minutes: Option<i64>,
    podcast_raw_url: Option<String>,
    podcast_id: Option<u64>,
    image: Option<String>,
}

impl ListingRow {
    fn into_listed(self, podcast_id: u64) -> ListedEpisode {
        ListedEpisode {
            id: self.id,
            title: self.title.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            minutes: self.minutes.unwrap_or_default(),
            media_url: self.podcast_raw_url.unwrap_or_default(),
            podcast_id: self.podcast_id.unwrap_or(podcast_id),
            image_url: self.image.filter(|i| !i.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostContent {
    content: Rendered,
}

#[derive(Debug, Deserialize)]
struct Rendered {
    rendered: String,
}

fn remote(context: &str, e: impl std::fmt::Display) -> SourceError {
    SourceError::Remote(format!("{context}: {e}"))
}

fn parse_listing(body: &str, podcast_id: u64) -> Result<Vec<ListedEpisode>, SourceError> {
    let envelope: ListingEnvelope =
        serde_json::from_str(body).map_err(|e| remote("malformed episode listing", e))?;
    if envelope.data.msg != "OK" {
        return Err(SourceError::Remote(format!(
            "listing for podcast {podcast_id} answered {:?}",
            envelope.data.msg
        )));
    }
    Ok(envelope
        .data
        .episodes
        .into_iter()
        .map(|row| row.into_listed(podcast_id))
        .collect())
}

/// The publisher's WordPress site, seen as an [`EpisodeSource`].
pub(crate) struct Platform {
    session: Session,
    config: PlatformConfig,
}

impl Platform {
    pub fn new(session: Session, config: PlatformConfig) -> Self {
        Self { session, config }
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, SourceError> {
        self.config
            .endpoint(path)
            .map_err(|e| SourceError::Remote(format!("{e:#}")))
    }
}

impl EpisodeSource for Platform {
    fn listing(&mut self, podcast: &Podcast) -> Result<Vec<ListedEpisode>, SourceError> {
        let url = self.endpoint("wp-admin/admin-ajax.php")?;
        let referer = self.endpoint(&format!("podcasts/{}", podcast.slug))?;

        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        if let Ok(value) = HeaderValue::from_str(referer.as_str()) {
            headers.insert(REFERER, value);
        }
        let podcast_id = podcast.id.to_string();
        let form = [
            ("action", "checkpodcast"),
            ("post_id", "0"),
            ("podcast_id", podcast_id.as_str()),
        ];

        debug!(
            slug = %podcast.slug,
            id = podcast.id,
            logged_in = self.session.is_authenticated(),
            "fetching episode listing"
        );
        let client = self.session.authenticated()?;
        let body = client
            .post(url)
            .headers(headers)
            .form(&form)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| remote("listing request failed", e))?;

        parse_listing(&body, podcast.id)
    }

    fn content(&mut self, episode_id: u64) -> Result<Option<String>, SourceError> {
        let url = self.endpoint(&format!("wp-json/wp/v2/posts/{episode_id}"))?;
        let client = self.session.authenticated()?;
        let response = client
            .get(url)
            .send()
            .map_err(|e| remote("content request failed", e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let post: PostContent = response
            .error_for_status()
            .and_then(|r| r.json())
            .map_err(|e| remote("content request failed", e))?;
        let html = post.content.rendered.trim().to_string();
        Ok(Some(html).filter(|h| !h.is_empty()))
    }
}
