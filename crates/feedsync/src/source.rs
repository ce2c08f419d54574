use crate::error::SourceError;
use crate::podcast::Podcast;

/// One row of a podcast's episode listing, as the platform reports it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListedEpisode {
    pub id: u64,
    pub title: String,
    pub url: String,
    /// Unparsed; may carry an Italian month abbreviation.
    pub date: String,
    pub minutes: i64,
    pub media_url: String,
    pub podcast_id: u64,
    pub image_url: Option<String>,
}

/// Where the engine gets episodes from.
///
/// Implementations may authenticate lazily: nothing is requested before the
/// first `listing` call.
pub trait EpisodeSource {
    fn listing(&mut self, podcast: &Podcast) -> Result<Vec<ListedEpisode>, SourceError>;

    /// `Ok(None)` means the episode has no rich content.
    fn content(&mut self, episode_id: u64) -> Result<Option<String>, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Found,
    NotFound,
    Unknown(String),
}

pub trait Probe {
    fn probe(&self, url: &str) -> ProbeOutcome;
}
