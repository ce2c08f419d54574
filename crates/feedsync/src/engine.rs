use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::date::parse_italian_date;
use crate::episode::Episode;
use crate::error::{StoreError, SyncError};
use crate::media_url::UrlNormalizer;
use crate::podcast::Podcast;
use crate::source::{EpisodeSource, ListedEpisode, Probe};
use crate::store::FeedStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    NotLoaded,
    Loaded,
    Reconciling,
    Persisted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub slug: String,
    /// The feed did not exist and was started from scratch.
    pub created: bool,
    pub listed: usize,
    pub added: usize,
    pub skipped: usize,
}

/// A reconciled feed, ready for the caller to save.
pub struct Synced {
    pub store: FeedStore,
    pub report: SyncReport,
}

/// Reconciles stored feeds with the platform's listings, one podcast at a
/// time. Reads existing feeds but never writes them.
pub struct SyncEngine<S, P> {
    source: S,
    probe: P,
    normalizer: UrlNormalizer,
    dir: PathBuf,
    site_url: String,
    state: SyncState,
}

impl<S: EpisodeSource, P: Probe> SyncEngine<S, P> {
    pub fn new(
        source: S,
        probe: P,
        normalizer: UrlNormalizer,
        dir: impl Into<PathBuf>,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            source,
            probe,
            normalizer,
            dir: dir.into(),
            site_url: site_url.into(),
            state: SyncState::NotLoaded,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn enter(&mut self, slug: &str, next: SyncState) {
        debug!(slug, from = ?self.state, to = ?next, "sync state");
        self.state = next;
    }

    pub fn sync(&mut self, podcast: Podcast) -> Result<Synced, SyncError> {
        self.state = SyncState::NotLoaded;
        let slug = podcast.slug.clone();
        let mut store = FeedStore::new(podcast, &self.dir, &self.site_url);
        let mut report = SyncReport {
            slug: slug.clone(),
            ..SyncReport::default()
        };

        match store.load() {
            Ok(()) => self.enter(&slug, SyncState::Loaded),
            Err(StoreError::NotFound(path)) => {
                info!(slug = %slug, path = %path.display(), "no existing feed, starting a new one");
                store.initialize_fresh();
                report.created = true;
                self.enter(&slug, SyncState::Loaded);
            }
            Err(e) => return Err(e.into()),
        }

        self.enter(&slug, SyncState::Reconciling);
        self.reconcile(&mut store, &mut report)?;

        self.enter(&slug, SyncState::Persisted);
        Ok(Synced { store, report })
    }

    fn reconcile(&mut self, store: &mut FeedStore, report: &mut SyncReport) -> Result<(), SyncError> {
        let listing = self.source.listing(store.podcast())?;
        report.listed = listing.len();

        for listed in listing {
            if store.has_episode(listed.id)? {
                continue;
            }
            match self.enrich(&report.slug, listed)? {
                Some(episode) => {
                    if store.add_episode(&episode)? {
                        report.added += 1;
                    }
                }
                None => report.skipped += 1,
            }
        }
        Ok(())
    }

    /// Builds the episode for a listing row, or `None` when it has no media.
    fn enrich(&mut self, slug: &str, listed: ListedEpisode) -> Result<Option<Episode>, SyncError> {
        let content_html = match self.source.content(listed.id) {
            Ok(content) => content.unwrap_or_default(),
            Err(e) => {
                warn!(slug, id = listed.id, error = %e, "no content for episode");
                String::new()
            }
        };

        if listed.media_url.trim().is_empty() {
            warn!(slug, id = listed.id, title = %listed.title, "episode has no media URL, skipping");
            return Ok(None);
        }

        let enclosure_url = self.normalizer.normalize(&self.probe, &listed.media_url);
        let published = parse_italian_date(&listed.date).map_err(|source| SyncError::Date {
            episode_id: listed.id,
            source,
        })?;

        Ok(Some(Episode {
            title: listed.title,
            canonical_url: listed.url,
            published,
            duration_minutes: listed.minutes,
            content_html,
            enclosure_url,
            id: listed.id,
            podcast_id: listed.podcast_id,
            image_url: listed.image_url,
        }))
    }
}
