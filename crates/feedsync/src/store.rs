use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::{ChannelMeta, FeedDocument};
use crate::episode::Episode;
use crate::error::StoreError;
use crate::podcast::Podcast;

const FEED_LANGUAGE: &str = "it";

/// Owns the feed document of one podcast, stored at `<dir>/<slug>.xml`.
pub struct FeedStore {
    podcast: Podcast,
    site_url: String,
    path: PathBuf,
    document: Option<FeedDocument>,
}

impl FeedStore {
    /// `site_url` is the publisher's home page, used for the channel link.
    pub fn new(podcast: Podcast, dir: &Path, site_url: &str) -> Self {
        let path = dir.join(format!("{}.xml", podcast.slug));
        Self {
            podcast,
            site_url: site_url.trim_end_matches('/').to_string(),
            path,
            document: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn podcast(&self) -> &Podcast {
        &self.podcast
    }

    pub fn document(&self) -> Option<&FeedDocument> {
        self.document.as_ref()
    }

    pub fn load(&mut self) -> Result<(), StoreError> {
        let bytes = fs::read(&self.path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
            _ => StoreError::Io {
                path: self.path.clone(),
                source,
            },
        })?;
        let document =
            FeedDocument::read_from(bytes.as_slice()).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            path = %self.path.display(),
            episodes = document.items().len(),
            "loaded feed"
        );
        self.document = Some(document);
        Ok(())
    }

    /// Starts an empty, directory-blocked feed from the podcast's metadata.
    pub fn initialize_fresh(&mut self) {
        let p = &self.podcast;
        let meta = ChannelMeta {
            title: p.title.clone(),
            author: p.author.clone(),
            image_url: p.image_url.clone(),
            description: p.description.clone(),
            language: FEED_LANGUAGE.to_string(),
            link: format!("{}/podcasts/{}", self.site_url, p.slug),
            explicit: false,
            blocked: true,
        };
        self.document = Some(FeedDocument::new(meta));
    }

    fn require_document(&self) -> Result<&FeedDocument, StoreError> {
        self.document
            .as_ref()
            .ok_or_else(|| StoreError::NotInitialized(self.podcast.slug.clone()))
    }

    pub fn has_episode(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.require_document()?.contains(&id.to_string()))
    }

    pub fn episode_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .require_document()?
            .guids()
            .map(str::to_string)
            .collect())
    }

    /// Appends the episode unless its id is already present. Returns whether
    /// anything was appended. Only the in-memory document changes.
    pub fn add_episode(&mut self, episode: &Episode) -> Result<bool, StoreError> {
        if self.has_episode(episode.id)? {
            debug!(slug = %self.podcast.slug, id = episode.id, "episode already in feed");
            return Ok(false);
        }
        let slug = self.podcast.slug.clone();
        let document = self
            .document
            .as_mut()
            .ok_or(StoreError::NotInitialized(slug))?;
        document.push(episode.to_item());
        Ok(true)
    }

    /// Writes the document to a temporary file beside the feed and renames it
    /// into place. On failure the previous feed is untouched and the
    /// temporary file is removed.
    pub fn save(&self) -> Result<(), StoreError> {
        let document = self.require_document()?;
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_err)?;
        let tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", self.podcast.slug))
            .suffix(".xml.tmp")
            .tempfile_in(dir)
            .map_err(io_err)?;
        let mut writer = document
            .write_to(BufWriter::new(tmp))
            .map_err(|e| io_err(io::Error::other(e)))?;
        writer.flush().map_err(io_err)?;
        let tmp = writer
            .into_inner()
            .map_err(|e| io_err(e.into_error()))?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::podcast::AccessLevel;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    const SITE: &str = "https://www.ilpost.it/";

    fn podcast() -> Podcast {
        Podcast {
            slug: "morning".to_string(),
            title: "Morning".to_string(),
            author: "Francesco Costa".to_string(),
            id: 227_474,
            access_level: AccessLevel::Subscriber,
            image_url: "https://www.ilpost.it/morning.png".to_string(),
            description: "La rassegna stampa".to_string(),
        }
    }

    fn episode(id: u64) -> Episode {
        Episode {
            title: format!("Puntata {id}"),
            canonical_url: format!("https://www.ilpost.it/episodes/{id}/"),
            published: Utc.with_ymd_and_hms(2026, 1, 31, 7, 0, 0).unwrap(),
            duration_minutes: 25,
            content_html: String::new(),
            enclosure_url: format!("https://www.ilpost.it/{id}.mp3"),
            id,
            podcast_id: 227_474,
            image_url: None,
        }
    }

    fn fresh_store(dir: &TempDir) -> FeedStore {
        let mut store = FeedStore::new(podcast(), dir.path(), SITE);
        store.initialize_fresh();
        store
    }

    #[test]
    fn test_path_is_derived_from_slug() {
        let dir = TempDir::new().unwrap();
        let store = FeedStore::new(podcast(), dir.path(), SITE);
        assert_eq!(store.path(), dir.path().join("morning.xml"));
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = FeedStore::new(podcast(), dir.path(), SITE);
        assert!(matches!(store.load(), Err(StoreError::NotFound(_))));
        assert!(store.document().is_none());
    }

    #[test]
    fn test_load_corrupt_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("morning.xml"), "<html>nope</html>").unwrap();
        let mut store = FeedStore::new(podcast(), dir.path(), SITE);
        assert!(matches!(store.load(), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_queries_before_initialization_fail() {
        let dir = TempDir::new().unwrap();
        let mut store = FeedStore::new(podcast(), dir.path(), SITE);
        assert!(matches!(
            store.has_episode(1),
            Err(StoreError::NotInitialized(_))
        ));
        assert!(matches!(
            store.add_episode(&episode(1)),
            Err(StoreError::NotInitialized(_))
        ));
        assert!(matches!(store.save(), Err(StoreError::NotInitialized(_))));
    }

    #[test]
    fn test_initialize_fresh_populates_channel() {
        let dir = TempDir::new().unwrap();
        let store = fresh_store(&dir);
        let meta = &store.document().unwrap().meta;

        assert_eq!(meta.title, "Morning");
        assert_eq!(meta.author, "Francesco Costa");
        assert_eq!(meta.language, "it");
        assert_eq!(meta.link, "https://www.ilpost.it/podcasts/morning");
        assert!(meta.blocked);
        assert!(!meta.explicit);
        assert!(store.document().unwrap().items().is_empty());
    }

    #[test]
    fn test_add_episode_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = fresh_store(&dir);

        assert!(store.add_episode(&episode(7)).unwrap());
        assert!(!store.add_episode(&episode(7)).unwrap());

        assert_eq!(store.episode_ids().unwrap(), vec!["7"]);
    }

    #[test]
    fn test_add_episode_preserves_call_order() {
        let dir = TempDir::new().unwrap();
        let mut store = fresh_store(&dir);

        for id in [30, 10, 20, 5] {
            store.add_episode(&episode(id)).unwrap();
        }

        assert_eq!(store.episode_ids().unwrap(), vec!["30", "10", "20", "5"]);
    }

    #[test]
    fn test_saved_feed_loads_back_with_episode() {
        let dir = TempDir::new().unwrap();
        let mut store = fresh_store(&dir);
        store.add_episode(&episode(99)).unwrap();
        store.save().unwrap();

        let mut reloaded = FeedStore::new(podcast(), dir.path(), SITE);
        reloaded.load().unwrap();

        assert!(reloaded.has_episode(99).unwrap());
        assert!(!reloaded.has_episode(98).unwrap());
        assert_eq!(reloaded.document().unwrap().meta.title, "Morning");
        assert_eq!(dir_entries(&dir), vec!["morning.xml"]);
    }

    fn dir_entries(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_load_unreadable_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("morning.xml")).unwrap();
        let mut store = FeedStore::new(podcast(), dir.path(), SITE);

        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
        assert!(store.document().is_none());
    }

    #[test]
    fn test_failed_save_leaves_no_temporary_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("morning.xml")).unwrap();
        let mut store = fresh_store(&dir);
        store.add_episode(&episode(1)).unwrap();

        assert!(matches!(store.save(), Err(StoreError::Io { .. })));
        assert_eq!(dir_entries(&dir), vec!["morning.xml"]);
        assert!(dir.path().join("morning.xml").is_dir());
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("feeds").join("private");
        let mut store = FeedStore::new(podcast(), &nested, SITE);
        store.initialize_fresh();
        store.save().unwrap();
        assert!(nested.join("morning.xml").exists());
    }
}
