//! Incremental synchronization of podcast RSS feeds.
//!
//! A [`FeedStore`] owns one podcast's feed document. The [`SyncEngine`]
//! reconciles it against the episode listing supplied by an
//! [`EpisodeSource`], appending only the episodes the feed does not carry yet.
//! The engine never writes to disk; callers persist with [`FeedStore::save`].

pub mod date;
pub mod document;
pub mod engine;
pub mod episode;
pub mod error;
pub mod media_url;
pub mod podcast;
pub mod source;
pub mod store;

pub use date::parse_italian_date;
pub use document::{ChannelMeta, FeedDocument};
pub use engine::{SyncEngine, SyncReport, SyncState, Synced};
pub use episode::Episode;
pub use error::{DateParseError, SourceError, StoreError, SyncError};
pub use media_url::UrlNormalizer;
pub use podcast::{AccessLevel, Podcast};
pub use source::{EpisodeSource, ListedEpisode, Probe, ProbeOutcome};
pub use store::FeedStore;
