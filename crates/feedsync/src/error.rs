use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no feed at {}", .0.display())]
    NotFound(PathBuf),

    #[error("feed at {} is not a valid RSS document: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: rss::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("feed for {0} is neither loaded nor initialized")]
    NotInitialized(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("authentication required: {0}")]
    AuthRequired(String),

    #[error("remote error: {0}")]
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse date {input:?}")]
pub struct DateParseError {
    pub input: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("episode {episode_id}: {source}")]
    Date {
        episode_id: u64,
        #[source]
        source: DateParseError,
    },
}
