use std::io::IsTerminal;
use std::path::PathBuf;

use feedsync::{SyncEngine, SyncError, SyncReport, UrlNormalizer};
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use tracing::{error, info};

use crate::config::PlatformConfig;
use crate::platform::catalog::fetch_catalog;
use crate::platform::probe::HttpProbe;
use crate::platform::session::Session;
use crate::platform::Platform;

use super::select_podcasts;

pub(crate) struct SyncOptions {
    pub user: String,
    pub password: String,
    pub dir: PathBuf,
    pub podcasts: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct BatchSummary {
    pub synced: Vec<SyncReport>,
    pub failed: Vec<String>,
}

fn progress_bar(len: usize) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{bar:30.cyan} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb
}

/// Syncs every selected podcast, saving each feed as soon as it is done.
/// A failing podcast is logged and does not stop the others.
pub(crate) fn cmd_sync(config: &PlatformConfig, opts: SyncOptions) -> anyhow::Result<BatchSummary> {
    let client = crate::http::http_client(config)?;
    let catalog = fetch_catalog(&client, config)?;
    let selection = select_podcasts(&catalog, &opts.podcasts);

    let mut summary = BatchSummary::default();
    if !selection.unknown.is_empty() {
        error!(
            slugs = %selection.unknown.iter().join(", "),
            available = %catalog.keys().join(", "),
            "unknown podcasts"
        );
        summary.failed.extend(selection.unknown);
    }

    let probe = HttpProbe::new(crate::http::probe_client(config)?, config.probe_timeout);
    let session = Session::new(client, config.clone(), opts.user, opts.password);
    let mut engine = SyncEngine::new(
        Platform::new(session, config.clone()),
        probe,
        UrlNormalizer::new(config.cdn_host.clone(), config.primary_host()),
        opts.dir,
        config.site_url.as_str(),
    );

    let pb = progress_bar(selection.podcasts.len());
    for podcast in selection.podcasts {
        let slug = podcast.slug.clone();
        pb.set_message(slug.clone());

        let result = engine.sync(podcast).and_then(|synced| {
            synced.store.save().map_err(SyncError::from)?;
            Ok(synced.report)
        });
        match result {
            Ok(report) => {
                info!(
                    slug = %report.slug,
                    added = report.added,
                    skipped = report.skipped,
                    created = report.created,
                    "feed saved"
                );
                summary.synced.push(report);
            }
            Err(e) => {
                error!(slug = %slug, error = %e, "podcast sync failed");
                summary.failed.push(slug);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(summary)
}
