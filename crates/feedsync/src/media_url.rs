use tracing::{debug, warn};
use url::Url;

use crate::source::{Probe, ProbeOutcome};

/// Moves enclosure URLs off the CDN host when the CDN does not have the file.
#[derive(Debug, Clone)]
pub struct UrlNormalizer {
    cdn_host: String,
    primary_host: String,
}

impl UrlNormalizer {
    pub fn new(cdn_host: impl Into<String>, primary_host: impl Into<String>) -> Self {
        Self {
            cdn_host: cdn_host.into(),
            primary_host: primary_host.into(),
        }
    }

    fn is_cdn(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case(&self.cdn_host))
    }

    /// Returns `raw` unless it lives on the CDN and the probe reports 404, in
    /// which case the same path on the primary host is returned. Never fails.
    pub fn normalize<P: Probe + ?Sized>(&self, probe: &P, raw: &str) -> String {
        let Ok(mut url) = Url::parse(raw) else {
            return raw.to_string();
        };
        if !self.is_cdn(&url) {
            return raw.to_string();
        }

        match probe.probe(raw) {
            ProbeOutcome::Found => raw.to_string(),
            ProbeOutcome::NotFound => match url.set_host(Some(&self.primary_host)) {
                Ok(()) => {
                    debug!(from = raw, to = %url, "media missing on CDN, using primary host");
                    url.to_string()
                }
                Err(e) => {
                    warn!(url = raw, error = %e, "cannot rewrite media URL host");
                    raw.to_string()
                }
            },
            ProbeOutcome::Unknown(reason) => {
                warn!(url = raw, %reason, "media URL probe inconclusive, keeping it");
                raw.to_string()
            }
        }
    }
}
