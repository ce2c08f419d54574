use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use url::Url;

pub(crate) const DEFAULT_SITE_URL: &str = "https://www.ilpost.it/";
pub(crate) const DEFAULT_CDN_HOST: &str = "static-prod.ilpost.it";

/// Where the platform lives and how to talk to it.
#[derive(Debug, Clone)]
pub(crate) struct PlatformConfig {
    pub site_url: Url,
    pub cdn_host: String,
    pub probe_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl PlatformConfig {
    pub fn new(site_url: &str, cdn_host: &str) -> anyhow::Result<Self> {
        let mut site_url =
            Url::parse(site_url).with_context(|| format!("invalid site URL: {site_url}"))?;
        if site_url.host_str().is_none() {
            bail!("site URL has no host: {site_url}");
        }
        if !site_url.path().ends_with('/') {
            let path = format!("{}/", site_url.path());
            site_url.set_path(&path);
        }
        Ok(Self {
            site_url,
            cdn_host: cdn_host.to_string(),
            probe_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("postfeed/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Reads `POSTFEED_SITE_URL` and `POSTFEED_CDN_HOST`, falling back to the
    /// publisher's production hosts.
    pub fn from_env() -> anyhow::Result<Self> {
        let site = std::env::var("POSTFEED_SITE_URL").unwrap_or_else(|_| DEFAULT_SITE_URL.into());
        let cdn = std::env::var("POSTFEED_CDN_HOST").unwrap_or_else(|_| DEFAULT_CDN_HOST.into());
        Self::new(&site, &cdn)
    }

    pub fn primary_host(&self) -> &str {
        self.site_url.host_str().unwrap_or_default()
    }

    pub fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        self.site_url
            .join(path)
            .with_context(|| format!("invalid endpoint path: {path}"))
    }
}

pub(crate) fn output_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var("POSTFEED_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}
