use std::collections::BTreeMap;

use anyhow::{Context, anyhow, bail};
use feedsync::{AccessLevel, Podcast};
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::config::PlatformConfig;

const NEXT_DATA_SELECTOR: &str = "script#__NEXT_DATA__";

#[derive(Debug, Deserialize)]
struct NextData {
    props: Props,
}

#[derive(Debug, Deserialize)]
struct Props {
    #[serde(rename = "pageProps")]
    page_props: PageProps,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    podcasts: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    slug: String,
    id: u64,
    #[serde(default)]
    title: String,
    author: Option<String>,
    access_level: Option<String>,
    image: Option<String>,
    description: Option<String>,
}

impl From<CatalogEntry> for Podcast {
    fn from(e: CatalogEntry) -> Self {
        Podcast {
            slug: e.slug,
            title: e.title,
            author: e.author.unwrap_or_default(),
            id: e.id,
            access_level: e
                .access_level
                .as_deref()
                .map(AccessLevel::parse)
                .unwrap_or(AccessLevel::Unknown(String::new())),
            image_url: e.image.unwrap_or_default(),
            description: e.description.unwrap_or_default(),
        }
    }
}

/// Pulls the JSON blob the podcast index page embeds for its client-side app.
fn embedded_json(html: &str) -> anyhow::Result<Option<String>> {
    let selector =
        Selector::parse(NEXT_DATA_SELECTOR).map_err(|e| anyhow!("invalid selector: {e}"))?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .next()
        .map(|script| script.text().collect::<String>().trim().to_string())
        .filter(|json| !json.is_empty()))
}

pub(crate) fn parse_catalog(html: &str) -> anyhow::Result<BTreeMap<String, Podcast>> {
    let Some(json) = embedded_json(html)? else {
        bail!("podcast index page has no embedded catalog data");
    };
    let data: NextData = serde_json::from_str(&json).context("malformed catalog data")?;
    Ok(data
        .props
        .page_props
        .podcasts
        .into_iter()
        .map(|entry| (entry.slug.clone(), Podcast::from(entry)))
        .collect())
}

pub(crate) fn fetch_catalog(
    client: &Client,
    config: &PlatformConfig,
) -> anyhow::Result<BTreeMap<String, Podcast>> {
    let url = config.endpoint("podcasts/")?;
    let html = client
        .get(url.clone())
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .with_context(|| format!("failed to fetch podcast catalog from {url}"))?;
    parse_catalog(&html)
}
