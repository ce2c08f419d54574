use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use rss::extension::itunes::ITunesChannelExtension;
use rss::extension::{Extension, ExtensionMap};
use rss::{Channel, Item};

const GOOGLEPLAY_PREFIX: &str = "googleplay";
const GOOGLEPLAY_NAMESPACE: &str = "http://www.google.com/schemas/play-podcasts/1.0";

/// Channel-level metadata of a feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelMeta {
    pub title: String,
    pub author: String,
    pub image_url: String,
    pub description: String,
    pub language: String,
    pub link: String,
    pub explicit: bool,
    /// Asks podcast directories not to list the feed.
    pub blocked: bool,
}

/// A feed held as plain data: channel metadata plus entries in insertion
/// order. Turned into XML only by [`FeedDocument::write_to`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedDocument {
    pub meta: ChannelMeta,
    items: Vec<Item>,
}

fn is_yes(value: Option<&str>) -> bool {
    value.is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "yes" | "true"))
}

fn non_empty(value: &str) -> Option<String> {
    Some(value.to_string()).filter(|v| !v.is_empty())
}

impl FeedDocument {
    pub fn new(meta: ChannelMeta) -> Self {
        Self {
            meta,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn guids(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter_map(|item| item.guid().map(|g| g.value()))
    }

    pub fn contains(&self, guid: &str) -> bool {
        self.guids().any(|g| g == guid)
    }

    /// Appends unconditionally; de-duplication is the store's job.
    pub(crate) fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn from_channel(channel: Channel) -> Self {
        let itunes = channel.itunes_ext();
        let googleplay_block = channel
            .extensions()
            .get(GOOGLEPLAY_PREFIX)
            .and_then(|m| m.get("block"))
            .and_then(|exts| exts.first())
            .and_then(|e| e.value());

        let meta = ChannelMeta {
            title: channel.title().to_string(),
            author: itunes
                .and_then(|i| i.author())
                .unwrap_or_default()
                .to_string(),
            image_url: itunes
                .and_then(|i| i.image())
                .unwrap_or_default()
                .to_string(),
            description: channel.description().to_string(),
            language: channel.language().unwrap_or_default().to_string(),
            link: channel.link().to_string(),
            explicit: is_yes(itunes.and_then(|i| i.explicit())),
            blocked: is_yes(itunes.and_then(|i| i.block())) || is_yes(googleplay_block),
        };
        Self {
            meta,
            items: channel.items().to_vec(),
        }
    }

    pub fn to_channel(&self) -> Channel {
        let meta = &self.meta;

        let mut itunes = ITunesChannelExtension::default();
        itunes.set_author(non_empty(&meta.author));
        itunes.set_image(non_empty(&meta.image_url));
        itunes.set_explicit(meta.explicit.to_string());

        let mut channel = Channel::default();
        channel.set_title(meta.title.clone());
        channel.set_link(meta.link.clone());
        channel.set_description(meta.description.clone());
        channel.set_language(meta.language.clone());

        if meta.blocked {
            itunes.set_block("Yes".to_string());

            let mut block = Extension::default();
            block.set_name(format!("{GOOGLEPLAY_PREFIX}:block"));
            block.set_value("yes".to_string());
            let mut extensions = ExtensionMap::default();
            extensions
                .entry(GOOGLEPLAY_PREFIX.to_string())
                .or_default()
                .insert("block".to_string(), vec![block]);
            channel.set_extensions(extensions);
            channel.set_namespaces(BTreeMap::from([(
                GOOGLEPLAY_PREFIX.to_string(),
                GOOGLEPLAY_NAMESPACE.to_string(),
            )]));
        }

        channel.set_itunes_ext(itunes);
        channel.set_items(self.items.clone());
        channel
    }

    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, rss::Error> {
        Channel::read_from(reader).map(Self::from_channel)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<W, rss::Error> {
        self.to_channel().write_to(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rss::Guid;

    fn meta() -> ChannelMeta {
        ChannelMeta {
            title: "Morning".to_string(),
            author: "Francesco Costa".to_string(),
            image_url: "https://www.ilpost.it/morning.png".to_string(),
            description: "La rassegna stampa".to_string(),
            language: "it".to_string(),
            link: "https://www.ilpost.it/podcasts/morning".to_string(),
            explicit: false,
            blocked: true,
        }
    }

    fn item(guid: &str, description: &str) -> Item {
        let mut g = Guid::default();
        g.set_value(guid);
        g.set_permalink(false);
        let mut item = Item::default();
        item.set_title(format!("Episode {guid}"));
        item.set_guid(g);
        item.set_description(description.to_string());
        item
    }

    fn round_trip(doc: &FeedDocument) -> (String, FeedDocument) {
        let bytes = doc.write_to(Vec::new()).unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        let parsed = FeedDocument::read_from(xml.as_bytes()).unwrap();
        (xml, parsed)
    }

    #[test]
    fn test_metadata_survives_write_and_read() {
        let doc = FeedDocument::new(meta());
        let (xml, parsed) = round_trip(&doc);

        assert!(xml.contains("<itunes:block>Yes</itunes:block>"));
        assert!(xml.contains("<googleplay:block>yes</googleplay:block>"));
        assert!(xml.contains(GOOGLEPLAY_NAMESPACE));
        assert_eq!(parsed.meta, meta());
    }

    #[test]
    fn test_unblocked_feed_has_no_block_tags() {
        let mut m = meta();
        m.blocked = false;
        let (xml, parsed) = round_trip(&FeedDocument::new(m));

        assert!(!xml.contains("block>"));
        assert!(!parsed.meta.blocked);
    }

    #[test]
    fn test_missing_image_and_author_are_omitted() {
        let mut m = meta();
        m.image_url = String::new();
        m.author = String::new();
        let (xml, parsed) = round_trip(&FeedDocument::new(m.clone()));

        assert!(!xml.contains("itunes:image"));
        assert!(!xml.contains("itunes:author"));
        assert_eq!(parsed.meta, m);
    }

    #[test]
    fn test_entries_keep_order_and_markup() {
        let mut doc = FeedDocument::new(meta());
        doc.push(item("3", "<p>terzo &amp; ultimo</p>"));
        doc.push(item("1", "<b>primo</b>"));
        doc.push(item("2", ""));

        let (_, parsed) = round_trip(&doc);

        assert_eq!(parsed.guids().collect::<Vec<_>>(), vec!["3", "1", "2"]);
        assert_eq!(
            parsed.items()[0].description(),
            Some("<p>terzo &amp; ultimo</p>")
        );
        assert_eq!(parsed.items()[1].description(), Some("<b>primo</b>"));
    }

    #[test]
    fn test_contains_by_guid() {
        let mut doc = FeedDocument::new(meta());
        doc.push(item("42", ""));
        assert!(doc.contains("42"));
        assert!(!doc.contains("4"));
    }

    #[test]
    fn test_items_without_guid_are_ignored_for_membership() {
        let mut doc = FeedDocument::new(meta());
        doc.push(Item::default());
        assert_eq!(doc.guids().count(), 0);
        assert_eq!(doc.items().len(), 1);
    }

    #[test]
    fn test_read_rejects_non_rss() {
        assert!(FeedDocument::read_from("<html><body/></html>".as_bytes()).is_err());
        assert!(FeedDocument::read_from("not xml at all".as_bytes()).is_err());
    }
}
