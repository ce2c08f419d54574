use chrono::{DateTime, Utc};
use rss::extension::itunes::ITunesItemExtension;
use rss::{Enclosure, Guid, Item};

const AUDIO_MIME_TYPE: &str = "audio/mpeg";

#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub title: String,
    pub canonical_url: String,
    pub published: DateTime<Utc>,
    pub duration_minutes: i64,
    pub content_html: String,
    pub enclosure_url: String,
    pub id: u64,
    pub podcast_id: u64,
    pub image_url: Option<String>,
}

impl Episode {
    pub fn duration_seconds(&self) -> i64 {
        self.duration_minutes * 60
    }

    pub fn guid(&self) -> String {
        self.id.to_string()
    }

    /// Renders the feed entry. The enclosure length carries the duration in
    /// seconds, not a byte count; existing subscribers' feeds rely on it.
    pub fn to_item(&self) -> Item {
        let seconds = self.duration_seconds().to_string();

        let mut enclosure = Enclosure::default();
        enclosure.set_url(self.enclosure_url.clone());
        enclosure.set_mime_type(AUDIO_MIME_TYPE);
        enclosure.set_length(seconds.clone());

        let mut guid = Guid::default();
        guid.set_value(self.guid());
        guid.set_permalink(false);

        let mut itunes = ITunesItemExtension::default();
        itunes.set_duration(seconds);
        itunes.set_image(self.image_url.clone());

        let mut item = Item::default();
        item.set_title(self.title.clone());
        item.set_enclosure(enclosure);
        item.set_link(self.canonical_url.clone());
        item.set_pub_date(self.published.to_rfc2822());
        item.set_description(self.content_html.clone());
        item.set_guid(guid);
        item.set_itunes_ext(itunes);
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn episode() -> Episode {
        Episode {
            title: "Il mondo in 30 minuti".to_string(),
            canonical_url: "https://www.ilpost.it/episodes/mondo/".to_string(),
            published: Utc.with_ymd_and_hms(2026, 1, 31, 14, 0, 0).unwrap(),
            duration_minutes: 31,
            content_html: "<p>Notizie &amp; commenti</p>".to_string(),
            enclosure_url: "https://www.ilpost.it/ep.mp3".to_string(),
            id: 987_654,
            podcast_id: 227_474,
            image_url: Some("https://www.ilpost.it/ep.jpg".to_string()),
        }
    }

    #[test]
    fn test_item_fields() {
        let item = episode().to_item();

        assert_eq!(item.title(), Some("Il mondo in 30 minuti"));
        assert_eq!(item.link(), Some("https://www.ilpost.it/episodes/mondo/"));
        assert_eq!(item.pub_date(), Some("Sat, 31 Jan 2026 14:00:00 +0000"));
        assert_eq!(item.description(), Some("<p>Notizie &amp; commenti</p>"));

        let enclosure = item.enclosure().unwrap();
        assert_eq!(enclosure.url(), "https://www.ilpost.it/ep.mp3");
        assert_eq!(enclosure.mime_type(), "audio/mpeg");
        assert_eq!(enclosure.length(), "1860");

        let guid = item.guid().unwrap();
        assert_eq!(guid.value(), "987654");
        assert!(!guid.is_permalink());

        let itunes = item.itunes_ext().unwrap();
        assert_eq!(itunes.duration(), Some("1860"));
        assert_eq!(itunes.image(), Some("https://www.ilpost.it/ep.jpg"));
    }

    #[test]
    fn test_negative_minutes_pass_through() {
        let mut e = episode();
        e.duration_minutes = -2;
        let item = e.to_item();
        assert_eq!(item.enclosure().unwrap().length(), "-120");
    }

    #[test]
    fn test_empty_content_gives_empty_description() {
        let mut e = episode();
        e.content_html = String::new();
        assert_eq!(e.to_item().description(), Some(""));
    }
}
