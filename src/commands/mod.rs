pub mod sync;

use std::collections::BTreeMap;

use feedsync::Podcast;

pub(crate) struct Selection {
    pub podcasts: Vec<Podcast>,
    pub unknown: Vec<String>,
}

/// Picks the requested slugs out of the catalog, in request order, or the
/// whole catalog when nothing was requested. Repeated slugs count once.
pub(crate) fn select_podcasts(catalog: &BTreeMap<String, Podcast>, requested: &[String]) -> Selection {
    if requested.is_empty() {
        return Selection {
            podcasts: catalog.values().cloned().collect(),
            unknown: Vec::new(),
        };
    }

    let mut podcasts: Vec<Podcast> = Vec::new();
    let mut unknown = Vec::new();
    for slug in requested {
        match catalog.get(slug) {
            Some(p) if !podcasts.iter().any(|q| q.slug == p.slug) => podcasts.push(p.clone()),
            Some(_) => {}
            None => unknown.push(slug.clone()),
        }
    }
    Selection { podcasts, unknown }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedsync::AccessLevel;

    fn catalog(slugs: &[&str]) -> BTreeMap<String, Podcast> {
        slugs
            .iter()
            .enumerate()
            .map(|(i, slug)| {
                (
                    slug.to_string(),
                    Podcast {
                        slug: slug.to_string(),
                        title: slug.to_uppercase(),
                        author: String::new(),
                        id: i as u64,
                        access_level: AccessLevel::Free,
                        image_url: String::new(),
                        description: String::new(),
                    },
                )
            })
            .collect()
    }

    fn slugs(selection: &Selection) -> Vec<&str> {
        selection.podcasts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_empty_request_selects_everything() {
        let c = catalog(&["politics", "morning"]);
        let s = select_podcasts(&c, &[]);
        assert_eq!(slugs(&s), vec!["morning", "politics"]);
        assert!(s.unknown.is_empty());
    }

    #[test]
    fn test_request_order_is_kept_and_unknown_reported() {
        let c = catalog(&["morning", "politics", "tienimi-bordone"]);
        let requested: Vec<String> = ["tienimi-bordone", "nope", "morning", "morning"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let s = select_podcasts(&c, &requested);
        assert_eq!(slugs(&s), vec!["tienimi-bordone", "morning"]);
        assert_eq!(s.unknown, vec!["nope"]);
    }
}
