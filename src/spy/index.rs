//! Slug to link mapping, rebuilt on every initialization.

use indexmap::IndexMap;

/// Strip one leading `#` from an `href` to get the anchor slug.
///
/// ```
/// # use tocspy::spy::slug_from_href;
/// assert_eq!(slug_from_href("#section-2"), "section-2");
/// assert_eq!(slug_from_href("plain"), "plain");
/// assert_eq!(slug_from_href("##twice"), "#twice");
/// ```
pub fn slug_from_href(href: &str) -> &str {
    href.strip_prefix('#').unwrap_or(href)
}

/// Links keyed by slug. Iteration follows the order in which slugs were
/// first seen; a duplicate slug keeps its position but the later link wins.
#[derive(Debug, Clone)]
pub struct LinkIndex<L> {
    links: IndexMap<String, L>,
}

impl<L> Default for LinkIndex<L> {
    fn default() -> Self {
        Self {
            links: IndexMap::new(),
        }
    }
}

impl<L> LinkIndex<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `link` under the slug of `href`. A missing `href` maps to the
    /// empty slug.
    pub fn insert(&mut self, href: Option<&str>, link: L) {
        let slug = slug_from_href(href.unwrap_or_default());
        self.links.insert(slug.to_string(), link);
    }

    pub fn get(&self, slug: &str) -> Option<&L> {
        self.links.get(slug)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_by_slug() {
        let mut index = LinkIndex::new();
        index.insert(Some("#intro"), 0);
        index.insert(Some("#body"), 1);
        assert_eq!(index.get("intro"), Some(&0));
        assert_eq!(index.get("body"), Some(&1));
        assert_eq!(index.get("#body"), None);
        assert_eq!(index.slugs().collect::<Vec<_>>(), vec!["intro", "body"]);
    }

    #[test]
    fn test_duplicate_slug_last_write_wins() {
        let mut index = LinkIndex::new();
        index.insert(Some("#a"), "first");
        index.insert(Some("#b"), "other");
        index.insert(Some("#a"), "second");
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("a"), Some(&"second"));
        assert_eq!(index.slugs().next(), Some("a"));
    }

    #[test]
    fn test_missing_href_is_empty_slug() {
        let mut index = LinkIndex::new();
        index.insert(None, 7);
        assert_eq!(index.get(""), Some(&7));
    }
}
