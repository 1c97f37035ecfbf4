use serde::{Deserialize, Serialize};

/// Keys that only carry editing bookkeeping and say nothing about the feature.
const METADATA_KEYS: &[&str] = &["created_by", "source", "note", "fixme", "FIXME", "type"];

/// Key/value tags of one OSM primitive.
///
/// Keys are unique; iteration follows insertion order. Tag sets are small, so
/// lookups scan linearly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TagSet {
    tags: Vec<(String, String)>,
}

impl TagSet {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets `key` to `value`, replacing the previous value of `key` in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.tags.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.tags.push((key, value)),
        }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.value(key) == Some(value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// True if there are no tags besides editing metadata.
    pub fn is_metadata_only(&self) -> bool {
        self.tags.iter().all(|(k, _)| METADATA_KEYS.contains(&k.as_str()))
    }

    /// The `name` tag, or an empty string.
    pub fn name(&self) -> &str {
        self.value("name").unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for TagSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = TagSet::new();
        tags.extend(iter);
        tags
    }
}

impl From<Vec<crate::osm::Tag>> for TagSet {
    fn from(value: Vec<crate::osm::Tag>) -> Self {
        value.into_iter().map(|tag| (tag.k, tag.v)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_replaces_existing_key() {
        let mut tags = TagSet::new();
        tags.set("highway", "residential");
        tags.set("name", "Main Street");
        tags.set("highway", "primary");

        assert_eq!(tags.len(), 2);
        assert_eq!(tags.value("highway"), Some("primary"));
        assert_eq!(
            tags.iter().collect::<Vec<_>>(),
            vec![("highway", "primary"), ("name", "Main Street")]
        );
    }

    #[test]
    fn membership_queries() {
        let tags: TagSet = [("building", "yes"), ("name", "Hall")].into_iter().collect();

        assert!(tags.contains("building", "yes"));
        assert!(!tags.contains("building", "no"));
        assert!(tags.contains_key("name"));
        assert!(!tags.contains_key("highway"));
        assert_eq!(tags.value("highway"), None);
        assert_eq!(tags.name(), "Hall");
        assert_eq!(TagSet::new().name(), "");
    }

    #[test]
    fn metadata_only() {
        assert!(TagSet::new().is_metadata_only());
        let tags: TagSet = [("created_by", "JOSM"), ("source", "survey")].into_iter().collect();
        assert!(tags.is_metadata_only());
        let tags: TagSet = [("source", "survey"), ("amenity", "bench")].into_iter().collect();
        assert!(!tags.is_metadata_only());
    }
}
