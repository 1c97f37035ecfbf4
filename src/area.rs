use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::category::BUILDING_VALUES;
use crate::tags::TagSet;

// http://wiki.openstreetmap.org/wiki/Map_Features#Landuse
pub(crate) const AREA_TAGS: &[&str] = &[
    "landuse=forest",
    "natural=water",
    "natural=wood",
    "natural=beach",
    "natural=wetland",
    "natural=glacier",
    "natural=scrub",
    "natural=cliff",
    "area=yes",
    "waterway=riverbank",
    "man_made=bridge",
    "amenity=graveyard",
    "amenity=parking",
    "amenity=parking_space",
    "amenity=bicycle_parking",
    "amenity=college",
    "amenity=hospital",
    "amenity=school",
    "amenity=university",
    "leisure=common",
    "leisure=garden",
    "leisure=golf_course",
    "leisure=playground",
    "leisure=pitch",
    "leisure=park",
    "leisure=sports_centre",
    "leisure=stadium",
    "leisure=swimming_pool",
    "leisure=track",
    "military=danger_area",
    "landuse=allotments",
    "landuse=basin",
    "landuse=brownfield",
    "landuse=cemetery",
    "landuse=commercial",
    "landuse=construction",
    "landuse=farm",
    "landuse=farmland",
    "landuse=farmyard",
    "landuse=garages",
    "landuse=greenfield",
    "landuse=industrial",
    "landuse=landfill",
    "landuse=meadow",
    "landuse=military",
    "landuse=orchard",
    "landuse=quarry",
    "landuse=railway",
    "landuse=reservoir",
    "landuse=residential",
    "landuse=retail",
    "landuse=vineyard",
    "landuse=grass",
    "marble_land=landmass",
    "settlement=yes",
];

/// Set of `key=value` tags that make a way a closed area, grouped by key.
#[derive(Debug, Clone)]
pub struct AreaRules {
    tags: HashMap<String, HashSet<String>>,
}

static GLOBAL: OnceLock<AreaRules> = OnceLock::new();

impl AreaRules {
    /// Builds the rules from `key=value` strings. Entries without `=` are
    /// ignored.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules: HashMap<String, HashSet<String>> = HashMap::new();
        for tag in tags {
            if let Some((key, value)) = tag.as_ref().split_once('=') {
                rules.entry(key.to_string()).or_default().insert(value.to_string());
            }
        }
        AreaRules { tags: rules }
    }

    pub fn standard() -> Self {
        let buildings = BUILDING_VALUES
            .iter()
            .map(|value| format!("building={}", value));
        Self::new(
            AREA_TAGS
                .iter()
                .map(|tag| tag.to_string())
                .chain(buildings),
        )
    }

    /// Process-wide standard rules, built on first use.
    pub fn global() -> &'static AreaRules {
        GLOBAL.get_or_init(AreaRules::standard)
    }

    /// Number of `key=value` pairs.
    pub fn len(&self) -> usize {
        self.tags.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Checks a tag given in `key=value` form.
    pub fn is_area_key_value(&self, key_value: &str) -> bool {
        key_value
            .split_once('=')
            .map_or(false, |(key, value)| self.is_area_tag(key, value))
    }

    pub fn is_area_tag(&self, key: &str, value: &str) -> bool {
        self.tags
            .get(key)
            .map_or(false, |values| values.contains(value))
    }

    /// True if any tag implies an area. A closed way without such a tag is a
    /// line.
    pub fn is_area(&self, tags: &TagSet) -> bool {
        tags.iter().any(|(k, v)| self.is_area_tag(k, v))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn standard_contains_buildings_and_synthetic_tags() {
        let rules = AreaRules::standard();
        assert!(rules.is_area_key_value("landuse=forest"));
        assert!(rules.is_area_key_value("building=yes"));
        assert!(rules.is_area_key_value("building=church"));
        assert!(rules.is_area_key_value("marble_land=landmass"));
        assert!(rules.is_area_tag("leisure", "park"));
        assert!(!rules.is_area_key_value("highway=residential"));
        assert!(!rules.is_area_key_value("building=no"));
    }

    #[test]
    fn custom_rules() {
        let rules = AreaRules::new(["landuse=forest", "landuse=meadow", "area=yes", "broken"]);
        assert_eq!(rules.len(), 3);
        assert!(rules.is_area_tag("landuse", "meadow"));
        assert!(!rules.is_area_tag("landuse", "residential"));
        assert!(!rules.is_area_key_value("broken"));
        assert!(!rules.is_area_key_value("landuse"));
    }

    #[test]
    fn any_matching_tag_makes_an_area() {
        let rules = AreaRules::standard();
        let tags: TagSet = [("name", "Codru"), ("landuse", "forest")].into_iter().collect();
        assert!(rules.is_area(&tags));

        let tags: TagSet = [("highway", "footway"), ("name", "Loop")].into_iter().collect();
        assert!(!rules.is_area(&tags));
        assert!(!rules.is_area(&TagSet::new()));
    }

    #[test]
    fn global_is_initialized_once() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| AreaRules::global() as *const AreaRules as usize))
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
        assert!(AreaRules::global().is_area_key_value("natural=water"));
    }
}
