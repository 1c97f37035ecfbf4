//! Rendering categories and the ordered rule table that assigns them.
//!
//! Rule order is behaviour: the first matching rule wins, so moving a rule
//! changes which category a tag set resolves to. Bump [`RULES_VERSION`]
//! whenever the table changes.

use serde::{Deserialize, Serialize};

use crate::tags::TagSet;

pub const RULES_VERSION: u32 = 1;

/// Values of the `building` key that are drawn as buildings.
pub const BUILDING_VALUES: &[&str] = &[
    "yes",
    "house",
    "residential",
    "apartments",
    "detached",
    "semidetached_house",
    "terrace",
    "bungalow",
    "cabin",
    "dormitory",
    "farm",
    "hotel",
    "commercial",
    "industrial",
    "office",
    "retail",
    "supermarket",
    "warehouse",
    "kiosk",
    "public",
    "civic",
    "government",
    "hospital",
    "school",
    "university",
    "college",
    "kindergarten",
    "train_station",
    "transportation",
    "church",
    "cathedral",
    "chapel",
    "mosque",
    "synagogue",
    "temple",
    "shrine",
    "religious",
    "stadium",
    "sports_hall",
    "barn",
    "cowshed",
    "farm_auxiliary",
    "greenhouse",
    "stable",
    "garage",
    "garages",
    "carport",
    "parking",
    "shed",
    "hut",
    "roof",
    "service",
    "construction",
    "ruins",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Category {
    Default,

    Landmass,
    Settlement,
    AdminLevel(u8),

    HighwayMotorway,
    HighwayMotorwayLink,
    HighwayTrunk,
    HighwayTrunkLink,
    HighwayPrimary,
    HighwayPrimaryLink,
    HighwaySecondary,
    HighwaySecondaryLink,
    HighwayTertiary,
    HighwayTertiaryLink,
    HighwayUnclassified,
    HighwayResidential,
    HighwayLivingStreet,
    HighwayService,
    HighwayPedestrian,
    HighwayTrack,
    HighwayFootway,
    HighwayCycleway,
    HighwayPath,
    HighwaySteps,
    HighwayRoad,
    HighwayTrafficSignals,
    HighwayBusStop,
    HighwayUnknown,

    RailwayRail,
    RailwayNarrowGauge,
    RailwayTram,
    RailwaySubway,
    RailwayLightRail,
    RailwayStation,
    RailwayAbandoned,
    RailwayUnknown,

    WaterwayRiver,
    WaterwayStream,
    WaterwayCanal,
    WaterwayDrain,
    WaterwayDitch,
    WaterwayUnknown,

    Building,

    AmenityParking,
    AmenityBicycleParking,
    AmenityHospital,
    AmenitySchool,
    AmenityCollege,
    AmenityUniversity,
    AmenityGraveyard,
    AmenityRestaurant,
    AmenityCafe,
    AmenityPub,
    AmenityFuel,
    AmenityPharmacy,
    AmenityUnknown,

    LeisurePark,
    LeisureGarden,
    LeisureCommon,
    LeisurePlayground,
    LeisurePitch,
    LeisureGolfCourse,
    LeisureSportsCentre,
    LeisureStadium,
    LeisureSwimmingPool,
    LeisureTrack,

    LanduseAllotments,
    LanduseBasin,
    LanduseBrownfield,
    LanduseCemetery,
    LanduseCommercial,
    LanduseConstruction,
    LanduseFarmland,
    LanduseFarmyard,
    LanduseForest,
    LanduseGarages,
    LanduseGrass,
    LanduseGreenfield,
    LanduseIndustrial,
    LanduseLandfill,
    LanduseMeadow,
    LanduseMilitary,
    LanduseOrchard,
    LanduseQuarry,
    LanduseRailway,
    LanduseReservoir,
    LanduseResidential,
    LanduseRetail,
    LanduseVineyard,

    NaturalWater,
    NaturalWood,
    NaturalBeach,
    NaturalWetland,
    NaturalGlacier,
    NaturalScrub,
    NaturalCliff,
    NaturalPeak,
    NaturalTree,

    ManMadeBridge,
    MilitaryDangerArea,

    PlaceCity,
    PlaceTown,
    PlaceVillage,
    PlaceHamlet,
    PlaceSuburb,
    PlaceLocality,

    RouteRoad,
    RouteBus,
    RouteTrain,
    RouteBicycle,
    RouteHiking,
    RouteUnknown,
}

/// Condition on a tag set.
#[derive(Debug, Clone)]
pub enum Predicate {
    Tag(&'static str, &'static str),
    Key(&'static str),
    All(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn matches(&self, tags: &TagSet) -> bool {
        match self {
            Predicate::Tag(k, v) => tags.contains(k, v),
            Predicate::Key(k) => tags.contains_key(k),
            Predicate::All(all) => all.iter().all(|p| p.matches(tags)),
            Predicate::Not(p) => !p.matches(tags),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub predicate: Predicate,
    pub category: Category,
}

/// Ordered rule table; the first matching rule decides the category.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<Rule>,
}

impl CategoryRules {
    pub fn new(rules: Vec<Rule>) -> Self {
        CategoryRules { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Resolves `tags` to a category. Falls back to [`Category::Default`].
    pub fn resolve(&self, tags: &TagSet) -> Category {
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(tags))
            .map(|rule| rule.category)
            .unwrap_or(Category::Default)
    }

    pub fn standard() -> Self {
        use Category::*;
        use Predicate::{Key, Tag};

        let mut rules = Vec::new();
        let mut push = |predicate: Predicate, category: Category| {
            rules.push(Rule {
                predicate,
                category,
            })
        };

        push(Tag("marble_land", "landmass"), Landmass);
        push(Tag("settlement", "yes"), Settlement);

        for level in 1..=11u8 {
            let value: &'static str = ADMIN_LEVELS[usize::from(level) - 1];
            push(
                Predicate::All(vec![
                    Tag("boundary", "administrative"),
                    Tag("admin_level", value),
                ]),
                AdminLevel(level),
            );
        }

        for (value, category) in [
            ("traffic_signals", HighwayTrafficSignals),
            ("bus_stop", HighwayBusStop),
            ("motorway", HighwayMotorway),
            ("motorway_link", HighwayMotorwayLink),
            ("trunk", HighwayTrunk),
            ("trunk_link", HighwayTrunkLink),
            ("primary", HighwayPrimary),
            ("primary_link", HighwayPrimaryLink),
            ("secondary", HighwaySecondary),
            ("secondary_link", HighwaySecondaryLink),
            ("tertiary", HighwayTertiary),
            ("tertiary_link", HighwayTertiaryLink),
            ("unclassified", HighwayUnclassified),
            ("residential", HighwayResidential),
            ("living_street", HighwayLivingStreet),
            ("service", HighwayService),
            ("pedestrian", HighwayPedestrian),
            ("track", HighwayTrack),
            ("footway", HighwayFootway),
            ("cycleway", HighwayCycleway),
            ("path", HighwayPath),
            ("steps", HighwaySteps),
            ("road", HighwayRoad),
        ] {
            push(Tag("highway", value), category);
        }
        push(Key("highway"), HighwayUnknown);

        for (value, category) in [
            ("rail", RailwayRail),
            ("narrow_gauge", RailwayNarrowGauge),
            ("tram", RailwayTram),
            ("subway", RailwaySubway),
            ("light_rail", RailwayLightRail),
            ("station", RailwayStation),
            ("abandoned", RailwayAbandoned),
        ] {
            push(Tag("railway", value), category);
        }
        push(Key("railway"), RailwayUnknown);

        push(Tag("waterway", "riverbank"), NaturalWater);
        for (value, category) in [
            ("river", WaterwayRiver),
            ("stream", WaterwayStream),
            ("canal", WaterwayCanal),
            ("drain", WaterwayDrain),
            ("ditch", WaterwayDitch),
        ] {
            push(Tag("waterway", value), category);
        }
        push(Key("waterway"), WaterwayUnknown);

        push(
            Predicate::All(vec![
                Key("building"),
                Predicate::Not(Box::new(Tag("building", "no"))),
            ]),
            Building,
        );

        for (value, category) in [
            ("parking", AmenityParking),
            ("parking_space", AmenityParking),
            ("bicycle_parking", AmenityBicycleParking),
            ("hospital", AmenityHospital),
            ("school", AmenitySchool),
            ("college", AmenityCollege),
            ("university", AmenityUniversity),
            ("graveyard", AmenityGraveyard),
            ("restaurant", AmenityRestaurant),
            ("cafe", AmenityCafe),
            ("pub", AmenityPub),
            ("fuel", AmenityFuel),
            ("pharmacy", AmenityPharmacy),
        ] {
            push(Tag("amenity", value), category);
        }

        for (value, category) in [
            ("park", LeisurePark),
            ("garden", LeisureGarden),
            ("common", LeisureCommon),
            ("playground", LeisurePlayground),
            ("pitch", LeisurePitch),
            ("golf_course", LeisureGolfCourse),
            ("sports_centre", LeisureSportsCentre),
            ("stadium", LeisureStadium),
            ("swimming_pool", LeisureSwimmingPool),
            ("track", LeisureTrack),
        ] {
            push(Tag("leisure", value), category);
        }

        for (value, category) in [
            ("allotments", LanduseAllotments),
            ("basin", LanduseBasin),
            ("brownfield", LanduseBrownfield),
            ("cemetery", LanduseCemetery),
            ("commercial", LanduseCommercial),
            ("construction", LanduseConstruction),
            ("farm", LanduseFarmland),
            ("farmland", LanduseFarmland),
            ("farmyard", LanduseFarmyard),
            ("forest", LanduseForest),
            ("garages", LanduseGarages),
            ("grass", LanduseGrass),
            ("greenfield", LanduseGreenfield),
            ("industrial", LanduseIndustrial),
            ("landfill", LanduseLandfill),
            ("meadow", LanduseMeadow),
            ("military", LanduseMilitary),
            ("orchard", LanduseOrchard),
            ("quarry", LanduseQuarry),
            ("railway", LanduseRailway),
            ("reservoir", LanduseReservoir),
            ("residential", LanduseResidential),
            ("retail", LanduseRetail),
            ("vineyard", LanduseVineyard),
        ] {
            push(Tag("landuse", value), category);
        }

        for (value, category) in [
            ("water", NaturalWater),
            ("wood", NaturalWood),
            ("beach", NaturalBeach),
            ("wetland", NaturalWetland),
            ("glacier", NaturalGlacier),
            ("scrub", NaturalScrub),
            ("cliff", NaturalCliff),
            ("peak", NaturalPeak),
            ("tree", NaturalTree),
        ] {
            push(Tag("natural", value), category);
        }

        push(Tag("man_made", "bridge"), ManMadeBridge);
        push(Tag("military", "danger_area"), MilitaryDangerArea);

        for (value, category) in [
            ("city", PlaceCity),
            ("town", PlaceTown),
            ("village", PlaceVillage),
            ("hamlet", PlaceHamlet),
            ("suburb", PlaceSuburb),
            ("locality", PlaceLocality),
        ] {
            push(Tag("place", value), category);
        }

        for (value, category) in [
            ("road", RouteRoad),
            ("bus", RouteBus),
            ("train", RouteTrain),
            ("bicycle", RouteBicycle),
            ("hiking", RouteHiking),
        ] {
            push(Tag("route", value), category);
        }
        push(Key("route"), RouteUnknown);

        push(Key("amenity"), AmenityUnknown);

        CategoryRules::new(rules)
    }
}

const ADMIN_LEVELS: [&str; 11] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"];

/// Whether a primitive with these tags should be drawn.
///
/// Postal code boundaries and features that no longer exist are kept in the
/// data but hidden.
pub fn should_render(tags: &TagSet) -> bool {
    !tags.contains("boundary", "postal_code")
        && !tags.contains_key("closed:highway")
        && !tags.contains_key("abandoned:highway")
        && !tags.contains_key("abandoned:natural")
        && !tags.contains_key("abandoned:building")
        && !tags.contains_key("abandoned:leisure")
        && !tags.contains_key("disused:highway")
        && !tags.contains("highway", "razed")
}

#[cfg(test)]
mod test {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> TagSet {
        pairs.iter().copied().collect()
    }

    #[test]
    fn resolves_road_classes() {
        let rules = CategoryRules::standard();
        assert_eq!(
            rules.resolve(&tags(&[("highway", "residential")])),
            Category::HighwayResidential
        );
        assert_eq!(
            rules.resolve(&tags(&[("highway", "motorway_link")])),
            Category::HighwayMotorwayLink
        );
        assert_eq!(
            rules.resolve(&tags(&[("highway", "proposed")])),
            Category::HighwayUnknown
        );
    }

    #[test]
    fn unmatched_tags_fall_back_to_default() {
        let rules = CategoryRules::standard();
        assert_eq!(rules.resolve(&TagSet::new()), Category::Default);
        assert_eq!(rules.resolve(&tags(&[("name", "Nowhere")])), Category::Default);
        assert_eq!(rules.resolve(&tags(&[("building", "no")])), Category::Default);
    }

    #[test]
    fn building_takes_precedence_over_amenity() {
        let rules = CategoryRules::standard();
        assert_eq!(
            rules.resolve(&tags(&[("amenity", "school"), ("building", "yes")])),
            Category::Building
        );
        assert_eq!(
            rules.resolve(&tags(&[("amenity", "school")])),
            Category::AmenitySchool
        );
    }

    #[test]
    fn resolution_ignores_tag_order() {
        let rules = CategoryRules::standard();
        let a = tags(&[("landuse", "forest"), ("highway", "track"), ("name", "x")]);
        let b = tags(&[("name", "x"), ("highway", "track"), ("landuse", "forest")]);
        assert_eq!(rules.resolve(&a), rules.resolve(&b));
        assert_eq!(rules.resolve(&a), Category::HighwayTrack);
    }

    #[test]
    fn admin_boundaries_need_a_level() {
        let rules = CategoryRules::standard();
        assert_eq!(
            rules.resolve(&tags(&[("boundary", "administrative"), ("admin_level", "4")])),
            Category::AdminLevel(4)
        );
        assert_eq!(
            rules.resolve(&tags(&[("boundary", "administrative")])),
            Category::Default
        );
    }

    #[test]
    fn hidden_features() {
        assert!(should_render(&tags(&[("highway", "residential")])));
        assert!(!should_render(&tags(&[("highway", "razed")])));
        assert!(!should_render(&tags(&[("boundary", "postal_code")])));
        assert!(!should_render(&tags(&[("abandoned:building", "yes")])));
        assert!(!should_render(&tags(&[("closed:highway", "construction")])));
        assert!(!should_render(&tags(&[("disused:highway", "service")])));
        assert!(should_render(&tags(&[("disused:railway", "rail")])));
    }
}
