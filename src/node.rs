use std::collections::HashMap;

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::placemark::{Geometry, NodeReference, Placemark, PlacemarkSink};
use crate::registry::OsmId;
use crate::tags::TagSet;
use crate::{category, Outcome, ResolveContext};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Node {
    pub id: i64,
    /// x is longitude, y is latitude, in degrees.
    pub coord: Coord<f64>,
    pub altitude: Option<f64>,
    pub tags: TagSet,
}

impl Node {
    pub fn new(id: i64, lon: f64, lat: f64) -> Self {
        Node {
            id,
            coord: Coord { x: lon, y: lat },
            altitude: None,
            tags: TagSet::new(),
        }
    }

    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn reference(&self) -> NodeReference {
        NodeReference {
            id: self.id,
            coord: self.coord,
            tags: self.tags.clone(),
        }
    }

    /// Emits a point placemark for a node that describes a feature of its own.
    ///
    /// Untagged nodes only exist as way vertices and are skipped.
    pub fn resolve(&self, ctx: &ResolveContext, sink: &impl PlacemarkSink) -> Outcome {
        if self.tags.is_metadata_only() {
            return Outcome::Skipped;
        }

        let placemark = Placemark {
            id: OsmId::Node(self.id),
            category: ctx.categories.resolve(&self.tags),
            visible: category::should_render(&self.tags),
            name: self.tags.name().to_string(),
            geometry: Geometry::Point(Point(self.coord)),
            tags: self.tags.clone(),
            node_references: vec![self.reference()],
            ring_references: Vec::new(),
        };
        ctx.emit(OsmId::Node(self.id), placemark, sink)
    }
}

impl From<crate::osm::Node> for Node {
    fn from(value: crate::osm::Node) -> Self {
        Node {
            id: value.id,
            coord: Coord {
                x: value.lon,
                y: value.lat,
            },
            altitude: value.ele,
            tags: value.tag.into(),
        }
    }
}

/// Node lookup table, filled during the node phase and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    nodes: HashMap<i64, Node>,
}

impl NodeTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Inserts `node` unless its id is already present. Returns `true` if it
    /// was inserted.
    pub fn insert(&mut self, node: Node) -> bool {
        match self.nodes.entry(node.id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(node);
                true
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub(crate) fn as_map(&self) -> &HashMap<i64, Node> {
        &self.nodes
    }
}

impl FromIterator<Node> for NodeTable {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut table = NodeTable::new();
        for node in iter {
            table.insert(node);
        }
        table
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AreaRules, Category, CategoryRules, Document, Optimizer, Registry};

    #[test]
    fn first_insert_wins() {
        let mut table = NodeTable::new();
        assert!(table.insert(Node::new(1, 28.8, 47.0)));
        assert!(!table.insert(Node::new(1, 0.0, 0.0)));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1).unwrap().coord, Coord { x: 28.8, y: 47.0 });
        assert!(table.get(2).is_none());
    }

    #[test]
    fn tagged_node_becomes_point() {
        let (areas, categories, registry) =
            (AreaRules::standard(), CategoryRules::standard(), Registry::new());
        let ctx = ResolveContext::new(&areas, &categories, &registry, Optimizer::default());
        let document = Document::new();

        let signals = Node::new(5, 28.83, 47.02)
            .with_tags([("highway", "traffic_signals")].into_iter().collect());
        assert_eq!(signals.resolve(&ctx, &document), Outcome::Emitted);
        assert_eq!(signals.resolve(&ctx, &document), Outcome::Duplicate);

        let placemarks = document.into_placemarks();
        assert_eq!(placemarks.len(), 1);
        assert_eq!(placemarks[0].category, Category::HighwayTrafficSignals);
        assert_eq!(
            placemarks[0].geometry,
            Geometry::Point(Point::new(28.83, 47.02))
        );
    }

    #[test]
    fn vertex_only_nodes_are_skipped() {
        let (areas, categories, registry) =
            (AreaRules::standard(), CategoryRules::standard(), Registry::new());
        let ctx = ResolveContext::new(&areas, &categories, &registry, Optimizer::default());
        let document = Document::new();

        let plain = Node::new(1, 28.8, 47.0);
        let edited = Node::new(2, 28.8, 47.0)
            .with_tags([("created_by", "JOSM")].into_iter().collect());
        assert_eq!(plain.resolve(&ctx, &document), Outcome::Skipped);
        assert_eq!(edited.resolve(&ctx, &document), Outcome::Skipped);
        assert!(document.is_empty());
        assert!(registry.is_empty());
    }
}
