use std::collections::HashMap;

use geo::LineString;
use serde::{Deserialize, Serialize};

use crate::node::NodeTable;
use crate::placemark::{Geometry, NodeReference, Placemark, PlacemarkSink};
use crate::registry::OsmId;
use crate::tags::TagSet;
use crate::{category, Outcome, ResolveContext};

/// Ways by id, read-only while relations are resolved.
pub type WayTable = HashMap<i64, Way>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Way {
    pub id: i64,
    /// Node ids in order. A ring repeats its first id at the end.
    pub references: Vec<i64>,
    pub tags: TagSet,
}

impl Way {
    pub fn new(id: i64, references: Vec<i64>) -> Self {
        Way {
            id,
            references,
            tags: TagSet::new(),
        }
    }

    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn add_reference(&mut self, id: i64) {
        self.references.push(id);
    }

    pub fn is_closed(&self) -> bool {
        self.references.len() > 2 && self.references.first() == self.references.last()
    }

    /// Looks up every referenced node. Returns the first missing id on failure.
    pub(crate) fn resolve_references(&self, nodes: &NodeTable) -> Result<Vec<NodeReference>, i64> {
        self.references
            .iter()
            .map(|&id| nodes.get(id).map(|node| node.reference()).ok_or(id))
            .collect()
    }

    /// Turns the way into a placemark and appends it to `sink`.
    ///
    /// If any referenced node is missing, nothing is emitted and the registry
    /// is left untouched: a way cut at a tile border would be drawn with the
    /// wrong shape.
    pub fn resolve(
        &self,
        nodes: &NodeTable,
        ctx: &ResolveContext,
        sink: &impl PlacemarkSink,
    ) -> Outcome {
        if self.references.is_empty() {
            return Outcome::Skipped;
        }

        let visible = category::should_render(&self.tags);
        let category = ctx.categories.resolve(&self.tags);
        let is_area = ctx.area_rules.is_area(&self.tags);

        let node_references = match self.resolve_references(nodes) {
            Ok(references) => references,
            Err(missing) => return Outcome::Dangling { missing },
        };

        let coords: LineString<f64> = node_references.iter().map(|r| r.coord).collect();
        let geometry = if is_area {
            let ring = ctx.optimizer.optimize_ring(coords);
            assert!(ring.is_closed(), "way {} resolved to an open ring", self.id);
            Geometry::LinearRing(ring)
        } else {
            Geometry::LineString(ctx.optimizer.optimize_path(coords))
        };

        let placemark = Placemark {
            id: OsmId::Way(self.id),
            category,
            visible,
            name: self.tags.name().to_string(),
            geometry,
            tags: self.tags.clone(),
            node_references,
            ring_references: Vec::new(),
        };
        ctx.emit(OsmId::Way(self.id), placemark, sink)
    }
}

impl From<crate::osm::Way> for Way {
    fn from(value: crate::osm::Way) -> Self {
        Way {
            id: value.id,
            references: value.nd.into_iter().map(|nd| nd.reference).collect(),
            tags: value.tag.into(),
        }
    }
}
