//! Relations: multipolygon ring assembly and generic member collections.

use geo::{Contains, GeometryCollection, LineString, MultiPolygon, Point, Polygon};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::category::{self, Category};
use crate::node::NodeTable;
use crate::placemark::{Geometry, NodeReference, Placemark, PlacemarkSink, RingReference};
use crate::registry::OsmId;
use crate::tags::TagSet;
use crate::way::WayTable;
use crate::{Outcome, ResolveContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MemberKind {
    Node,
    Way,
    Relation,
}

impl MemberKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "node" => Some(MemberKind::Node),
            "way" => Some(MemberKind::Way),
            "relation" => Some(MemberKind::Relation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    pub kind: MemberKind,
    pub reference: i64,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RingRole {
    Outer,
    Inner,
}

impl RingRole {
    /// Ring role of a way member. An empty role counts as outer.
    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "outer" | "" => Some(RingRole::Outer),
            "inner" => Some(RingRole::Inner),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Relation {
    pub id: i64,
    pub members: Vec<Member>,
    pub tags: TagSet,
}

/// A way's resolved vertices, waiting to be joined into a ring.
struct Segment {
    way: i64,
    nodes: Vec<NodeReference>,
}

impl Segment {
    fn first_id(&self) -> i64 {
        self.nodes[0].id
    }

    fn last_id(&self) -> i64 {
        self.nodes[self.nodes.len() - 1].id
    }
}

fn is_closed(nodes: &[NodeReference]) -> bool {
    nodes.len() >= 4 && nodes[0].id == nodes[nodes.len() - 1].id
}

/// Joins segments that share end nodes into closed rings, reversing segments
/// where needed. Returns `None` if some segment can't be closed into a ring.
fn assemble_rings(role: RingRole, mut pending: Vec<Segment>) -> Option<Vec<RingReference>> {
    let mut rings = Vec::new();
    while !pending.is_empty() {
        let first = pending.remove(0);
        let mut ways = vec![first.way];
        let mut nodes = first.nodes;

        while !is_closed(&nodes) {
            let tail = nodes[nodes.len() - 1].id;
            let pos = pending
                .iter()
                .position(|s| s.first_id() == tail || s.last_id() == tail)?;
            let mut next = pending.remove(pos);
            if next.first_id() != tail {
                next.nodes.reverse();
            }
            nodes.extend(next.nodes.into_iter().skip(1));
            ways.push(next.way);
        }

        rings.push(RingReference { role, ways, nodes });
    }
    Some(rings)
}

impl Relation {
    pub fn new(id: i64) -> Self {
        Relation {
            id,
            members: Vec::new(),
            tags: TagSet::new(),
        }
    }

    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn add_member(&mut self, kind: MemberKind, reference: i64, role: impl Into<String>) {
        self.members.push(Member {
            kind,
            reference,
            role: role.into(),
        });
    }

    /// Multipolygons and boundaries describe areas built from rings.
    pub fn is_multipolygon(&self) -> bool {
        self.tags.contains("type", "multipolygon") || self.tags.contains("type", "boundary")
    }

    /// Way members that take part in ring building, with their role.
    pub fn ring_members(&self) -> impl Iterator<Item = (RingRole, i64)> + '_ {
        self.members
            .iter()
            .filter(|m| m.kind == MemberKind::Way)
            .filter_map(|m| RingRole::parse(&m.role).map(|role| (role, m.reference)))
    }

    /// Builds one placemark from the relation's members.
    ///
    /// Like ways, a relation with any member that isn't loaded is dropped as a
    /// whole and leaves the registry untouched.
    pub fn resolve(
        &self,
        nodes: &NodeTable,
        ways: &WayTable,
        ctx: &ResolveContext,
        sink: &impl PlacemarkSink,
    ) -> Outcome {
        if self.is_multipolygon() {
            self.resolve_multipolygon(nodes, ways, ctx, sink)
        } else {
            self.resolve_collection(nodes, ways, ctx, sink)
        }
    }

    /// First node or way member, or node of a way member, that isn't loaded.
    /// Sub-relations are not expanded and never count as missing.
    fn first_missing_member(&self, nodes: &NodeTable, ways: &WayTable) -> Option<i64> {
        self.members.iter().find_map(|member| match member.kind {
            MemberKind::Node => (!nodes.contains(member.reference)).then_some(member.reference),
            MemberKind::Way => match ways.get(&member.reference) {
                Some(way) => way.references.iter().copied().find(|&id| !nodes.contains(id)),
                None => Some(member.reference),
            },
            MemberKind::Relation => None,
        })
    }

    fn resolve_multipolygon(
        &self,
        nodes: &NodeTable,
        ways: &WayTable,
        ctx: &ResolveContext,
        sink: &impl PlacemarkSink,
    ) -> Outcome {
        if let Some(missing) = self.first_missing_member(nodes, ways) {
            return Outcome::Dangling { missing };
        }

        let mut outer = Vec::new();
        let mut inner = Vec::new();
        for (role, way_id) in self.ring_members() {
            let Some(way) = ways.get(&way_id) else {
                return Outcome::Dangling { missing: way_id };
            };
            let vertices = match way.resolve_references(nodes) {
                Ok(vertices) => vertices,
                Err(missing) => return Outcome::Dangling { missing },
            };
            if vertices.len() < 2 {
                continue;
            }
            let segment = Segment {
                way: way_id,
                nodes: vertices,
            };
            match role {
                RingRole::Outer => outer.push(segment),
                RingRole::Inner => inner.push(segment),
            }
        }

        let first_outer_way = outer.first().map(|s| s.way);
        let (Some(outer), Some(inner)) = (
            assemble_rings(RingRole::Outer, outer),
            assemble_rings(RingRole::Inner, inner),
        ) else {
            debug!("relation {} has rings that don't close", self.id);
            return Outcome::Incomplete;
        };
        if outer.is_empty() {
            return Outcome::Incomplete;
        }

        let to_ring = |ring: &RingReference| -> LineString<f64> {
            ctx.optimizer
                .optimize_ring(ring.nodes.iter().map(|n| n.coord).collect())
        };
        let exteriors: Vec<LineString<f64>> = outer.iter().map(to_ring).collect();
        let shells: Vec<Polygon<f64>> = exteriors
            .iter()
            .map(|exterior| Polygon::new(exterior.clone(), vec![]))
            .collect();
        let mut interiors: Vec<Vec<LineString<f64>>> = vec![Vec::new(); exteriors.len()];
        for ring in &inner {
            let container = shells
                .iter()
                .position(|shell| ring.nodes.iter().any(|n| shell.contains(&n.coord)));
            match container {
                Some(idx) => interiors[idx].push(to_ring(ring)),
                None => debug!("relation {}: inner ring outside every outer ring", self.id),
            }
        }
        let polygons: MultiPolygon<f64> = exteriors
            .into_iter()
            .zip(interiors)
            .map(|(exterior, interiors)| Polygon::new(exterior, interiors))
            .collect();

        // old-style multipolygons keep their tags on the outer way
        let mut feature_tags = &self.tags;
        if ctx.categories.resolve(&self.tags) == Category::Default {
            if let Some(way) = first_outer_way.and_then(|id| ways.get(&id)) {
                feature_tags = &way.tags;
            }
        }

        let placemark = Placemark {
            id: OsmId::Relation(self.id),
            category: ctx.categories.resolve(feature_tags),
            visible: category::should_render(feature_tags),
            name: self.tags.name().to_string(),
            geometry: Geometry::MultiPolygon(polygons),
            tags: self.tags.clone(),
            node_references: Vec::new(),
            ring_references: outer.into_iter().chain(inner).collect(),
        };
        ctx.emit(OsmId::Relation(self.id), placemark, sink)
    }

    fn resolve_collection(
        &self,
        nodes: &NodeTable,
        ways: &WayTable,
        ctx: &ResolveContext,
        sink: &impl PlacemarkSink,
    ) -> Outcome {
        let mut parts = Vec::new();
        let mut node_references = Vec::new();
        for member in &self.members {
            match member.kind {
                MemberKind::Node => {
                    let Some(node) = nodes.get(member.reference) else {
                        return Outcome::Dangling {
                            missing: member.reference,
                        };
                    };
                    parts.push(geo::Geometry::Point(Point(node.coord)));
                    node_references.push(node.reference());
                }
                MemberKind::Way => {
                    let Some(way) = ways.get(&member.reference) else {
                        return Outcome::Dangling {
                            missing: member.reference,
                        };
                    };
                    let references = match way.resolve_references(nodes) {
                        Ok(references) => references,
                        Err(missing) => return Outcome::Dangling { missing },
                    };
                    let path = references.iter().map(|r| r.coord).collect();
                    parts.push(geo::Geometry::LineString(ctx.optimizer.optimize_path(path)));
                    node_references.extend(references);
                }
                MemberKind::Relation => {}
            }
        }
        if parts.is_empty() {
            return Outcome::Skipped;
        }

        let placemark = Placemark {
            id: OsmId::Relation(self.id),
            category: ctx.categories.resolve(&self.tags),
            visible: category::should_render(&self.tags),
            name: self.tags.name().to_string(),
            geometry: Geometry::Collection(GeometryCollection(parts)),
            tags: self.tags.clone(),
            node_references,
            ring_references: Vec::new(),
        };
        ctx.emit(OsmId::Relation(self.id), placemark, sink)
    }
}

impl From<crate::osm::Relation> for Relation {
    fn from(value: crate::osm::Relation) -> Self {
        let id = value.id;
        let members = value
            .member
            .into_iter()
            .filter_map(|m| match MemberKind::parse(&m.member_type) {
                Some(kind) => Some(Member {
                    kind,
                    reference: m.member_ref,
                    role: m.role,
                }),
                None => {
                    debug!("relation {}: unknown member type {:?}", id, m.member_type);
                    None
                }
            })
            .collect();
        Relation {
            id,
            members,
            tags: value.tag.into(),
        }
    }
}
