pub mod area;
pub mod category;
pub mod config;
pub mod dataset;
pub mod error;
pub mod io;
pub mod node;
pub mod optimize;
pub mod osm;
pub mod placemark;
pub mod registry;
pub mod relation;
pub mod tags;
pub mod way;

pub use area::AreaRules;
pub use category::{should_render, Category, CategoryRules};
pub use config::ResolverConfig;
pub use dataset::{Dataset, Stats};
pub use error::{Error, Result};
pub use node::{Node, NodeTable};
pub use optimize::Optimizer;
pub use placemark::{Document, Geometry, NodeReference, Placemark, PlacemarkSink};
pub use registry::{OsmId, Registry};
pub use relation::{Member, MemberKind, Relation};
pub use tags::TagSet;
pub use way::Way;

/// Result of resolving a single primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A placemark was appended to the output.
    Emitted,
    /// A referenced node or member is not loaded; nothing was emitted.
    Dangling { missing: i64 },
    /// All references resolved but the members do not form closed rings.
    Incomplete,
    /// The id was registered before; the record was not appended again.
    Duplicate,
    /// Nothing to draw for this primitive, or the sink refused it.
    Skipped,
}

/// Read-only state shared by all resolvers during a pass.
pub struct ResolveContext<'a> {
    pub area_rules: &'a AreaRules,
    pub categories: &'a CategoryRules,
    pub registry: &'a Registry,
    pub optimizer: Optimizer,
    /// Skip untagged ways that a multipolygon already draws.
    pub suppress_multipolygon_members: bool,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        area_rules: &'a AreaRules,
        categories: &'a CategoryRules,
        registry: &'a Registry,
        optimizer: Optimizer,
    ) -> Self {
        ResolveContext {
            area_rules,
            categories,
            registry,
            optimizer,
            suppress_multipolygon_members: true,
        }
    }

    pub fn with_member_suppression(mut self, suppress: bool) -> Self {
        self.suppress_multipolygon_members = suppress;
        self
    }

    /// Registers `id` and appends `placemark` if the id was not seen before.
    ///
    /// If the sink refuses the placemark the id is released again and the
    /// primitive counts as skipped.
    pub(crate) fn emit(&self, id: OsmId, placemark: Placemark, sink: &impl PlacemarkSink) -> Outcome {
        if !self.registry.register(id) {
            return Outcome::Duplicate;
        }
        if !sink.append(placemark) {
            self.registry.release(id);
            return Outcome::Skipped;
        }
        Outcome::Emitted
    }
}
