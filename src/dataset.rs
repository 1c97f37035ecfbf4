use std::collections::HashSet;
use std::fmt;
use std::ops::{Add, AddAssign};
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

use crate::category::Category;
use crate::node::{Node, NodeTable};
use crate::osm::Osm;
use crate::placemark::PlacemarkSink;
use crate::relation::Relation;
use crate::way::{Way, WayTable};
use crate::{Outcome, ResolveContext};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub emitted: usize,
    pub dangling: usize,
    pub incomplete: usize,
    pub duplicate: usize,
    pub skipped: usize,
}

impl Counts {
    fn record(outcome: Outcome) -> Self {
        let mut counts = Counts::default();
        match outcome {
            Outcome::Emitted => counts.emitted += 1,
            Outcome::Dangling { .. } => counts.dangling += 1,
            Outcome::Incomplete => counts.incomplete += 1,
            Outcome::Duplicate => counts.duplicate += 1,
            Outcome::Skipped => counts.skipped += 1,
        }
        counts
    }
}

impl AddAssign for Counts {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.emitted += other.emitted;
        self.dangling += other.dangling;
        self.incomplete += other.incomplete;
        self.duplicate += other.duplicate;
        self.skipped += other.skipped;
    }
}

impl Add for Counts {
    type Output = Counts;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

/// Outcomes of one resolution run, per primitive kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub nodes: Counts,
    pub ways: Counts,
    pub relations: Counts,
}

impl AddAssign for Stats {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.nodes += other.nodes;
        self.ways += other.ways;
        self.relations += other.relations;
    }
}

impl Stats {
    pub fn emitted(&self) -> usize {
        self.nodes.emitted + self.ways.emitted + self.relations.emitted
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            r#"Emitted:
  nodes:        {}
  ways:         {}
  relations:    {}
Dropped (dangling references):
  ways:         {}
  relations:    {}
Dropped (open rings):
  relations:    {}
Duplicates:     {}
Skipped:        {}"#,
            self.nodes.emitted,
            self.ways.emitted,
            self.relations.emitted,
            self.ways.dangling,
            self.relations.dangling,
            self.relations.incomplete,
            self.nodes.duplicate + self.ways.duplicate + self.relations.duplicate,
            self.nodes.skipped + self.ways.skipped + self.relations.skipped,
        )
    }
}

/// All primitives of one import batch.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub nodes: NodeTable,
    pub ways: WayTable,
    pub relations: Vec<Relation>,
}

impl From<Osm> for Dataset {
    fn from(osm: Osm) -> Self {
        let nodes: NodeTable = osm.node.into_iter().map(Node::from).collect();
        let mut ways = WayTable::with_capacity(osm.way.len());
        for way in osm.way.into_iter().map(Way::from) {
            ways.entry(way.id).or_insert(way);
        }
        let relations = osm.relation.into_iter().map(Relation::from).collect();
        Dataset {
            nodes,
            ways,
            relations,
        }
    }
}

impl Dataset {
    /// Resolves every primitive in parallel and appends the placemarks to
    /// `sink`.
    ///
    /// Relations go first so that untagged ways which only outline a
    /// multipolygon can be skipped in the way pass.
    pub fn resolve<S>(&self, ctx: &ResolveContext, sink: &S) -> Stats
    where
        S: PlacemarkSink + Sync,
    {
        let mut stats = Stats::default();

        let start = Instant::now();
        let (relations, consumed): (Counts, HashSet<i64>) = self
            .relations
            .par_iter()
            .map(|relation| {
                let outcome = relation.resolve(&self.nodes, &self.ways, ctx, sink);
                if let Outcome::Dangling { missing } = outcome {
                    debug!("relation {} dropped, member {} not loaded", relation.id, missing);
                }
                // a duplicate was drawn by an earlier batch, its members are still covered
                let drawn = matches!(outcome, Outcome::Emitted | Outcome::Duplicate);
                let consumed: HashSet<i64> = if drawn && relation.is_multipolygon() {
                    relation.ring_members().map(|(_, id)| id).collect()
                } else {
                    HashSet::new()
                };
                (Counts::record(outcome), consumed)
            })
            .reduce(
                || (Counts::default(), HashSet::new()),
                |(a, mut a_ids), (b, b_ids)| {
                    a_ids.extend(b_ids);
                    (a + b, a_ids)
                },
            );
        stats.relations = relations;
        info!("resolved {} relations in {:?}", self.relations.len(), start.elapsed());

        let start = Instant::now();
        stats.ways = self
            .ways
            .par_iter()
            .map(|(id, way)| {
                if ctx.suppress_multipolygon_members
                    && consumed.contains(id)
                    && ctx.categories.resolve(&way.tags) == Category::Default
                {
                    return Counts::record(Outcome::Skipped);
                }
                let outcome = way.resolve(&self.nodes, ctx, sink);
                if let Outcome::Dangling { missing } = outcome {
                    debug!("way {} dropped, node {} not loaded", id, missing);
                }
                Counts::record(outcome)
            })
            .reduce(Counts::default, |a, b| a + b);
        info!("resolved {} ways in {:?}", self.ways.len(), start.elapsed());

        let start = Instant::now();
        stats.nodes = self
            .nodes
            .as_map()
            .par_iter()
            .map(|(_, node)| Counts::record(node.resolve(ctx, sink)))
            .reduce(Counts::default, |a, b| a + b);
        info!("resolved {} nodes in {:?}", self.nodes.len(), start.elapsed());

        stats
    }
}
