use std::sync::mpsc::SyncSender;

use geo::{Coord, GeometryCollection, LineString, MultiPolygon, Point};
use log::warn;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::registry::OsmId;
use crate::relation::RingRole;
use crate::tags::TagSet;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum Geometry {
    Point(Point<f64>),
    LineString(LineString<f64>),
    /// Closed ring: first and last coordinate are equal.
    LinearRing(LineString<f64>),
    MultiPolygon(MultiPolygon<f64>),
    Collection(GeometryCollection<f64>),
}

impl Geometry {
    pub fn is_area(&self) -> bool {
        matches!(self, Geometry::LinearRing(_) | Geometry::MultiPolygon(_))
    }
}

/// A resolved vertex: the node it came from, where it is, and its tags.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeReference {
    pub id: i64,
    pub coord: Coord<f64>,
    pub tags: TagSet,
}

/// One assembled ring of a multipolygon relation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RingReference {
    pub role: RingRole,
    pub ways: Vec<i64>,
    pub nodes: Vec<NodeReference>,
}

/// Output record handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Placemark {
    pub id: OsmId,
    pub category: Category,
    pub visible: bool,
    pub name: String,
    pub geometry: Geometry,
    pub tags: TagSet,
    pub node_references: Vec<NodeReference>,
    pub ring_references: Vec<RingReference>,
}

/// Destination of resolved placemarks. Order of appends is not significant.
pub trait PlacemarkSink {
    /// Hands `placemark` over. Returns `false` if it could not be delivered.
    fn append(&self, placemark: Placemark) -> bool;
}

/// Placemark collection that can be appended to from several threads.
#[derive(Debug, Default)]
pub struct Document {
    placemarks: Mutex<Vec<Placemark>>,
}

impl Document {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.placemarks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_placemarks(self) -> Vec<Placemark> {
        self.placemarks.into_inner()
    }
}

impl PlacemarkSink for Document {
    fn append(&self, placemark: Placemark) -> bool {
        self.placemarks.lock().push(placemark);
        true
    }
}

impl PlacemarkSink for SyncSender<Placemark> {
    fn append(&self, placemark: Placemark) -> bool {
        match self.send(placemark) {
            Ok(()) => true,
            Err(e) => {
                warn!("placemark receiver is gone, dropping {}", e.0.id);
                false
            }
        }
    }
}
