//! Parsed OSM records as they come out of the XML/CBOR readers.
//!
//! Field names follow the OSM XML layout so that `quick_xml::de` can read an
//! `.osm` file directly into [`Osm`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Node {
    #[serde(rename = "@id")]
    pub id: i64,
    #[serde(rename = "@lat")]
    pub lat: f64,
    #[serde(rename = "@lon")]
    pub lon: f64,
    #[serde(rename = "@ele", default, skip_serializing_if = "Option::is_none")]
    pub ele: Option<f64>,
    #[serde(default)]
    pub tag: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Nd {
    #[serde(rename = "@ref")]
    pub reference: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tag {
    #[serde(rename = "@k")]
    pub k: String,
    #[serde(rename = "@v")]
    pub v: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Way {
    #[serde(rename = "@id")]
    pub id: i64,
    #[serde(default)]
    pub nd: Vec<Nd>,
    #[serde(default)]
    pub tag: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Member {
    #[serde(rename = "@type")]
    pub member_type: String,
    #[serde(rename = "@ref")]
    pub member_ref: i64,
    #[serde(rename = "@role", default)]
    pub role: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Relation {
    #[serde(rename = "@id")]
    pub id: i64,
    #[serde(default)]
    pub member: Vec<Member>,
    #[serde(default)]
    pub tag: Vec<Tag>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Osm {
    #[serde(default)]
    pub node: Vec<Node>,
    #[serde(default)]
    pub way: Vec<Way>,
    #[serde(default)]
    pub relation: Vec<Relation>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_osm_xml() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="test">
  <bounds minlat="47.0" minlon="28.8" maxlat="47.1" maxlon="28.9"/>
  <node id="1" lat="47.01" lon="28.81" version="3"/>
  <node id="2" lat="47.02" lon="28.82">
    <tag k="highway" v="traffic_signals"/>
  </node>
  <way id="10">
    <nd ref="1"/>
    <nd ref="2"/>
    <tag k="highway" v="residential"/>
    <tag k="name" v="Strada Test"/>
  </way>
  <relation id="100">
    <member type="way" ref="10" role="outer"/>
    <member type="node" ref="2" role=""/>
    <tag k="type" v="multipolygon"/>
  </relation>
</osm>"#;
        let osm: Osm = quick_xml::de::from_str(xml).unwrap();

        assert_eq!(osm.node.len(), 2);
        assert!(osm.node[0].tag.is_empty());
        assert_eq!(osm.node[1].tag[0].v, "traffic_signals");
        assert_eq!(osm.way[0].nd.iter().map(|nd| nd.reference).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(osm.way[0].tag.len(), 2);
        assert_eq!(osm.relation[0].member[0].role, "outer");
        assert_eq!(osm.relation[0].member[1].member_type, "node");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let osm: Osm = quick_xml::de::from_str(r#"<osm><node id="5" lat="1.0" lon="2.0"/></osm>"#).unwrap();
        assert_eq!(osm.node.len(), 1);
        assert!(osm.way.is_empty());
        assert!(osm.relation.is_empty());
    }
}
