//! Reading datasets and writing resolved placemarks.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use ciborium::{from_reader, into_writer};
use log::info;

use crate::error::Result;
use crate::osm::Osm;
use crate::placemark::Placemark;

/// Reads an `.osm` XML file.
pub fn load_xml(path: &Path) -> Result<Osm> {
    let start = Instant::now();
    let buffer = BufReader::new(File::open(path)?);
    let osm: Osm = quick_xml::de::from_reader(buffer)?;
    info!("read {} in {:?}", path.display(), start.elapsed());
    Ok(osm)
}

/// Reads a CBOR snapshot written by [`save_cbor`].
pub fn load_cbor(path: &Path) -> Result<Osm> {
    let start = Instant::now();
    let osm: Osm = from_reader(BufReader::new(File::open(path)?))?;
    info!("read {} in {:?}", path.display(), start.elapsed());
    Ok(osm)
}

/// Reads XML for `.osm`/`.xml` files and a CBOR snapshot otherwise.
pub fn load(path: &Path) -> Result<Osm> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("osm") | Some("xml") => load_xml(path),
        _ => load_cbor(path),
    }
}

pub fn save_cbor(osm: &Osm, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    into_writer(osm, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn save_placemarks(placemarks: &[Placemark], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    into_writer(placemarks, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn load_placemarks(path: &Path) -> Result<Vec<Placemark>> {
    Ok(from_reader(BufReader::new(File::open(path)?))?)
}
