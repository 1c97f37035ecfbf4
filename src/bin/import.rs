use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;
use osm_placemarks::io;

/// Converts an OSM XML file into a CBOR snapshot for faster loading
#[derive(Debug, Parser)]
#[command(about)]
struct Args {
    /// OSM XML input
    input: PathBuf,

    /// CBOR snapshot output
    #[arg(default_value = "osm.bin")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let osm = io::load_xml(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    info!(
        "{} nodes, {} ways, {} relations",
        osm.node.len(),
        osm.way.len(),
        osm.relation.len()
    );

    io::save_cbor(&osm, &args.output).with_context(|| format!("writing {}", args.output.display()))?;
    info!("wrote {}", args.output.display());
    Ok(())
}
