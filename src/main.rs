use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;
use osm_placemarks::{
    io, AreaRules, CategoryRules, Dataset, Document, Registry, ResolveContext, ResolverConfig,
};

/// Resolves OSM nodes, ways and relations into placemarks
#[derive(Debug, Parser)]
#[command(about, version)]
struct Args {
    /// OSM XML file (.osm) or CBOR snapshot written by `import`
    input: PathBuf,

    /// Where to write the resolved placemarks (CBOR)
    #[arg(short, long, default_value = "placemarks.bin")]
    output: PathBuf,

    /// Resolver configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ResolverConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ResolverConfig::default(),
    };
    config.init_thread_pool()?;

    let osm = io::load(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let dataset = Dataset::from(osm);
    info!(
        "loaded {} nodes, {} ways, {} relations",
        dataset.nodes.len(),
        dataset.ways.len(),
        dataset.relations.len()
    );

    let area_rules = AreaRules::global();
    let categories = CategoryRules::standard();
    let registry = Registry::new();
    let ctx = ResolveContext::new(area_rules, &categories, &registry, config.optimizer())
        .with_member_suppression(config.suppress_multipolygon_members);
    let document = Document::new();

    let start = Instant::now();
    let stats = dataset.resolve(&ctx, &document);
    info!("resolution finished in {:?}\n{}", start.elapsed(), stats);

    let placemarks = document.into_placemarks();
    io::save_placemarks(&placemarks, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("wrote {} placemarks to {}", placemarks.len(), args.output.display());

    Ok(())
}
