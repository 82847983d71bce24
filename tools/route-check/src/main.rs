use anyhow::{bail, Context, Result};
use clap::Parser;
use route_integrity::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

mod input;
mod output;

use input::{read_config, read_relations};
use output::write_flags_geojson;

#[derive(Parser, Debug)]
#[command(
    name = "route-check",
    author,
    version,
    about = "Check transit route relations for track gaps and detached stops",
    long_about = "Reads route and route master relations from a JSON file and reports \
                  routes whose track cannot be chained into one continuous line, routes \
                  whose stops or platforms lie too far from the track, and route masters \
                  with missing, foreign or inconsistent members.\n\n\
                  Flags are printed as JSON to stdout, or written as GeoJSON with --output."
)]
struct Args {
    /// Input JSON file with a top-level "relations" array
    #[arg(short, long)]
    input: PathBuf,

    /// Check configuration JSON (threshold and public transport route types)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output GeoJSON file for flagged relations
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only check the relation with this ID
    #[arg(short, long)]
    relation: Option<i64>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("=== Route Integrity Check ===");
    log::info!("Input: {}", args.input.display());

    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let config = if let Some(config_path) = &args.config {
        log::info!("Config: {}", config_path.display());
        read_config(config_path).context("Failed to read check configuration")?
    } else {
        CheckConfig::default()
    };
    log::info!(
        "Proximity threshold: {}, public transport types: {}",
        config.proximity_threshold(),
        config.public_transport_types.join(", ")
    );

    // Phase 1: Load relations
    log::info!("");
    log::info!("Phase 1: Loading relations...");
    let relations = read_relations(&args.input).context("Failed to read relations")?;
    let provider = Arc::new(StaticRelationProvider::from_data(relations));
    log::info!("  {} distinct relations", provider.len());

    // Phase 2: Run the check
    log::info!("");
    log::info!("Phase 2: Checking relations...");
    let check = RouteRelationCheck::new(config, provider.clone())
        .context("Invalid check configuration")?;

    let flags = match args.relation {
        Some(id) => {
            let relation = provider.require_relation(RelationIdentifier::new(id))?;
            check.flag(relation.as_ref()).into_iter().collect()
        }
        None => check.run(),
    };

    for flag in &flags {
        for instruction in flag.instructions() {
            log::warn!("  {}", instruction);
        }
    }

    // Phase 3: Output
    log::info!("");
    log::info!("Phase 3: Writing output...");
    if let Some(output_path) = &args.output {
        write_flags_geojson(&flags, provider.as_ref(), output_path)
            .context("Failed to write flags GeoJSON")?;
    } else {
        let json = serde_json::to_string_pretty(&flags).context("Failed to serialize flags")?;
        println!("{}", json);
    }

    log::info!("");
    log::info!("=== Complete ===");
    log::info!("  Flagged relations: {}", flags.len());

    Ok(())
}
