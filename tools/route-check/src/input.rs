use anyhow::{Context, Result};
use route_integrity::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Top-level layout of the relations input file
#[derive(Deserialize)]
struct RelationFile {
    relations: Vec<RelationImpl>,
}

pub fn parse_relations<R: Read>(reader: R) -> Result<Vec<RelationImpl>> {
    let file: RelationFile =
        serde_json::from_reader(reader).context("Failed to parse relations JSON")?;
    Ok(file.relations)
}

/// Read relations from a JSON file
pub fn read_relations(path: &Path) -> Result<Vec<RelationImpl>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let relations = parse_relations(BufReader::new(file))?;

    log::info!("Loaded {} relations from {}", relations.len(), path.display());
    Ok(relations)
}

/// Read a check configuration. Missing fields keep their defaults.
pub fn read_config(path: &Path) -> Result<CheckConfig> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let config: CheckConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
