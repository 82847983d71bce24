use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use route_integrity::prelude::*;
use route_integrity::validation::group::route_members;
use std::path::Path;

fn segment_to_positions(segment: &Segment) -> Vec<Vec<f64>> {
    segment
        .points()
        .iter()
        .map(|location| vec![location.longitude(), location.latitude()])
        .collect()
}

/// Track lines of a flagged relation. Route masters show the tracks of their routes.
fn flag_lines(relation: &dyn Relation, provider: &dyn RelationProvider) -> Vec<Vec<Vec<f64>>> {
    let tracks: Vec<SegmentSet> = match relation.relation_type() {
        RelationType::RouteMaster => route_members(relation, provider)
            .iter()
            .map(|route| extract_geometry(route.members()).track)
            .collect(),
        _ => vec![extract_geometry(relation.members()).track],
    };

    tracks
        .iter()
        .flat_map(|track| track.iter().map(segment_to_positions))
        .collect()
}

fn flag_to_feature(flag: &CheckFlag, provider: &dyn RelationProvider) -> Result<Feature> {
    let geometry = provider.get_relation(flag.relation).and_then(|relation| {
        let lines = flag_lines(relation.as_ref(), provider);
        (!lines.is_empty()).then(|| Geometry::new(Value::MultiLineString(lines)))
    });

    let mut properties = serde_json::Map::new();
    properties.insert("relation".to_string(), serde_json::json!(flag.relation));
    properties.insert(
        "instructions".to_string(),
        serde_json::json!(flag.instructions()),
    );
    properties.insert(
        "findings".to_string(),
        serde_json::to_value(&flag.findings).context("Failed to serialize findings")?,
    );

    Ok(Feature {
        bbox: None,
        geometry,
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Build a FeatureCollection with one feature per flagged relation
pub fn flags_to_feature_collection(
    flags: &[CheckFlag],
    provider: &dyn RelationProvider,
) -> Result<FeatureCollection> {
    let features = flags
        .iter()
        .map(|flag| flag_to_feature(flag, provider))
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Write flags as GeoJSON to a file
pub fn write_flags_geojson(
    flags: &[CheckFlag],
    provider: &dyn RelationProvider,
    path: &Path,
) -> Result<()> {
    let fc = flags_to_feature_collection(flags, provider)?;
    let geojson = GeoJson::from(fc);
    let json = serde_json::to_string_pretty(&geojson).context("Failed to serialize GeoJSON")?;

    std::fs::write(path, json)
        .with_context(|| format!("Failed to write GeoJSON to {}", path.display()))?;

    log::info!("Wrote {} flags to {}", flags.len(), path.display());
    Ok(())
}
