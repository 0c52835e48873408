//! Annotates raw `GeoJSON` features with scored location records.
//!
//! Values present in a feature's properties are used as-is; missing or
//! unparseable values are synthesized from the feature's identifier (or
//! its position when it has none). The record's fields are then written
//! into the properties, replacing whatever the source had under those
//! keys, so the renderer colors by the same values the filters read.
//! Other source properties and the geometry are never modified.

use geojson::JsonObject;
use opportunity_map_location_models::{AnnotatedCollection, AnnotatedFeature, LocationRecord};
use opportunity_map_region_models::{FeatureFieldMapping, RegionSource};
use opportunity_map_scoring::{ScoreError, Seed, SynthesisOverrides, Synthesizer};
use serde_json::Value;

/// Property holding the county read through the region's county keys.
pub const COUNTY_PROPERTY: &str = "county";

/// Annotates every feature of a region's collection.
///
/// Malformed features (no identifier or no valid geometry) are kept with
/// a synthesized record but carry no identifier/shape, so downstream
/// bounds and click resolution skip them.
#[must_use]
pub fn annotate_features(
    features: &[Value],
    region: &RegionSource,
    synthesizer: &Synthesizer,
) -> AnnotatedCollection {
    let collection: AnnotatedCollection = features
        .iter()
        .enumerate()
        .map(|(index, feature)| annotate_feature(index, feature, region, synthesizer))
        .collect();

    let malformed = collection
        .features
        .iter()
        .filter(|f| !f.is_well_formed())
        .count();
    log::info!(
        "{}: annotated {} features ({malformed} malformed)",
        region.id,
        collection.len()
    );

    collection
}

/// Annotates a single feature.
#[must_use]
pub fn annotate_feature(
    index: usize,
    feature: &Value,
    region: &RegionSource,
    synthesizer: &Synthesizer,
) -> AnnotatedFeature {
    let mut properties: JsonObject = feature
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let id = read_identifier(&properties, &region.fields);
    if id.is_none() {
        log::warn!(
            "{}: feature {index} has no identifier in {:?}",
            region.id,
            region.fields.id_keys
        );
    }

    let (geometry, shape) = parse_geometry(feature.get("geometry"));
    if shape.is_none() {
        log::warn!(
            "{}: feature {} has no valid geometry",
            region.id,
            id.as_deref().unwrap_or("<unidentified>")
        );
    }

    let seed = id
        .as_deref()
        .map_or_else(|| Seed::from(index), Seed::from_identifier);

    let overrides = SynthesisOverrides {
        id: id.clone(),
        city: read_string(&properties, &["city", "CITY"]).or_else(|| Some(region.city.clone())),
        state: read_string(&properties, &["state", "STATE"])
            .or_else(|| Some(region.state.clone())),
        urbanicity: read_string(&properties, &["urbanicity"]).and_then(|s| s.parse().ok()),
        net_worth: read_number(&properties, "netWorth").filter(|v| *v >= 0.0),
        divorce_rate: read_number(&properties, "divorceRate")
            .filter(|v| *v >= 0.0)
            .map(normalize_divorce_rate),
        competitor_count: read_competitor_count(&properties, &region.id),
        has_office: read_bool(&properties, "hasOffice"),
        reported_opportunity: read_number(&properties, "opportunity").filter(|v| *v >= 0.0),
        ..SynthesisOverrides::default()
    };

    let record = synthesizer.synthesize(&seed, &overrides);
    if let Some(county) = read_string(&properties, &region.fields.county_keys) {
        properties.insert(COUNTY_PROPERTY.to_string(), Value::String(county));
    }
    write_record_fields(&mut properties, &record);

    AnnotatedFeature {
        index,
        id,
        record,
        geometry,
        shape,
        properties,
    }
}

/// Wraps fully synthesized records as a collection without geometry.
///
/// Used for the fallback dataset when a region cannot be fetched. The
/// features keep their identifiers for detail lookups but have no shape,
/// so bounds fall back to the default viewport.
#[must_use]
pub fn synthesized_collection(records: Vec<LocationRecord>) -> AnnotatedCollection {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let mut properties = JsonObject::new();
            write_record_fields(&mut properties, &record);
            AnnotatedFeature {
                index,
                id: Some(record.id.clone()),
                record,
                geometry: None,
                shape: None,
                properties,
            }
        })
        .collect()
}

/// Divorce rates above `1` are taken to be percentage points.
fn normalize_divorce_rate(value: f64) -> f64 {
    if value > 1.0 { (value / 100.0).min(1.0) } else { value }
}

fn read_identifier(properties: &JsonObject, fields: &FeatureFieldMapping) -> Option<String> {
    fields.id_keys.iter().find_map(|key| match properties.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn read_string<K: AsRef<str>>(properties: &JsonObject, keys: &[K]) -> Option<String> {
    keys.iter().find_map(|key| {
        properties
            .get(key.as_ref())
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Reads a finite number, accepting numeric strings. Anything else is
/// treated as absent.
fn read_number(properties: &JsonObject, key: &str) -> Option<f64> {
    let value = match properties.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    if value.is_none() {
        log::debug!("Ignoring non-numeric {key}: {:?}", properties.get(key));
    }
    value.filter(|v| v.is_finite())
}

fn read_bool(properties: &JsonObject, key: &str) -> Option<bool> {
    match properties.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn read_competitor_count(properties: &JsonObject, region_id: &str) -> Option<u32> {
    let count = read_number(properties, "competitorCount")?.round() as i64;
    if count < 0 {
        log::warn!(
            "{region_id}: {}; synthesizing instead",
            ScoreError::NegativeCompetitorCount { count }
        );
        return None;
    }
    Some(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Parses a feature's geometry, returning both the raw `GeoJSON` value
/// (for the renderer) and the converted shape (for spatial math).
fn parse_geometry(
    value: Option<&Value>,
) -> (Option<geojson::Geometry>, Option<geo::Geometry<f64>>) {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return (None, None);
    };
    let Ok(geometry) = serde_json::from_value::<geojson::Geometry>(value.clone()) else {
        return (None, None);
    };
    let shape = geo::Geometry::<f64>::try_from(geometry.clone()).ok();
    (Some(geometry), shape)
}

/// Writes every record field over the matching property. `id` is only
/// added when the source has none, since it may be keyed differently.
fn write_record_fields(properties: &mut JsonObject, record: &LocationRecord) {
    let Ok(Value::Object(fields)) = serde_json::to_value(record) else {
        return;
    };
    for (key, value) in fields {
        if key == "id" {
            properties.entry(key).or_insert(value);
        } else {
            properties.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opportunity_map_location_models::{Tier, Urbanicity};
    use opportunity_map_region_models::RegionFetcherConfig;
    use serde_json::json;

    fn region() -> RegionSource {
        RegionSource {
            id: "ny".to_string(),
            name: "New York".to_string(),
            state: "NY".to_string(),
            city: "New York".to_string(),
            zip_prefix: "100".to_string(),
            fetcher: RegionFetcherConfig::File {
                path: "unused".to_string(),
            },
            fields: FeatureFieldMapping::default(),
        }
    }

    fn square() -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[
                [-74.0, 40.7], [-73.9, 40.7], [-73.9, 40.8], [-74.0, 40.8], [-74.0, 40.7]
            ]]
        })
    }

    #[test]
    fn fills_properties_and_keeps_unrelated_ones() {
        let feature = json!({
            "type": "Feature",
            "properties": {
                "ZCTA5CE20": "10001",
                "netWorth": 7.5,
                "urbanicity": "Rural",
                "customField": "kept"
            },
            "geometry": square()
        });
        let annotated = annotate_feature(0, &feature, &region(), &Synthesizer::default());

        assert_eq!(annotated.id.as_deref(), Some("10001"));
        assert!((annotated.record.net_worth - 7.5).abs() < f64::EPSILON);
        assert_eq!(annotated.record.urbanicity, Urbanicity::Rural);
        assert_eq!(annotated.properties["netWorth"], 7.5);
        assert_eq!(annotated.properties["urbanicity"], "Rural");
        assert_eq!(annotated.properties["customField"], "kept");
        assert!(annotated.properties.contains_key("divorceRate"));
        assert!(annotated.properties.contains_key("tam"));
        assert!(annotated.properties.contains_key("tier"));
        assert_eq!(annotated.properties["state"], "NY");
        assert!(annotated.is_well_formed());
    }

    #[test]
    fn annotation_is_deterministic() {
        let feature = json!({
            "type": "Feature",
            "properties": { "GEOID20": "10027" },
            "geometry": square()
        });
        let a = annotate_feature(3, &feature, &region(), &Synthesizer::default());
        let b = annotate_feature(3, &feature, &region(), &Synthesizer::default());
        assert_eq!(a, b);
    }

    #[test]
    fn matches_direct_synthesis_for_bare_feature() {
        let feature = json!({
            "type": "Feature",
            "properties": { "ZCTA5CE20": "10013" },
            "geometry": square()
        });
        let annotated = annotate_feature(0, &feature, &region(), &Synthesizer::default());
        let direct = Synthesizer::default().synthesize(
            &Seed::from("10013"),
            &SynthesisOverrides {
                city: Some("New York".to_string()),
                state: Some("NY".to_string()),
                ..SynthesisOverrides::default()
            },
        );
        assert_eq!(annotated.record, direct);
    }

    #[test]
    fn percentage_divorce_rate_is_normalized() {
        let feature = json!({
            "type": "Feature",
            "properties": { "ZCTA5CE20": "10002", "divorceRate": 6.0 },
            "geometry": square()
        });
        let annotated = annotate_feature(0, &feature, &region(), &Synthesizer::default());
        assert!((annotated.record.divorce_rate - 0.06).abs() < 1e-12);
        let property = annotated.properties["divorceRate"].as_f64().unwrap();
        assert!((property - 0.06).abs() < 1e-12, "{property}");
    }

    #[test]
    fn numeric_strings_parse_and_garbage_is_synthesized() {
        let feature = json!({
            "type": "Feature",
            "properties": {
                "ZCTA5CE20": "10003",
                "netWorth": "4.25",
                "divorceRate": "n/a",
                "hasOffice": "true"
            },
            "geometry": square()
        });
        let annotated = annotate_feature(0, &feature, &region(), &Synthesizer::default());
        assert!((annotated.record.net_worth - 4.25).abs() < f64::EPSILON);
        assert!(annotated.record.divorce_rate >= 0.02 && annotated.record.divorce_rate < 0.10);
        assert!(annotated.record.has_office);
        assert_eq!(annotated.properties["netWorth"], annotated.record.net_worth);
        assert_eq!(annotated.properties["divorceRate"], annotated.record.divorce_rate);
        assert_eq!(annotated.properties["hasOffice"], true);
    }

    #[test]
    fn reported_opportunity_drives_tier() {
        let feature = json!({
            "type": "Feature",
            "properties": { "ZCTA5CE20": "10004", "opportunity": 25.0 },
            "geometry": square()
        });
        let annotated = annotate_feature(0, &feature, &region(), &Synthesizer::default());
        assert_eq!(annotated.record.tier, Tier::High);
    }

    #[test]
    fn rejected_opportunity_is_replaced_in_properties() {
        let feature = json!({
            "type": "Feature",
            "properties": { "ZCTA5CE20": "10010", "opportunity": -5.0, "tier": "Low" },
            "geometry": square()
        });
        let annotated = annotate_feature(0, &feature, &region(), &Synthesizer::default());
        let record = &annotated.record;

        assert!(record.opportunity >= 0.0);
        assert_eq!(annotated.properties["opportunity"], record.opportunity);
        assert_eq!(annotated.properties["tier"], record.tier.to_string());
        assert_eq!(
            Tier::classify(annotated.properties["opportunity"].as_f64().unwrap()),
            record.tier
        );
    }

    #[test]
    fn numeric_string_opportunity_becomes_a_number() {
        let feature = json!({
            "type": "Feature",
            "properties": { "ZCTA5CE20": "10011", "opportunity": "12.5" },
            "geometry": square()
        });
        let annotated = annotate_feature(0, &feature, &region(), &Synthesizer::default());

        assert_eq!(annotated.record.tier, Tier::High);
        assert_eq!(annotated.properties["opportunity"], 12.5);
        assert_eq!(annotated.properties["tier"], "High");
    }

    #[test]
    fn county_is_read_through_county_keys() {
        let feature = json!({
            "type": "Feature",
            "properties": { "ZCTA5CE20": "10012", "COUNTYFP20": "061" },
            "geometry": square()
        });
        let annotated = annotate_feature(0, &feature, &region(), &Synthesizer::default());
        assert_eq!(annotated.properties[COUNTY_PROPERTY], "061");
        assert_eq!(annotated.properties["COUNTYFP20"], "061");

        let bare = json!({
            "type": "Feature",
            "properties": { "ZCTA5CE20": "10014" },
            "geometry": square()
        });
        let annotated = annotate_feature(0, &bare, &region(), &Synthesizer::default());
        assert!(!annotated.properties.contains_key(COUNTY_PROPERTY));
    }

    #[test]
    fn negative_competitor_count_is_synthesized() {
        let feature = json!({
            "type": "Feature",
            "properties": { "ZCTA5CE20": "10005", "competitorCount": -3 },
            "geometry": square()
        });
        let annotated = annotate_feature(0, &feature, &region(), &Synthesizer::default());
        assert!(annotated.record.competitor_count <= 5);
    }

    #[test]
    fn malformed_features_are_kept_but_not_well_formed() {
        let features = vec![
            json!({ "type": "Feature", "properties": {}, "geometry": square() }),
            json!({ "type": "Feature", "properties": { "ZCTA5CE20": "10006" }, "geometry": null }),
            json!({
                "type": "Feature",
                "properties": { "ZCTA5CE20": "10007" },
                "geometry": { "type": "Polygon", "coordinates": "bogus" }
            }),
            json!({
                "type": "Feature",
                "properties": { "ZCTA5CE20": "10008" },
                "geometry": square()
            }),
        ];
        let collection = annotate_features(&features, &region(), &Synthesizer::default());

        assert_eq!(collection.len(), 4);
        assert!(collection.features[0].id.is_none());
        assert_eq!(collection.features[0].record.id, "0");
        assert!(collection.features[1].shape.is_none());
        assert!(collection.features[2].shape.is_none());
        assert!(collection.features[3].is_well_formed());
        assert_eq!(collection.shapes().count(), 1);
    }

    #[test]
    fn synthesized_collection_keeps_ids_without_shapes() {
        let records = opportunity_map_scoring::mock_records(
            &Synthesizer::default(),
            "100",
            3,
            "New York",
            "NY",
        );
        let collection = synthesized_collection(records.clone());
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.find("10001"), Some(&records[1]));
        assert_eq!(collection.shapes().count(), 0);
        assert_eq!(collection.features[2].properties["id"], "10002");
        assert!(collection.features[0].properties.contains_key("opportunity"));
    }

    #[test]
    fn numeric_identifiers_are_accepted() {
        let feature = json!({
            "type": "Feature",
            "properties": { "GEOID20": 10009 },
            "geometry": square()
        });
        let annotated = annotate_feature(0, &feature, &region(), &Synthesizer::default());
        assert_eq!(annotated.id.as_deref(), Some("10009"));
    }
}
