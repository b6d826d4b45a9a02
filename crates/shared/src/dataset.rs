//! Strict GeoJSON validation.
//!
//! A payload is only turned into a [`Dataset`] when every feature in it is a
//! well-formed point. Partially valid payloads are rejected as a whole, so the
//! map surface never sees a half-applied upload.

use std::str::FromStr;

use geojson::GeoJson;

use crate::error::{GeopalError, Result};
use crate::models::{Dataset, Feature};

/// Parse and validate a raw GeoJSON document.
pub fn parse_dataset(raw: &str) -> Result<Dataset> {
    let geojson = GeoJson::from_str(raw).map_err(|e| GeopalError::MalformedDataset(e.to_string()))?;
    dataset_from_geojson(geojson)
}

fn dataset_from_geojson(geojson: GeoJson) -> Result<Dataset> {
    let features = match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            return Err(GeopalError::MalformedDataset(
                "Expected a Feature or FeatureCollection, found a bare geometry".to_string(),
            ))
        }
    };

    let features = features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| point_feature(index, feature))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(features = features.len(), "Validated GeoJSON dataset");
    Ok(Dataset::new(features))
}

fn point_feature(index: usize, feature: geojson::Feature) -> Result<Feature> {
    let geometry = feature.geometry.ok_or_else(|| {
        GeopalError::MalformedDataset(format!("Feature {index} has no geometry"))
    })?;

    let position = match geometry.value {
        geojson::Value::Point(position) => position,
        other => {
            return Err(GeopalError::MalformedDataset(format!(
                "Feature {index}: expected a Point geometry, found {}",
                geometry_name(&other)
            )))
        }
    };

    let (lng, lat) = match position.as_slice() {
        [lng, lat, ..] => (*lng, *lat),
        _ => {
            return Err(GeopalError::MalformedDataset(format!(
                "Feature {index}: a Point needs two coordinates"
            )))
        }
    };
    if !lng.is_finite() || !lat.is_finite() {
        return Err(GeopalError::MalformedDataset(format!(
            "Feature {index}: coordinates must be finite numbers"
        )));
    }

    Ok(Feature {
        coordinates: [lng, lat],
        properties: feature.properties.unwrap_or_default(),
    })
}

fn geometry_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_POINTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-6.26, 53.34]},
             "properties": {"name": "Spire", "address": "O'Connell St"}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-6.25, 53.35]},
             "properties": {"name": "Croke Park", "address": "Jones' Rd", "capacity": 82300}}
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let ds = parse_dataset(TWO_POINTS).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.features()[0].name(), "Spire");
        assert!((ds.features()[0].longitude() - -6.26).abs() < 1e-9);
        assert!((ds.features()[0].latitude() - 53.34).abs() < 1e-9);
        assert_eq!(ds.features()[1].text_property("capacity"), "82300");
    }

    #[test]
    fn test_parse_single_feature() {
        let raw = r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[1.0,2.0]},"properties":null}"#;
        let ds = parse_dataset(raw).unwrap();
        assert_eq!(ds.len(), 1);
        assert!(ds.features()[0].properties.is_empty());
    }

    #[test]
    fn test_empty_collection_is_valid() {
        let ds = parse_dataset(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = parse_dataset("definitely not json").unwrap_err();
        assert!(matches!(err, GeopalError::MalformedDataset(_)));
    }

    #[test]
    fn test_bare_geometry_is_rejected() {
        let err = parse_dataset(r#"{"type":"Point","coordinates":[1.0,2.0]}"#).unwrap_err();
        assert!(err.to_string().contains("bare geometry"));
    }

    #[test]
    fn test_one_bad_feature_rejects_whole_payload() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}, "properties": {}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}, "properties": {}}
            ]
        }"#;
        let err = parse_dataset(raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Feature 1: expected a Point geometry, found LineString"
        );
    }

    #[test]
    fn test_missing_geometry_is_rejected() {
        let raw = r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":null,"properties":{}}]}"#;
        let err = parse_dataset(raw).unwrap_err();
        assert_eq!(err.to_string(), "Feature 0 has no geometry");
    }
}
