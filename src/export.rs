//! GeoJSON export of contour results.
//!
//! Line results become Features with MultiLineString geometry and a
//! `level` property; fill results become Features with MultiPolygon
//! geometry and `lower_level`/`upper_level` properties.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::assemble::{ContourFills, ContourLines};
use crate::error::ContourError;
use crate::generator::ContourGenerator;
use crate::grid::Coord;

fn positions(points: &[Coord]) -> Vec<Vec<f64>> {
    points.iter().map(|p| vec![p[0], p[1]]).collect()
}

fn feature_with_properties(geometry: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Convert a line result into a GeoJSON Feature with MultiLineString
/// geometry and a `level` property.
pub fn lines_feature(lines: &ContourLines, level: f64) -> Feature {
    let coordinates = lines
        .to_separate()
        .iter()
        .map(|line| positions(line))
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("level".to_string(), serde_json::json!(level));
    feature_with_properties(Value::MultiLineString(coordinates), properties)
}

/// Convert a fill result into a GeoJSON Feature with MultiPolygon geometry
/// and `lower_level`/`upper_level` properties.
pub fn filled_feature(fills: &ContourFills, lower: f64, upper: f64) -> Feature {
    let coordinates = fills
        .to_polygons()
        .iter()
        .map(|rings| rings.iter().map(|ring| positions(ring)).collect())
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("lower_level".to_string(), serde_json::json!(lower));
    properties.insert("upper_level".to_string(), serde_json::json!(upper));
    feature_with_properties(Value::MultiPolygon(coordinates), properties)
}

/// Trace one line Feature per level and collect the non-empty ones.
pub fn line_features(generator: &ContourGenerator, levels: &[f64]) -> FeatureCollection {
    let features = levels
        .iter()
        .filter_map(|&level| {
            let lines = generator.lines(level);
            if lines.is_empty() {
                None
            } else {
                Some(lines_feature(&lines, level))
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        foreign_members: None,
        features,
    }
}

/// Trace one fill Feature per consecutive pair of levels and collect the
/// non-empty ones. `levels` must be ascending; N levels yield up to N - 1
/// bands.
pub fn fill_features(
    generator: &ContourGenerator,
    levels: &[f64],
) -> Result<FeatureCollection, ContourError> {
    let mut features = Vec::new();
    for pair in levels.windows(2) {
        let fills = generator.filled(pair[0], pair[1])?;
        if !fills.is_empty() {
            features.push(filled_feature(&fills, pair[0], pair[1]));
        }
    }
    Ok(FeatureCollection {
        bbox: None,
        foreign_members: None,
        features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorOptions;
    use crate::grid::GridField;

    fn ramp_generator() -> ContourGenerator {
        let grid = GridField::from_axes(
            &[0.0, 1.0, 2.0],
            &[0.0, 1.0],
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        )
        .unwrap();
        ContourGenerator::new(grid, GeneratorOptions::default()).unwrap()
    }

    #[test]
    fn test_lines_feature_geometry_and_level() {
        let generator = ramp_generator();
        let lines = generator.lines(0.5);
        let feature = lines_feature(&lines, 0.5);

        let Some(Geometry {
            value: Value::MultiLineString(coordinates),
            ..
        }) = feature.geometry
        else {
            panic!("expected MultiLineString geometry");
        };
        assert_eq!(coordinates.len(), 1);
        assert_eq!(coordinates[0].first(), Some(&vec![0.0, 0.5]));
        assert_eq!(coordinates[0].last(), Some(&vec![2.0, 0.5]));
        assert_eq!(
            feature.properties.unwrap().get("level"),
            Some(&serde_json::json!(0.5))
        );
    }

    #[test]
    fn test_filled_feature_properties() {
        let generator = ramp_generator();
        let fills = generator.filled(0.25, 0.75).unwrap();
        let feature = filled_feature(&fills, 0.25, 0.75);

        let properties = feature.properties.unwrap();
        assert_eq!(properties.get("lower_level"), Some(&serde_json::json!(0.25)));
        assert_eq!(properties.get("upper_level"), Some(&serde_json::json!(0.75)));
        assert!(matches!(
            feature.geometry,
            Some(Geometry {
                value: Value::MultiPolygon(_),
                ..
            })
        ));
    }

    #[test]
    fn test_line_features_filters_empty_levels() {
        let generator = ramp_generator();
        // 0.5 crosses the ramp, 5.0 does not.
        let collection = line_features(&generator, &[0.5, 5.0]);
        assert_eq!(collection.features.len(), 1);
    }

    #[test]
    fn test_fill_features_band_pairs() {
        let generator = ramp_generator();
        let collection = fill_features(&generator, &[0.0, 0.5, 1.5]).unwrap();
        assert_eq!(collection.features.len(), 2);
    }
}
