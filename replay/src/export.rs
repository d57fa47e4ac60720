use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

use crate::player::ReplaySnapshot;
use crate::segment::Segment;

/// One LineString feature per segment, each carrying a `predicted` property
/// so the map layer can pick solid or dashed styling.
pub fn segments_to_geojson(segments: &[Segment]) -> GeoJson {
    GeoJson::FeatureCollection(FeatureCollection {
        features: segments.iter().map(segment_to_feature).collect(),
        bbox: None,
        foreign_members: None,
    })
}

/// The visible segments plus one point feature for the movable marker, with
/// its bearing and the scrubber progress attached.
pub fn snapshot_to_geojson(snapshot: &ReplaySnapshot) -> GeoJson {
    let mut features: Vec<Feature> = snapshot
        .visible_segments
        .iter()
        .map(segment_to_feature)
        .collect();
    if let Some(position) = snapshot.current_position {
        let mut feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![position.lon, position.lat]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("marker", true);
        feature.set_property("bearing", snapshot.current_bearing);
        feature.set_property("progress", snapshot.progress);
        features.push(feature);
    }
    GeoJson::FeatureCollection(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

fn segment_to_feature(segment: &Segment) -> Feature {
    let line = segment
        .path
        .iter()
        .map(|pt| vec![pt.lon, pt.lat])
        .collect();
    let mut feature = Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(line))),
        id: None,
        properties: None,
        foreign_members: None,
    };
    feature.set_property("predicted", segment.is_predicted);
    feature
}

#[cfg(test)]
mod tests {
    use model::LonLat;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_segments_become_linestrings() {
        let segments = vec![
            Segment {
                path: vec![LonLat::new(77.0, 12.0), LonLat::new(77.1, 12.1)],
                is_predicted: false,
            },
            Segment {
                path: vec![LonLat::new(77.1, 12.1), LonLat::new(77.2, 12.2)],
                is_predicted: true,
            },
        ];
        let collection = match segments_to_geojson(&segments) {
            GeoJson::FeatureCollection(fc) => fc,
            _ => unreachable!(),
        };
        assert_eq!(collection.features.len(), 2);
        assert_eq!(
            collection.features[0].property("predicted"),
            Some(&serde_json::Value::Bool(false))
        );
        assert_eq!(
            collection.features[1].property("predicted"),
            Some(&serde_json::Value::Bool(true))
        );
        match &collection.features[0].geometry.as_ref().unwrap().value {
            Value::LineString(line) => {
                assert_eq!(line[0], vec![77.0, 12.0]);
                assert_eq!(line[1], vec![77.1, 12.1]);
            }
            _ => panic!("expected a LineString"),
        }
    }

    #[test]
    fn test_snapshot_appends_a_marker() {
        let snapshot = ReplaySnapshot {
            current_index: 0,
            progress: 50.0,
            is_playing: true,
            current_position: Some(LonLat::new(77.05, 12.05)),
            current_bearing: 42.0,
            visible_segments: vec![Segment {
                path: vec![LonLat::new(77.0, 12.0), LonLat::new(77.05, 12.05)],
                is_predicted: false,
            }],
        };
        let collection = match snapshot_to_geojson(&snapshot) {
            GeoJson::FeatureCollection(fc) => fc,
            _ => unreachable!(),
        };
        assert_eq!(collection.features.len(), 2);
        let marker = &collection.features[1];
        assert_eq!(
            marker.property("bearing"),
            Some(&serde_json::Value::from(42.0))
        );
        assert_eq!(
            marker.property("progress"),
            Some(&serde_json::Value::from(50.0))
        );
        match &marker.geometry.as_ref().unwrap().value {
            Value::Point(pt) => assert_eq!(pt, &vec![77.05, 12.05]),
            _ => panic!("expected a Point"),
        }
    }

    #[test]
    fn test_empty_snapshot_has_no_marker() {
        let snapshot = ReplaySnapshot {
            current_index: 0,
            progress: 0.0,
            is_playing: false,
            current_position: None,
            current_bearing: 0.0,
            visible_segments: Vec::new(),
        };
        let collection = match snapshot_to_geojson(&snapshot) {
            GeoJson::FeatureCollection(fc) => fc,
            _ => unreachable!(),
        };
        assert!(collection.features.is_empty());
    }
}
