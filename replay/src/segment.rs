use model::{LocationPoint, LonLat};
use serde::Serialize;

/// A run of consecutive route points sharing one predicted flag. Map layers
/// draw predicted stretches dashed and tracked stretches solid.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub path: Vec<LonLat>,
    pub is_predicted: bool,
}

/// The polyline pieces covered so far: every whole point up to and including
/// `current_index`, split wherever the predicted flag flips. Each piece after
/// the first starts with the previous piece's last point, so adjacent
/// polylines share a vertex and the drawn line has no gaps. While the marker
/// is mid-route, `tail` extends the open piece up to it; at the final index
/// the tail is not consulted.
pub fn visible_segments(
    points: &[LocationPoint],
    current_index: usize,
    tail: Option<LonLat>,
) -> Vec<Segment> {
    if points.is_empty() {
        return Vec::new();
    }
    let last = points.len() - 1;
    let current_index = current_index.min(last);

    let mut segments = Vec::new();
    let mut current = Segment {
        path: vec![points[0].lon_lat()],
        is_predicted: points[0].is_predicted,
    };
    for point in &points[1..=current_index] {
        if point.is_predicted == current.is_predicted {
            current.path.push(point.lon_lat());
        } else {
            let seam = *current.path.last().unwrap();
            segments.push(current);
            current = Segment {
                path: vec![seam, point.lon_lat()],
                is_predicted: point.is_predicted,
            };
        }
    }
    if current_index < last {
        if let Some(tail) = tail {
            current.path.push(tail);
        }
    }
    segments.push(current);
    segments
}

/// The whole route at once, for the static preview drawn before playback
/// starts.
pub fn full_route_segments(points: &[LocationPoint]) -> Vec<Segment> {
    if points.is_empty() {
        return Vec::new();
    }
    visible_segments(points, points.len() - 1, None)
}
