use crate::models::{Dataset, Feature, LatLng, Polygon};

/// Even-odd ray casting against a closed ring.
///
/// Casts a ray towards increasing longitude and counts edge crossings. The
/// ring is closed by pairing the last vertex with the first.
pub fn ring_contains(ring: &[LatLng], point: LatLng) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let vi = ring[i];
        let vj = ring[j];

        if (vi.lat > point.lat) != (vj.lat > point.lat) {
            let crossing_lng = (vj.lng - vi.lng) * (point.lat - vi.lat) / (vj.lat - vi.lat) + vi.lng;
            if point.lng < crossing_lng {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Features of `dataset` whose location lies inside `polygon`, in dataset order.
///
/// Returns an empty list when there is no dataset or the polygon has fewer
/// than three vertices.
pub fn compute_selection(dataset: Option<&Dataset>, polygon: &Polygon) -> Vec<Feature> {
    let Some(dataset) = dataset else {
        return Vec::new();
    };
    if polygon.is_degenerate() {
        return Vec::new();
    }

    dataset
        .features()
        .iter()
        .filter(|f| ring_contains(&polygon.vertices, f.position()))
        .cloned()
        .collect()
}
