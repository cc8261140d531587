use foundation::math::{LatLng, Vec3, to_sphere_point};
use tracing::debug;

use crate::arc_length::{ArcLength, accumulate};
use crate::great_circle::great_circle_lat_lngs;

/// Great-circle samples between an origin and a destination.
///
/// Immutable once built. The cumulative distances are measured on the unit
/// sphere and have the same length as the samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    start: LatLng,
    end: LatLng,
    samples: Vec<LatLng>,
    arc: ArcLength,
}

impl Path {
    pub fn generate(start: LatLng, end: LatLng, segments: Option<usize>) -> Self {
        let samples = great_circle_lat_lngs(start, end, segments);
        let unit: Vec<Vec3> = samples.iter().map(|s| to_sphere_point(*s, 1.0)).collect();
        let arc = accumulate(&unit);
        debug!(
            "great-circle path ({:.4},{:.4}) -> ({:.4},{:.4}): {} segments, length {:.5}",
            start.lat,
            start.lng,
            end.lat,
            end.lng,
            samples.len() - 1,
            arc.total()
        );
        Self {
            start,
            end,
            samples,
            arc,
        }
    }

    pub fn start(&self) -> LatLng {
        self.start
    }

    pub fn end(&self) -> LatLng {
        self.end
    }

    pub fn samples(&self) -> &[LatLng] {
        &self.samples
    }

    pub fn segment_count(&self) -> usize {
        self.samples.len().saturating_sub(1)
    }

    pub fn cumulative(&self) -> &[f64] {
        self.arc.cumulative()
    }

    pub fn total_length(&self) -> f64 {
        self.arc.total()
    }

    /// Origin and destination coincide; nothing to animate.
    pub fn is_degenerate(&self) -> bool {
        self.arc.total() <= 0.0
    }
}

/// Builds the great-circle [`Path`] from `start` to `end`.
///
/// Animation callers pass a fixed `segments` so sample density, and with it
/// the timing, does not change between rebuilds.
pub fn generate_path(start: LatLng, end: LatLng, segments: Option<usize>) -> Path {
    Path::generate(start, end, segments)
}

#[cfg(test)]
mod tests {
    use super::generate_path;
    use foundation::math::LatLng;
    use pretty_assertions::assert_eq;

    const TOKYO: LatLng = LatLng::new(35.6895, 139.6917);
    const HEATHROW: LatLng = LatLng::new(51.4775, -0.46139);

    #[test]
    fn coincident_endpoints_make_a_degenerate_path() {
        let path = generate_path(TOKYO, TOKYO, Some(12));
        assert_eq!(path.samples().len(), 13);
        assert!(path.samples().iter().all(|s| *s == TOKYO));
        assert_eq!(path.total_length(), 0.0);
        assert!(path.is_degenerate());
    }

    #[test]
    fn distinct_endpoints_are_kept_exactly() {
        let path = generate_path(TOKYO, HEATHROW, Some(128));
        assert_eq!(path.segment_count(), 128);
        assert_eq!(path.samples().len(), 129);
        assert_eq!(path.samples()[0], TOKYO);
        assert_eq!(path.samples()[128], HEATHROW);
        assert!(!path.is_degenerate());
    }

    #[test]
    fn cumulative_distance_strictly_increases() {
        let path = generate_path(TOKYO, LatLng::new(21.3245132, -157.9250736), Some(64));
        let cum = path.cumulative();
        assert_eq!(cum.len(), path.samples().len());
        assert_eq!(cum[0], 0.0);
        for w in cum.windows(2) {
            assert!(w[1] > w[0], "cumulative not increasing: {w:?}");
        }
        assert_eq!(*cum.last().unwrap(), path.total_length());
    }

    #[test]
    fn chord_total_approaches_arc_angle() {
        // Quarter turn on the unit sphere: chord sum converges on PI/2.
        let path = generate_path(LatLng::new(0.0, 0.0), LatLng::new(0.0, 90.0), Some(256));
        let err = (path.total_length() - std::f64::consts::FRAC_PI_2).abs();
        assert!(err < 1e-4, "total {} too far from PI/2", path.total_length());
    }
}
