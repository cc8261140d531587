use foundation::math::{LatLng, Vec3, to_plane_point};

/// Longitude jump (degrees) between consecutive samples treated as a dateline crossing.
pub const WRAP_THRESHOLD_DEG: f64 = 180.0;

/// A path laid out on the plane, cut wherever it wraps around the dateline.
///
/// Lines are never empty. Only a piece between two back-to-back crossings,
/// or one at the very start, can hold a single point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolylineSet {
    lines: Vec<Vec<Vec3>>,
}

impl PolylineSet {
    pub fn lines(&self) -> &[Vec<Vec3>] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines with at least two points.
    pub fn drawable(&self) -> impl Iterator<Item = &[Vec3]> {
        self.lines.iter().map(Vec::as_slice).filter(|line| line.len() > 1)
    }

    /// All points end to end, plus the index at which each line starts.
    pub fn concatenated(&self) -> (Vec<Vec3>, Vec<usize>) {
        let mut points = Vec::with_capacity(self.lines.iter().map(Vec::len).sum());
        let mut starts = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            starts.push(points.len());
            points.extend_from_slice(line);
        }
        (points, starts)
    }
}

/// Projects `samples` onto the plane and splits at every consecutive pair
/// whose longitudes differ by more than 180 degrees.
///
/// A single-point piece at the end (a crossing right at the last sample) is
/// dropped. Earlier single-point pieces are kept so the set still begins at
/// the first sample; they have nothing to draw and are skipped by
/// [`PolylineSet::drawable`].
pub fn split_at_dateline(samples: &[LatLng], radius: f64) -> PolylineSet {
    let mut lines = Vec::new();
    let mut current: Vec<Vec3> = Vec::new();
    for (i, sample) in samples.iter().enumerate() {
        if i > 0 && (sample.lng - samples[i - 1].lng).abs() > WRAP_THRESHOLD_DEG {
            let done = std::mem::take(&mut current);
            if !done.is_empty() {
                lines.push(done);
            }
        }
        current.push(to_plane_point(*sample, radius));
    }
    if current.len() > 1 {
        lines.push(current);
    }
    PolylineSet { lines }
}

#[cfg(test)]
mod tests {
    use super::split_at_dateline;
    use crate::path::generate_path;
    use foundation::math::{LatLng, Vec3, to_plane_point};
    use pretty_assertions::assert_eq;

    #[test]
    fn path_without_crossing_stays_whole() {
        let path = generate_path(LatLng::new(35.0, 139.0), LatLng::new(1.36, 103.99), Some(16));
        let set = split_at_dateline(path.samples(), 1.0);
        assert_eq!(set.len(), 1);
        assert_eq!(set.lines()[0].len(), 17);
    }

    #[test]
    fn dateline_crossing_splits_the_path() {
        let path = generate_path(LatLng::new(0.0, 170.0), LatLng::new(0.0, -170.0), Some(8));
        let set = split_at_dateline(path.samples(), 1.0);
        assert!(set.len() >= 2, "expected a split, got {} line(s)", set.len());
        for line in set.lines() {
            assert!(line.len() >= 2);
            for w in line.windows(2) {
                // Half the plane width corresponds to 180 degrees of longitude.
                assert!((w[1].x - w[0].x).abs() <= 1.0, "line jumps across the map: {w:?}");
            }
        }
    }

    #[test]
    fn trailing_singleton_is_dropped() {
        let samples = [
            LatLng::new(0.0, 175.0),
            LatLng::new(0.0, 178.0),
            LatLng::new(0.0, -179.0),
        ];
        let set = split_at_dateline(&samples, 1.0);
        assert_eq!(set.len(), 1);
        assert_eq!(set.lines()[0].len(), 2);
    }

    #[test]
    fn leading_singleton_keeps_the_first_sample() {
        let samples = [
            LatLng::new(0.0, 179.5),
            LatLng::new(0.0, -177.0),
            LatLng::new(0.0, -170.0),
        ];
        let set = split_at_dateline(&samples, 1.0);
        assert_eq!(set.len(), 2);
        assert_eq!(set.lines()[0], vec![to_plane_point(samples[0], 1.0)]);
        assert_eq!(set.drawable().count(), 1);
        let (points, starts) = set.concatenated();
        assert_eq!(points.len(), 3);
        assert_eq!(starts, vec![0, 1]);
    }

    #[test]
    fn concatenation_reports_line_starts() {
        let samples = [
            LatLng::new(0.0, 170.0),
            LatLng::new(0.0, 178.0),
            LatLng::new(0.0, -178.0),
            LatLng::new(0.0, -170.0),
        ];
        let set = split_at_dateline(&samples, 1.0);
        let (points, starts) = set.concatenated();
        assert_eq!(points.len(), 4);
        assert_eq!(starts, vec![0, 2]);
        assert_eq!(points[2].z, 0.0);
        assert!(points[2].x < Vec3::ZERO.x);
    }
}
