use foundation::math::Vec3;

/// Cumulative euclidean distance along a point sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArcLength {
    cumulative: Vec<f64>,
    total: f64,
}

impl ArcLength {
    /// Same length as the input; `cumulative()[0] == 0`.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Animation duration at `speed` length units per second; 0 when there is
    /// nothing to traverse.
    pub fn duration(&self, speed: f64) -> f64 {
        if self.total > 0.0 && speed > 0.0 {
            self.total / speed
        } else {
            0.0
        }
    }
}

pub fn accumulate(points: &[Vec3]) -> ArcLength {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    if !points.is_empty() {
        cumulative.push(0.0);
    }
    for w in points.windows(2) {
        total += w[0].distance(w[1]);
        cumulative.push(total);
    }
    ArcLength { cumulative, total }
}

/// Take-off and landing lift applied to sphere tracks.
///
/// Inside `ease_distance` of either end the radius ramps linearly between
/// `base_radius` and `base_radius + cruise_lift`; elsewhere it holds at the
/// cruise radius.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LiftProfile {
    pub base_radius: f64,
    pub cruise_lift: f64,
    pub ease_distance: f64,
}

impl Default for LiftProfile {
    fn default() -> Self {
        Self {
            base_radius: 1.0,
            cruise_lift: 0.02,
            ease_distance: 0.1,
        }
    }
}

impl LiftProfile {
    pub fn cruise_radius(&self) -> f64 {
        self.base_radius + self.cruise_lift
    }

    /// Radius at `distance` along a path of length `total`.
    pub fn radius_at(&self, distance: f64, total: f64) -> f64 {
        let remaining = total - distance;
        let t = if distance < self.ease_distance {
            distance / self.ease_distance
        } else if remaining < self.ease_distance {
            remaining / self.ease_distance
        } else {
            1.0
        };
        self.base_radius + self.cruise_lift * t.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{LiftProfile, accumulate};
    use foundation::math::Vec3;
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn cumulative_sums_segment_lengths() {
        let pts = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(3.0, 4.0, 2.0),
        ];
        let arc = accumulate(&pts);
        assert_eq!(arc.cumulative(), &[0.0, 5.0, 7.0]);
        assert_eq!(arc.total(), 7.0);
        assert_eq!(arc.duration(0.5), 14.0);
    }

    #[test]
    fn empty_and_single_point_inputs() {
        assert!(accumulate(&[]).cumulative().is_empty());
        let single = accumulate(&[Vec3::X]);
        assert_eq!(single.cumulative(), &[0.0]);
        assert_eq!(single.total(), 0.0);
        assert_eq!(single.duration(0.2), 0.0);
    }

    #[test]
    fn lift_ramps_at_both_ends() {
        let lift = LiftProfile::default();
        let total = 1.0;
        assert_close(lift.radius_at(0.0, total), 1.0, 1e-12);
        assert_close(lift.radius_at(0.05, total), 1.01, 1e-12);
        assert_close(lift.radius_at(0.5, total), 1.02, 1e-12);
        assert_close(lift.radius_at(0.95, total), 1.01, 1e-12);
        assert_close(lift.radius_at(1.0, total), 1.0, 1e-12);
    }

    #[test]
    fn short_paths_never_reach_cruise() {
        let lift = LiftProfile::default();
        // Total shorter than one window: only the take-off ramp applies.
        assert_close(lift.radius_at(0.04, 0.06), 1.008, 1e-12);
        assert!(lift.radius_at(0.0, 0.0) <= lift.cruise_radius());
    }
}
