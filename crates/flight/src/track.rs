use foundation::math::{Quat, Surface, Vec3, to_display_point};

use crate::arc_length::{ArcLength, LiftProfile, accumulate};
use crate::path::Path;
use crate::polyline::split_at_dateline;

/// Plane tracks are laid out on the unit-width map.
const PLANE_RADIUS: f64 = 1.0;

/// Position and heading of the marker at one instant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrackSample {
    pub position: Vec3,
    /// Maps local `+X` to right, `+Y` to up and `+Z` to the direction of travel.
    pub orientation: Quat,
}

/// Render-space points for one [`Path`] in one [`Surface`].
///
/// A sphere track is a single lifted arc. A plane track is the path's
/// dateline-split polylines laid end to end; `line_starts` records where each
/// polyline begins so sampling never interpolates across a cut.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightTrack {
    surface: Surface,
    points: Vec<Vec3>,
    line_starts: Vec<usize>,
    arc: ArcLength,
    duration: f64,
    degenerate: bool,
    initial_orientation: Option<Quat>,
}

impl FlightTrack {
    pub fn sphere(path: &Path, lift: &LiftProfile, speed: f64) -> Self {
        let total = path.total_length();
        let points: Vec<Vec3> = path
            .samples()
            .iter()
            .zip(path.cumulative())
            .map(|(sample, distance)| to_display_point(*sample, lift.radius_at(*distance, total)))
            .collect();
        let line_starts = if points.is_empty() { Vec::new() } else { vec![0] };
        Self::build(Surface::Sphere, points, line_starts, path.is_degenerate(), speed)
    }

    pub fn plane(path: &Path, speed: f64) -> Self {
        let (points, line_starts) = split_at_dateline(path.samples(), PLANE_RADIUS).concatenated();
        Self::build(Surface::Plane, points, line_starts, path.is_degenerate(), speed)
    }

    pub fn for_surface(surface: Surface, path: &Path, lift: &LiftProfile, speed: f64) -> Self {
        match surface {
            Surface::Sphere => Self::sphere(path, lift, speed),
            Surface::Plane => Self::plane(path, speed),
        }
    }

    fn build(
        surface: Surface,
        points: Vec<Vec3>,
        line_starts: Vec<usize>,
        degenerate: bool,
        speed: f64,
    ) -> Self {
        let arc = accumulate(&points);
        let degenerate = degenerate || arc.total() <= 0.0;
        let duration = if degenerate { 0.0 } else { arc.duration(speed) };
        let mut track = Self {
            surface,
            points,
            line_starts,
            arc,
            duration,
            degenerate,
            initial_orientation: None,
        };
        track.initial_orientation = track.first_orientation();
        track
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// The drawable pieces: one for a sphere track, one per dateline cut on the plane.
    ///
    /// Single-point pieces stay in [`points`](Self::points) for sampling but
    /// are not returned here.
    pub fn polylines(&self) -> Vec<&[Vec3]> {
        let mut out = Vec::with_capacity(self.line_starts.len());
        for (i, &start) in self.line_starts.iter().enumerate() {
            let end = self
                .line_starts
                .get(i + 1)
                .copied()
                .unwrap_or(self.points.len());
            if end - start > 1 {
                out.push(&self.points[start..end]);
            }
        }
        out
    }

    pub fn total_length(&self) -> f64 {
        self.arc.total()
    }

    /// Seconds per loop; 0 for a degenerate path.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Samples the track at `progress` in `[0, 1)`.
    ///
    /// Progress maps to a fractional index into the render points. On a plane
    /// track the interval leading into a new polyline snaps to that polyline's
    /// first point. Where the local direction of travel vanishes the heading
    /// falls back to `previous`, then to the track's first valid heading.
    /// Returns `None` for a degenerate path.
    pub fn sample_at(&self, progress: f64, previous: Option<Quat>) -> Option<TrackSample> {
        if self.degenerate || self.points.is_empty() {
            return None;
        }
        let last = self.points.len() - 1;
        let seg = progress.clamp(0.0, 1.0) * last as f64;
        let idx = (seg.floor() as usize).min(last);
        let t = seg - idx as f64;
        let next_idx = (idx + 1).min(last);

        let next = self.points[next_idx];
        let (curr, position) = if next_idx != idx && self.starts_line(next_idx) {
            (next, next)
        } else {
            let curr = self.points[idx];
            (curr, curr.lerp(next, t))
        };

        let orientation = heading(next - curr, self.up_at(position))
            .or(previous)
            .or(self.initial_orientation)
            .unwrap_or(Quat::IDENTITY);
        Some(TrackSample {
            position,
            orientation,
        })
    }

    fn starts_line(&self, index: usize) -> bool {
        index > 0 && self.line_starts.binary_search(&index).is_ok()
    }

    fn up_at(&self, position: Vec3) -> Vec3 {
        match self.surface {
            Surface::Sphere => position.normalize_or_zero(),
            Surface::Plane => Vec3::Z,
        }
    }

    fn first_orientation(&self) -> Option<Quat> {
        if self.degenerate {
            return None;
        }
        (0..self.points.len().saturating_sub(1))
            .filter(|&i| !self.starts_line(i + 1))
            .find_map(|i| {
                let (a, b) = (self.points[i], self.points[i + 1]);
                heading(b - a, self.up_at(a))
            })
    }
}

/// Right-handed basis `(up x forward, up', forward)` as a rotation.
///
/// `up` is re-orthogonalised against `forward`. `None` when either direction
/// is degenerate or they are parallel.
pub fn heading(direction: Vec3, up: Vec3) -> Option<Quat> {
    let forward = direction.try_normalize()?;
    let right = up.cross(forward).try_normalize()?;
    let up = forward.cross(right);
    Some(Quat::from_basis(right, up, forward))
}
