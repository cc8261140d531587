use foundation::math::{LatLng, Quat, Vec3, sphere_to_lat_lng, to_sphere_point};

/// Lower bound for the adaptive segment count.
pub const MIN_ADAPTIVE_SEGMENTS: usize = 10;
/// Adaptive density: segments per radian of arc.
pub const SEGMENTS_PER_RADIAN: f64 = 50.0;

/// Arcs shorter than this (radians) are treated as a single point.
const DEGENERATE_ANGLE: f64 = 1e-12;

pub fn adaptive_segment_count(angle_rad: f64) -> usize {
    ((angle_rad * SEGMENTS_PER_RADIAN).ceil() as usize).max(MIN_ADAPTIVE_SEGMENTS)
}

/// Axis to rotate `start` about to reach `end` along the shortest arc.
///
/// `None` when the two unit vectors coincide. For antipodal inputs every
/// great circle is shortest; the fixed choice is `start x Y`, or `start x X`
/// when `start` lies on the polar axis.
pub fn rotation_axis(start: Vec3, end: Vec3) -> Option<Vec3> {
    if start.angle_to(end) < DEGENERATE_ANGLE {
        return None;
    }
    start
        .cross(end)
        .try_normalize()
        .or_else(|| start.cross(Vec3::Y).try_normalize())
        .or_else(|| start.cross(Vec3::X).try_normalize())
}

/// Samples the great circle from `start` to `end` into `segments + 1` points.
///
/// With `segments == None` the count adapts to the arc angle. A requested
/// count of zero is raised to one. The first and last samples are the inputs
/// themselves, not their round-tripped approximations.
pub fn great_circle_lat_lngs(start: LatLng, end: LatLng, segments: Option<usize>) -> Vec<LatLng> {
    let from = to_sphere_point(start, 1.0).normalize_or_zero();
    let to = to_sphere_point(end, 1.0).normalize_or_zero();
    let angle = from.angle_to(to);
    let count = segments
        .unwrap_or_else(|| adaptive_segment_count(angle))
        .max(1);

    let Some(axis) = rotation_axis(from, to) else {
        // Same point, possibly spelled differently (e.g. two pole longitudes).
        let mut out = vec![start; count + 1];
        out[count] = end;
        return out;
    };

    let mut out = Vec::with_capacity(count + 1);
    for i in 0..=count {
        let t = i as f64 / count as f64;
        let rotated = Quat::from_axis_angle(axis, angle * t).rotate(from);
        out.push(sphere_to_lat_lng(rotated.normalize_or_zero()));
    }
    out[0] = start;
    out[count] = end;
    out
}
