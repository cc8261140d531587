use foundation::math::Quat;

use crate::track::{FlightTrack, TrackSample};

/// Animation state of the marker along one track.
///
/// `progress` is always in `[0, 1)`. `orientation` is the last valid heading,
/// kept so a zero-length step can reuse it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FollowerState {
    pub progress: f64,
    pub orientation: Option<Quat>,
}

/// `(progress + dt / duration) mod 1`. A zero duration parks progress at 0.
pub fn advance_progress(progress: f64, dt_s: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }
    let dt_s = if dt_s.is_finite() { dt_s.max(0.0) } else { 0.0 };
    let wrapped = (progress + dt_s / duration).rem_euclid(1.0);
    if wrapped >= 1.0 || !wrapped.is_finite() {
        0.0
    } else {
        wrapped
    }
}

/// Pure update: the state after `dt_s` seconds on `track`.
pub fn advance(state: FollowerState, track: &FlightTrack, dt_s: f64) -> FollowerState {
    let progress = advance_progress(state.progress, dt_s, track.duration());
    let orientation = track
        .sample_at(progress, state.orientation)
        .map(|s| s.orientation)
        .or(state.orientation);
    FollowerState {
        progress,
        orientation,
    }
}

/// A track together with the marker animating along it.
///
/// Replacing the track always restarts the animation, so a pose is never
/// sampled from a track the progress was not accumulated on.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFollower {
    track: FlightTrack,
    state: FollowerState,
}

impl PathFollower {
    pub fn new(track: FlightTrack) -> Self {
        Self {
            track,
            state: FollowerState::default(),
        }
    }

    pub fn tick(&mut self, dt_s: f64) {
        self.state = advance(self.state, &self.track, dt_s);
    }

    pub fn sample_at(&self, progress: f64) -> Option<TrackSample> {
        self.track.sample_at(progress, self.state.orientation)
    }

    /// Marker pose at the current progress; `None` for a degenerate path.
    pub fn pose(&self) -> Option<TrackSample> {
        self.sample_at(self.state.progress)
    }

    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    pub fn state(&self) -> FollowerState {
        self.state
    }

    pub fn track(&self) -> &FlightTrack {
        &self.track
    }

    pub fn replace_track(&mut self, track: FlightTrack) -> FlightTrack {
        self.state = FollowerState::default();
        std::mem::replace(&mut self.track, track)
    }
}

#[cfg(test)]
mod tests {
    use super::{FollowerState, PathFollower, advance, advance_progress};
    use crate::arc_length::LiftProfile;
    use crate::path::generate_path;
    use crate::track::FlightTrack;
    use foundation::math::LatLng;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn sample_track() -> FlightTrack {
        let path = generate_path(LatLng::new(35.6895, 139.6917), LatLng::new(22.3088889, 113.914722), Some(128));
        FlightTrack::sphere(&path, &LiftProfile::default(), 0.2)
    }

    #[test]
    fn progress_advances_proportionally() {
        assert_close(advance_progress(0.0, 1.0, 4.0), 0.25, 1e-12);
        assert_close(advance_progress(0.5, 1.0, 4.0), 0.75, 1e-12);
    }

    #[test]
    fn progress_wraps_instead_of_exceeding_one() {
        assert_close(advance_progress(0.9, 1.0, 4.0), 0.15, 1e-12);
        assert_close(advance_progress(0.0, 9.0, 4.0), 0.25, 1e-12);
        let p = advance_progress(0.75, 1.0, 4.0);
        assert!((0.0..1.0).contains(&p));
    }

    #[test]
    fn zero_duration_parks_at_zero() {
        assert_eq!(advance_progress(0.4, 1.0, 0.0), 0.0);
        assert_eq!(advance_progress(0.4, 1.0, f64::NAN), 0.0);
    }

    #[test]
    fn negative_delta_does_not_rewind() {
        assert_close(advance_progress(0.5, -1.0, 4.0), 0.5, 1e-12);
    }

    #[test]
    fn cumulative_ticks_stay_in_range() {
        let mut follower = PathFollower::new(sample_track());
        let duration = follower.track().duration();
        assert!(duration > 0.0);
        let steps = 1000;
        let dt = duration * 2.5 / steps as f64;
        for _ in 0..steps {
            follower.tick(dt);
            let p = follower.progress();
            assert!((0.0..1.0).contains(&p), "progress out of range: {p}");
        }
        assert_close(follower.progress(), 0.5, 1e-6);
    }

    #[test]
    fn advance_is_pure() {
        let track = sample_track();
        let s0 = FollowerState::default();
        let a = advance(s0, &track, 0.1);
        let b = advance(s0, &track, 0.1);
        assert_eq!(a, b);
        assert!(a.orientation.is_some());
        assert_eq!(s0, FollowerState::default());
    }

    #[test]
    fn degenerate_track_never_moves() {
        let p = LatLng::new(1.0, 2.0);
        let path = generate_path(p, p, Some(8));
        let mut follower = PathFollower::new(FlightTrack::plane(&path, 0.2));
        follower.tick(3.0);
        assert_eq!(follower.progress(), 0.0);
        assert_eq!(follower.pose(), None);
    }

    #[test]
    fn replacing_the_track_restarts() {
        let mut follower = PathFollower::new(sample_track());
        follower.tick(1.0);
        assert!(follower.progress() > 0.0);
        let path = generate_path(LatLng::new(0.0, 0.0), LatLng::new(0.0, 20.0), Some(16));
        follower.replace_track(FlightTrack::plane(&path, 0.2));
        assert_eq!(follower.state(), FollowerState::default());
    }
}
