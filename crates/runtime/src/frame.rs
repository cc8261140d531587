use foundation::time::Time;

/// Per-frame tick metadata.
///
/// This is the only timebase the engine sees. Delta times are supplied by the
/// host (wall clock or a script), which keeps every update replayable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Elapsed time since the previous frame (seconds, never negative).
    pub dt_s: f64,
    /// Engine time at the end of this frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn first(dt_s: f64) -> Self {
        let dt_s = sanitize_dt(dt_s);
        Self {
            index: 0,
            dt_s,
            time: Time::ZERO.advanced_by(dt_s),
        }
    }

    pub fn next(self, dt_s: f64) -> Self {
        let dt_s = sanitize_dt(dt_s);
        Self {
            index: self.index + 1,
            dt_s,
            time: self.time.advanced_by(dt_s),
        }
    }
}

/// Turns a stream of delta times into [`Frame`]s.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last: Option<Frame>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, dt_s: f64) -> Frame {
        let frame = match self.last {
            Some(prev) => prev.next(dt_s),
            None => Frame::first(dt_s),
        };
        self.last = Some(frame);
        frame
    }

    pub fn last(&self) -> Option<Frame> {
        self.last
    }
}

fn sanitize_dt(dt_s: f64) -> f64 {
    if dt_s.is_finite() && dt_s > 0.0 { dt_s } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::{Frame, FrameClock};
    use foundation::time::Time;

    #[test]
    fn frame_time_is_deterministic() {
        let a = Frame::first(0.5).next(0.25);
        let b = Frame::first(0.5).next(0.25);
        assert_eq!(a, b);
        assert_eq!(a.index, 1);
        assert_eq!(a.time, Time(0.75));
    }

    #[test]
    fn clock_counts_frames() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(0.1).index, 0);
        assert_eq!(clock.tick(0.1).index, 1);
        assert_eq!(clock.last().map(|f| f.index), Some(1));
    }

    #[test]
    fn negative_and_nan_deltas_are_zeroed() {
        let mut clock = FrameClock::new();
        clock.tick(1.0);
        let f = clock.tick(-3.0);
        assert_eq!(f.dt_s, 0.0);
        assert_eq!(f.time, Time(1.0));
        assert_eq!(clock.tick(f64::NAN).dt_s, 0.0);
    }
}
