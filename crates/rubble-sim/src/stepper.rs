use std::time::{Duration, Instant};

use rubble_core::Scalar;

/// What one call to `FixedStepper::advance` did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub steps: u32,
    /// The step cap was hit with at least one more whole slice pending, and
    /// that backlog was dropped.
    pub capped: bool,
    /// Wall time spent inside the tick callback loop.
    pub phys_time: Duration,
    /// Unsimulated time carried into the next frame (seconds).
    pub leftover: f64,
}

/// Accumulator-driven fixed tick. Frame time goes in, whole ticks come out;
/// under overload the backlog is dropped instead of spiralling.
#[derive(Clone, Debug)]
pub struct FixedStepper {
    slice: f64,
    max_steps: u32,
    accumulator: f64,
}

impl FixedStepper {
    /// `slice` must be positive; `SandboxConfig::validate` guarantees it.
    pub fn new(slice: f64, max_steps: u32) -> Self {
        Self { slice, max_steps, accumulator: 0.0 }
    }

    #[inline] pub fn slice(&self) -> f64 { self.slice }
    #[inline] pub fn max_steps(&self) -> u32 { self.max_steps }
    #[inline] pub fn accumulator(&self) -> f64 { self.accumulator }

    /// Adds `frame_dt` seconds and runs `tick(slice)` while a whole slice is
    /// available, at most `max_steps + 1` times. A whole slice still pending
    /// after that is dropped along with the rest of the accumulator. Negative
    /// or non-finite input counts as 0.
    pub fn advance<F: FnMut(Scalar)>(&mut self, frame_dt: f64, mut tick: F) -> FrameReport {
        let dt = if frame_dt.is_finite() && frame_dt > 0.0 { frame_dt } else { 0.0 };
        self.accumulator += dt;

        let start = Instant::now();
        let mut steps = 0u32;
        let mut capped = false;
        while self.accumulator >= self.slice {
            if steps > self.max_steps {
                self.accumulator = 0.0;
                capped = true;
                break;
            }
            tick(self.slice as Scalar);
            self.accumulator -= self.slice;
            steps += 1;
        }
        FrameReport { steps, capped, phys_time: start.elapsed(), leftover: self.accumulator }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SLICE: f64 = 1.0 / 240.0;

    #[test]
    fn sixtieth_of_a_second_runs_four_ticks() {
        let mut s = FixedStepper::new(SLICE, 6);
        let mut n = 0;
        // slightly over four slices so rounding cannot drop the last one
        let r = s.advance(4.0 * SLICE + 1e-9, |h| {
            assert_abs_diff_eq!(h, (1.0 / 240.0) as f32);
            n += 1;
        });
        assert_eq!((n, r.steps, r.capped), (4, 4, false));
        assert!(r.leftover >= 0.0 && r.leftover < SLICE);
    }

    #[test]
    fn short_frames_accumulate() {
        let mut s = FixedStepper::new(SLICE, 6);
        let r = s.advance(SLICE * 0.6, |_| {});
        assert_eq!(r.steps, 0);
        assert_abs_diff_eq!(r.leftover, SLICE * 0.6, epsilon = 1e-12);
        let r = s.advance(SLICE * 0.6, |_| {});
        assert_eq!(r.steps, 1);
        assert_abs_diff_eq!(r.leftover, SLICE * 0.2, epsilon = 1e-12);
    }

    #[test]
    fn overload_drops_backlog() {
        let mut s = FixedStepper::new(SLICE, 6);
        let mut n = 0;
        let r = s.advance(1.0, |_| n += 1);
        assert!(r.capped);
        assert_eq!(n, 7);
        assert_eq!(r.leftover, 0.0);
        assert_eq!(s.accumulator(), 0.0);
    }

    #[test]
    fn exact_cap_worth_of_slices_is_not_capped() {
        let mut s = FixedStepper::new(SLICE, 6);
        let r = s.advance(7.0 * SLICE + 1e-9, |_| {});
        assert_eq!((r.steps, r.capped), (7, false));
        assert!(r.leftover > 0.0 && r.leftover < SLICE);

        // one more whole slice on top is dropped
        let mut s = FixedStepper::new(SLICE, 6);
        let r = s.advance(8.0 * SLICE + 1e-9, |_| {});
        assert_eq!((r.steps, r.capped, r.leftover), (7, true, 0.0));
    }

    #[test]
    fn bogus_frame_times_are_ignored() {
        let mut s = FixedStepper::new(SLICE, 6);
        for dt in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let r = s.advance(dt, |_| panic!("no tick expected"));
            assert_eq!(r.steps, 0);
            assert_eq!(r.leftover, 0.0);
        }
    }
}
