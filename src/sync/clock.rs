use std::time::{Duration, Instant};

use crate::shared::constants::{DEFAULT_FRAME_RATE, MIN_FRAME_RATE};

/// A `num/den` ratio as reported by decoders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// The ratio as a float; 0 when either side is 0.
    pub fn to_f64(self) -> f64 {
        if self.num == 0 || self.den == 0 {
            0.0
        } else {
            self.num as f64 / self.den as f64
        }
    }
}

/// Frame-rate information a source can offer, best first.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameRateHints {
    /// The stream's real (base) frame rate.
    pub real: Option<f64>,
    /// The stream's average frame rate.
    pub average: Option<f64>,
    /// The codec time base; its reciprocal is the last resort.
    pub time_base: Option<Rational>,
}

impl FrameRateHints {
    /// Pick a usable frame rate: real rate, else average rate, else the
    /// reciprocal of the time base, else [`DEFAULT_FRAME_RATE`].
    ///
    /// The result is always finite and positive.
    pub fn resolve(&self) -> f64 {
        let reciprocal = self.time_base.map(|tb| {
            let seconds = tb.to_f64();
            if seconds == 0.0 {
                0.0
            } else {
                1.0 / seconds
            }
        });

        [self.real, self.average, reciprocal]
            .into_iter()
            .flatten()
            .find(|fps| usable(*fps))
            .unwrap_or(DEFAULT_FRAME_RATE)
    }
}

fn usable(fps: f64) -> bool {
    fps.is_finite() && fps >= MIN_FRAME_RATE
}

/// Wall-clock bookkeeping for one playing source.
///
/// Starts at the first frame; after frame `n` the ideal elapsed time is
/// `n / frame_rate`.
pub struct PlaybackClock {
    start: Instant,
    frames: u64,
    frame_rate: f64,
}

impl PlaybackClock {
    pub fn new(frame_rate: f64) -> Self {
        let frame_rate = if usable(frame_rate) { frame_rate } else { DEFAULT_FRAME_RATE };
        Self {
            start: Instant::now(),
            frames: 0,
            frame_rate,
        }
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Count a rendered frame.
    pub fn tick(&mut self) {
        self.frames += 1;
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Where playback should be after the frames counted so far.
    pub fn ideal_elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.frames as f64 / self.frame_rate)
    }

    /// How long to wait before the next frame, given the actual elapsed time.
    /// Zero when playback is already behind.
    pub fn repose(&self, actual_elapsed: Duration) -> Duration {
        self.ideal_elapsed().saturating_sub(actual_elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_rate_wins() {
        let hints = FrameRateHints {
            real: Some(30.0),
            average: Some(24.0),
            time_base: Some(Rational::new(1, 90000)),
        };
        assert_eq!(hints.resolve(), 30.0);
    }

    #[test]
    fn test_degenerate_real_rate_falls_back_to_average() {
        let hints = FrameRateHints {
            real: Some(0.0),
            average: Some(24.0),
            time_base: Some(Rational::new(1, 1000)),
        };
        assert_eq!(hints.resolve(), 24.0);

        let hints = FrameRateHints {
            real: Some(0.00001),
            ..hints
        };
        assert_eq!(hints.resolve(), 24.0);
    }

    #[test]
    fn test_time_base_reciprocal_is_last_hint() {
        let hints = FrameRateHints {
            real: None,
            average: Some(0.0),
            time_base: Some(Rational::new(1, 50)),
        };
        assert_eq!(hints.resolve(), 50.0);
    }

    #[test]
    fn test_everything_degenerate_uses_default() {
        let hints = FrameRateHints {
            real: Some(f64::NAN),
            average: Some(-3.0),
            time_base: Some(Rational::new(0, 1)),
        };
        assert_eq!(hints.resolve(), DEFAULT_FRAME_RATE);
        assert_eq!(FrameRateHints::default().resolve(), DEFAULT_FRAME_RATE);
    }

    #[test]
    fn test_rational_with_zero_side_is_zero() {
        assert_eq!(Rational::new(5, 0).to_f64(), 0.0);
        assert_eq!(Rational::new(0, 5).to_f64(), 0.0);
        assert_eq!(Rational::new(1, 4).to_f64(), 0.25);
    }

    #[test]
    fn test_repose_is_never_negative() {
        let mut clock = PlaybackClock::new(10.0);
        clock.tick();
        assert_eq!(clock.ideal_elapsed(), Duration::from_millis(100));
        assert_eq!(clock.repose(Duration::from_millis(40)), Duration::from_millis(60));
        assert_eq!(clock.repose(Duration::from_millis(100)), Duration::ZERO);
        assert_eq!(clock.repose(Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn test_clock_rejects_bad_rates() {
        assert_eq!(PlaybackClock::new(0.0).frame_rate(), DEFAULT_FRAME_RATE);
        assert_eq!(PlaybackClock::new(f64::INFINITY).frame_rate(), DEFAULT_FRAME_RATE);
        assert_eq!(PlaybackClock::new(12.5).frame_rate(), 12.5);
    }
}
