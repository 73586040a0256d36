use std::io::Write;
use std::time::Duration;

use super::cancel::CancellationToken;
use super::clock::PlaybackClock;
use crate::decoder::FrameSource;
use crate::error::RenderResult;
use crate::renderer::{FrameRenderer, RenderOutcome};

/// Blocks the render loop between frames.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Plain `std::thread::sleep`.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<F: FnMut(Duration)> Sleeper for F {
    fn sleep(&mut self, duration: Duration) {
        self(duration)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackEnd {
    /// The renderer reported the end of the source.
    Finished(RenderOutcome),
    /// The token was cancelled between two frames.
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackSummary {
    pub frames: u64,
    pub frame_rate: f64,
    pub slept: Duration,
    pub end: PlaybackEnd,
}

/// Plays a multi-frame source in real time.
///
/// The pacer never drops frames: when rendering falls behind the source's
/// frame rate it simply stops sleeping until it catches up. Cancellation is
/// only observed before a frame starts.
pub struct Pacer<'a, S: Sleeper = ThreadSleeper> {
    cancel: &'a CancellationToken,
    sleeper: S,
}

impl<'a, S: Sleeper> Pacer<'a, S> {
    pub fn with_sleeper(cancel: &'a CancellationToken, sleeper: S) -> Self {
        Self { cancel, sleeper }
    }

    pub fn run<W: Write>(
        &mut self,
        source: &mut dyn FrameSource,
        renderer: &mut FrameRenderer<W>,
    ) -> RenderResult<PlaybackSummary> {
        let frame_rate = source.info().frame_rate.resolve();
        let mut clock = PlaybackClock::new(frame_rate);
        let mut slept = Duration::ZERO;

        crate::utils::logger::debug(&format!("playback at {:.3} fps", clock.frame_rate()));

        let end = loop {
            if self.cancel.is_cancelled() {
                break PlaybackEnd::Cancelled;
            }

            match renderer.render_next(source)? {
                RenderOutcome::Continue => {}
                outcome => break PlaybackEnd::Finished(outcome),
            }

            clock.tick();
            let repose = clock.repose(clock.elapsed());
            if !repose.is_zero() {
                self.sleeper.sleep(repose);
                slept += repose;
            }
        };

        Ok(PlaybackSummary {
            frames: clock.frames(),
            frame_rate: clock.frame_rate(),
            slept,
            end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::frame_data::FrameData;
    use crate::decoder::memory::MemorySource;
    use crate::renderer::RenderMode;
    use crate::sync::FrameRateHints;

    fn source(frames: usize, fps: f64) -> MemorySource {
        let frame = FrameData::new(vec![0; 2 * 2 * 3], 2, 2, 3);
        MemorySource::new(
            vec![frame; frames],
            FrameRateHints {
                real: Some(fps),
                ..FrameRateHints::default()
            },
        )
    }

    #[test]
    fn test_plays_every_frame_then_finishes() {
        let token = CancellationToken::new();
        let mut sleeps = Vec::new();
        let mut src = source(3, 1.0);
        let mut renderer = FrameRenderer::new(Vec::new(), RenderMode::Indexed, 0);

        let summary = Pacer::with_sleeper(&token, |d: Duration| sleeps.push(d))
            .run(&mut src, &mut renderer)
            .unwrap();

        assert_eq!(summary.frames, 3);
        assert_eq!(summary.end, PlaybackEnd::Finished(RenderOutcome::Done));
        assert_eq!(summary.frame_rate, 1.0);
        // One wait after each frame, each close to a full second behind the ideal.
        assert_eq!(sleeps.len(), 3);
        assert!(sleeps.iter().all(|d| *d > Duration::from_millis(500)));
    }

    #[test]
    fn test_does_not_sleep_when_behind() {
        let token = CancellationToken::new();
        let mut sleeps = Vec::new();
        let mut src = source(4, 1e9);
        let mut renderer = FrameRenderer::new(Vec::new(), RenderMode::Indexed, 0);

        let summary = Pacer::with_sleeper(&token, |d: Duration| sleeps.push(d))
            .run(&mut src, &mut renderer)
            .unwrap();

        assert_eq!(summary.frames, 4);
        assert!(sleeps.is_empty());
        assert_eq!(summary.slept, Duration::ZERO);
    }

    #[test]
    fn test_cancel_during_sleep_stops_before_next_frame() {
        let token = CancellationToken::new();
        let remote = token.clone();
        let mut src = source(10, 1.0);
        let mut renderer = FrameRenderer::new(Vec::new(), RenderMode::Indexed, 0);

        let summary = Pacer::with_sleeper(&token, |_: Duration| remote.cancel())
            .run(&mut src, &mut renderer)
            .unwrap();

        assert_eq!(summary.end, PlaybackEnd::Cancelled);
        assert_eq!(summary.frames, 1);
        assert_eq!(renderer.frames_rendered(), 1);
    }

    #[test]
    fn test_cancelled_before_start_renders_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let mut src = source(2, 30.0);
        let mut renderer = FrameRenderer::new(Vec::new(), RenderMode::Indexed, 0);

        let summary = Pacer::with_sleeper(&token, ThreadSleeper).run(&mut src, &mut renderer).unwrap();
        assert_eq!(summary.end, PlaybackEnd::Cancelled);
        assert!(renderer.writer().is_empty());
    }

    #[test]
    fn test_degenerate_rate_uses_fallback_chain() {
        let token = CancellationToken::new();
        let frame = FrameData::new(vec![0; 3], 1, 1, 3);
        let mut src = MemorySource::new(
            vec![frame],
            FrameRateHints {
                real: Some(0.0),
                average: Some(24.0),
                time_base: None,
            },
        );
        let mut renderer = FrameRenderer::new(Vec::new(), RenderMode::Indexed, 0);

        let summary = Pacer::with_sleeper(&token, |_: Duration| {})
            .run(&mut src, &mut renderer)
            .unwrap();
        assert_eq!(summary.frame_rate, 24.0);
    }
}
