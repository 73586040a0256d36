use std::io::Write;
use std::time::Duration;

use super::settings::Settings;
use crate::decoder::{open_source, FrameSource};
use crate::error::RenderResult;
use crate::renderer::geometry::terminal_columns;
use crate::renderer::{FrameRenderer, RenderOutcome};
use crate::sync::{CancellationToken, Pacer, PlaybackEnd};
use crate::sync::pacer::{Sleeper, ThreadSleeper};
use crate::utils::logger;
use crate::utils::terminal_control::HiddenCursor;

/// How a batch went.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Sources that got at least one frame on screen.
    pub rendered: usize,
    /// Sources that could not be opened or produced nothing.
    pub failed: usize,
    pub cancelled: bool,
}

/// Render every path in turn to `out`.
///
/// The cursor is hidden for the whole batch and shown again on the way out.
/// A source that cannot be opened is logged and skipped; only a failing
/// output aborts the batch.
pub fn play_batch<W: Write>(
    paths: &[String],
    settings: &Settings,
    cancel: &CancellationToken,
    out: W,
) -> RenderResult<BatchReport> {
    let request = settings.size_request(terminal_columns());
    run_batch(
        paths,
        settings,
        cancel,
        out,
        ThreadSleeper,
        |path: &str| open_source(path, &request),
    )
}

fn run_batch<W, S, F>(
    paths: &[String],
    settings: &Settings,
    cancel: &CancellationToken,
    out: W,
    mut sleeper: S,
    mut open: F,
) -> RenderResult<BatchReport>
where
    W: Write,
    S: Sleeper,
    F: FnMut(&str) -> RenderResult<Box<dyn FrameSource>>,
{
    let mut out = HiddenCursor::new(out)?;
    let mut report = BatchReport::default();

    // Several images can't share one absolute position.
    let row = if paths.len() > 1 { 0 } else { settings.row };

    for path in paths {
        if cancel.is_cancelled() {
            break;
        }

        let mut source = match open(path) {
            Ok(source) => source,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                logger::error(&e.to_string());
                report.failed += 1;
                continue;
            }
        };

        let info = *source.info();
        logger::debug(&format!(
            "{}: {}x{}, alpha: {}, frames: {:?}",
            path, info.width, info.height, info.has_alpha, info.frame_count
        ));

        if row > 0 {
            write!(out, "\x1b[{};{}H", row, settings.column)?;
        }

        let mut renderer = FrameRenderer::new(&mut out, settings.mode, settings.column);
        let drawn = if info.frame_count == Some(1) {
            renderer.render_next(source.as_mut())? == RenderOutcome::Continue
        } else {
            let summary = Pacer::with_sleeper(cancel, |d: Duration| sleeper.sleep(d))
                .run(source.as_mut(), &mut renderer)?;
            logger::debug(&format!(
                "{}: {} frames at {:.3} fps, slept {:?}, {:?}",
                path, summary.frames, summary.frame_rate, summary.slept, summary.end
            ));
            summary.end != PlaybackEnd::Finished(RenderOutcome::Failed)
                && renderer.frames_rendered() > 0
        };

        if drawn {
            report.rendered += 1;
        } else {
            logger::error(&format!("{}: no frame could be rendered", path));
            report.failed += 1;
        }
    }

    out.flush()?;
    report.cancelled = cancel.is_cancelled();
    logger::info(&format!(
        "batch done: {} rendered, {} failed, cancelled: {}",
        report.rendered, report.failed, report.cancelled
    ));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::frame_data::FrameData;
    use crate::decoder::memory::MemorySource;
    use crate::error::RenderError;
    use crate::renderer::RenderMode;
    use crate::sync::FrameRateHints;
    use std::io;

    fn still() -> Box<dyn FrameSource> {
        let frame = FrameData::new(vec![255, 0, 0, 0, 0, 255], 1, 2, 3);
        Box::new(MemorySource::new(vec![frame], FrameRateHints::default()))
    }

    fn animation(frames: usize) -> Box<dyn FrameSource> {
        let frame = FrameData::new(vec![0; 3], 1, 1, 3);
        Box::new(MemorySource::new(
            vec![frame; frames],
            FrameRateHints {
                real: Some(1.0),
                ..FrameRateHints::default()
            },
        ))
    }

    fn paths(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn opener(path: &str) -> RenderResult<Box<dyn FrameSource>> {
        match path {
            "still" => Ok(still()),
            "anim" => Ok(animation(3)),
            "empty" => Ok(Box::new(MemorySource::new(Vec::new(), FrameRateHints::default()))),
            _ => Err(RenderError::source_open(path, "no such file")),
        }
    }

    fn text(out: &[u8]) -> String {
        String::from_utf8_lossy(out).into_owned()
    }

    #[test]
    fn test_single_still_with_row_and_column() {
        let settings = Settings {
            row: 4,
            column: 7,
            ..Settings::default()
        };
        let mut out = Vec::new();
        let report = run_batch(
            &paths(&["still"]),
            &settings,
            &CancellationToken::new(),
            &mut out,
            |_: Duration| {},
            opener,
        )
        .unwrap();

        assert_eq!(report, BatchReport { rendered: 1, failed: 0, cancelled: false });
        let out = text(&out);
        assert!(out.starts_with("\x1b[H\x1b[?25l\x1b[4;7H\x1b[7G"));
        assert!(out.ends_with("\x1b[0m\n\x1b[?25h"));
        assert!(out.contains("\x1b[38;5;21m\x1b[48;5;9m▄"));
    }

    #[test]
    fn test_failures_are_skipped_and_row_ignored_for_many() {
        let settings = Settings {
            row: 4,
            ..Settings::default()
        };
        let mut out = Vec::new();
        let report = run_batch(
            &paths(&["missing", "still", "empty", "anim"]),
            &settings,
            &CancellationToken::new(),
            &mut out,
            |_: Duration| {},
            opener,
        )
        .unwrap();

        assert_eq!(report, BatchReport { rendered: 2, failed: 2, cancelled: false });
        let out = text(&out);
        assert!(!out.contains("\x1b[4;"));
        // One still frame plus three animation frames, the last two homed.
        assert_eq!(out.matches("\x1b[0m\n").count(), 4);
        assert_eq!(out.matches("\x1b[H").count(), 3);
        assert!(out.ends_with("\x1b[?25h"));
    }

    #[test]
    fn test_cancel_stops_opening_sources() {
        let token = CancellationToken::new();
        let remote = token.clone();
        let mut opened = Vec::new();
        let mut out = Vec::new();

        let report = run_batch(
            &paths(&["anim", "still", "still"]),
            &Settings::default(),
            &token,
            &mut out,
            |_: Duration| remote.cancel(),
            |path: &str| {
                opened.push(path.to_string());
                opener(path)
            },
        )
        .unwrap();

        assert_eq!(opened, vec!["anim"]);
        assert_eq!(report, BatchReport { rendered: 1, failed: 0, cancelled: true });
        assert!(text(&out).ends_with("\x1b[?25h"));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_output_failure_aborts() {
        let err = run_batch(
            &paths(&["still"]),
            &Settings::default(),
            &CancellationToken::new(),
            ClosedPipe,
            |_: Duration| {},
            opener,
        )
        .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_true_color_mode_reaches_cells() {
        let settings = Settings {
            mode: RenderMode::TrueColor,
            ..Settings::default()
        };
        let mut out = Vec::new();
        run_batch(
            &paths(&["still"]),
            &settings,
            &CancellationToken::new(),
            &mut out,
            |_: Duration| {},
            opener,
        )
        .unwrap();
        assert!(text(&out).contains("\x1b[38;2;0;0;255m\x1b[48;2;255;0;0m▄"));
    }
}
