use crate::shared::constants::DEFAULT_TERMINAL_COLUMNS;

/// Target render size in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

/// How a source should be sized for the terminal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SizeRequest {
    pub terminal_columns: u32,
    /// Overrides the width when > 0.
    pub forced_width: u32,
    /// Overrides the height when > 0.
    pub forced_height: u32,
    pub keep_size: bool,
}

impl SizeRequest {
    pub fn resolve(&self, source_width: u32, source_height: u32) -> Geometry {
        resolve_size(
            source_width,
            source_height,
            self.terminal_columns,
            self.forced_width,
            self.forced_height,
            self.keep_size,
        )
    }
}

/// Fit a source into the terminal width, keeping its aspect ratio.
///
/// Sources wider than `terminal_columns + 1` shrink to `terminal_columns - 1`
/// pixels; the scaled height is truncated. Forced values win per axis, even
/// with `keep_size`.
pub fn resolve_size(
    source_width: u32,
    source_height: u32,
    terminal_columns: u32,
    forced_width: u32,
    forced_height: u32,
    keep_size: bool,
) -> Geometry {
    let (mut width, mut height) = (source_width, source_height);

    if !keep_size && source_width.saturating_sub(1) > terminal_columns {
        let resized_width = terminal_columns.saturating_sub(1);
        width = resized_width;
        height = (source_height as u64 * resized_width as u64 / source_width as u64) as u32;
    }

    if forced_width > 0 {
        width = forced_width;
    }
    if forced_height > 0 {
        height = forced_height;
    }

    Geometry {
        width: width.max(1),
        height: height.max(1),
    }
}

/// Column count of the controlling terminal.
///
/// Asks stdout first, then stdin, and falls back to 80 columns.
pub fn terminal_columns() -> u32 {
    match query_columns() {
        Some(cols) => cols,
        None => {
            crate::utils::logger::debug(&format!(
                "terminal size unavailable, assuming {} columns",
                DEFAULT_TERMINAL_COLUMNS
            ));
            DEFAULT_TERMINAL_COLUMNS
        }
    }
}

#[cfg(unix)]
fn query_columns() -> Option<u32> {
    [libc::STDOUT_FILENO, libc::STDIN_FILENO]
        .into_iter()
        .find_map(|fd| {
            let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
            let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) };
            (result == 0 && ws.ws_col > 0).then_some(ws.ws_col as u32)
        })
}

#[cfg(not(unix))]
fn query_columns() -> Option<u32> {
    crossterm::terminal::size()
        .ok()
        .filter(|(cols, _)| *cols > 0)
        .map(|(cols, _)| cols as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_source_is_clamped_to_columns() {
        assert_eq!(
            resolve_size(100, 50, 60, 0, 0, false),
            Geometry { width: 59, height: 29 }
        );
    }

    #[test]
    fn test_resized_height_is_exact_when_divisible() {
        assert_eq!(
            resolve_size(11, 99, 4, 0, 0, false),
            Geometry { width: 3, height: 27 }
        );
        assert_eq!(
            resolve_size(10, 330, 8, 0, 0, false),
            Geometry { width: 7, height: 231 }
        );
    }

    #[test]
    fn test_small_source_keeps_its_size() {
        assert_eq!(
            resolve_size(40, 30, 80, 0, 0, false),
            Geometry { width: 40, height: 30 }
        );
        // width - 1 == columns is still considered to fit
        assert_eq!(
            resolve_size(81, 10, 80, 0, 0, false),
            Geometry { width: 81, height: 10 }
        );
    }

    #[test]
    fn test_forced_width_overrides_keep_size() {
        assert_eq!(
            resolve_size(640, 480, 80, 40, 0, true),
            Geometry { width: 40, height: 480 }
        );
    }

    #[test]
    fn test_forced_values_apply_per_axis_after_resize() {
        assert_eq!(
            resolve_size(200, 100, 100, 0, 20, false),
            Geometry { width: 99, height: 20 }
        );
    }

    #[test]
    fn test_keep_size_ignores_terminal() {
        assert_eq!(
            resolve_size(1000, 10, 80, 0, 0, true),
            Geometry { width: 1000, height: 10 }
        );
    }

    #[test]
    fn test_degenerate_results_are_clamped() {
        assert_eq!(resolve_size(500, 1, 1, 0, 0, false), Geometry { width: 1, height: 1 });
    }

    #[test]
    fn test_size_request_resolve() {
        let req = SizeRequest {
            terminal_columns: 60,
            forced_width: 0,
            forced_height: 0,
            keep_size: false,
        };
        assert_eq!(req.resolve(100, 50), Geometry { width: 59, height: 29 });
    }
}
