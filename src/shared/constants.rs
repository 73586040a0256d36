pub const APP_NAME: &str = "icat";

pub const CONFIG_DIR: &str = "icat";
pub const CONFIG_FILE: &str = "icat.config";

/// Path argument meaning "read the source from stdin".
pub const STDIN_PATH: &str = "-";

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "webm"];

/// Columns assumed when the terminal cannot be queried.
pub const DEFAULT_TERMINAL_COLUMNS: u32 = 80;

/// Frame rate used when every hint of a source is degenerate.
pub const DEFAULT_FRAME_RATE: f64 = 25.0;
/// Rates below this are treated as missing.
pub const MIN_FRAME_RATE: f64 = 0.000025;

/// Default GIF frame delay in seconds, used as the GIF time base.
pub const GIF_DEFAULT_DELAY_SECS: (i32, i32) = (1, 10);

pub const UPPER_HALF_BLOCK: &str = "▀";
pub const LOWER_HALF_BLOCK: &str = "▄";

pub const SGR_RESET: &[u8] = b"\x1b[0m";
pub const CURSOR_HOME: &[u8] = b"\x1b[H";
