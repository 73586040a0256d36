use lazy_static::lazy_static;
use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::shared::constants;

lazy_static! {
    static ref LOG_PATH: Mutex<Option<PathBuf>> = Mutex::new(None);
}

fn append_line(path: &Path, line: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{}", line);
    }
}

/// Start logging to `path` (truncated) and install a panic hook that puts
/// the cursor back before reporting.
///
/// Until this is called every log function is a no-op, so nothing but the
/// image ever reaches the terminal.
pub fn init(path: &Path) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    writeln!(
        file,
        "=== {} log started: {} ===",
        constants::APP_NAME,
        chrono::Local::now()
    )?;

    let path = path.to_path_buf();
    if let Ok(mut guard) = LOG_PATH.lock() {
        *guard = Some(path.clone());
    }

    panic::set_hook(Box::new(move |info| {
        let backtrace = Backtrace::capture();
        let msg = match info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => match info.payload().downcast_ref::<String>() {
                Some(s) => &s[..],
                None => "Box<Any>",
            },
        };

        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());

        append_line(
            &path,
            &format!(
                "\nCRITICAL PANIC at {}:\nMessage: {}\nBacktrace:\n{:?}\n",
                location, msg, backtrace
            ),
        );

        crate::utils::terminal_control::restore_cursor();
        eprintln!("{} crashed. See {} for details.", constants::APP_NAME, path.display());
    }));

    Ok(())
}

pub fn log(level: &str, msg: &str) {
    let Ok(guard) = LOG_PATH.lock() else {
        return;
    };
    if let Some(path) = guard.as_ref() {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        append_line(path, &format!("[{}][{}] {}", timestamp, level, msg));
    }
}

pub fn info(msg: &str) {
    log("INFO", msg);
}

pub fn error(msg: &str) {
    log("ERROR", msg);
}

pub fn debug(msg: &str) {
    log("DEBUG", msg);
}
