use crossterm::{cursor, queue};
use std::io::{self, Write};

use crate::shared::constants::CURSOR_HOME;

/// Writer that hides the terminal cursor for as long as it lives.
///
/// The cursor is shown again when the wrapper is dropped, so it comes back
/// on early returns and errors too.
pub struct HiddenCursor<W: Write> {
    inner: W,
}

impl<W: Write> HiddenCursor<W> {
    /// Home the cursor and hide it.
    pub fn new(mut inner: W) -> io::Result<Self> {
        inner.write_all(CURSOR_HOME)?;
        queue!(inner, cursor::Hide)?;
        Ok(Self { inner })
    }
}

impl<W: Write> Write for HiddenCursor<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> Drop for HiddenCursor<W> {
    fn drop(&mut self) {
        let _ = queue!(self.inner, cursor::Show);
        let _ = self.inner.flush();
    }
}

/// Show the cursor on stdout. Used from the panic hook.
pub fn restore_cursor() {
    let mut stdout = io::stdout();
    let _ = queue!(stdout, cursor::Show);
    let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hides_on_create_and_shows_on_drop() {
        let mut out = Vec::new();
        {
            let mut guarded = HiddenCursor::new(&mut out).unwrap();
            guarded.write_all(b"img").unwrap();
        }
        assert_eq!(out, b"\x1b[H\x1b[?25limg\x1b[?25h");
    }
}
