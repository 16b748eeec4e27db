//! Terminal seam used by the runner for echoing and erasing output.

use std::io::{self, Write};

use crossterm::{
    cursor::{MoveToColumn, MoveUp},
    queue,
    terminal::{self, Clear, ClearType},
};

/// Width assumed when the terminal size cannot be queried.
const FALLBACK_WIDTH: u16 = 80;

/// Destination for echoed process output.
pub trait Console: Send + Sync {
    fn write_stdout(&self, chunk: &[u8]);

    fn write_stderr(&self, chunk: &[u8]);

    /// Terminal width in columns.
    fn width(&self) -> u16;

    /// Move to column 0, go up `rows - 1` rows and clear to the end of screen.
    fn erase_rows(&self, rows: usize);
}

/// The real terminal, driven through crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn write_stdout(&self, chunk: &[u8]) {
        let mut out = io::stdout().lock();
        let _ = out.write_all(chunk).and_then(|()| out.flush());
    }

    fn write_stderr(&self, chunk: &[u8]) {
        let mut err = io::stderr().lock();
        let _ = err.write_all(chunk).and_then(|()| err.flush());
    }

    fn width(&self) -> u16 {
        terminal::size().map(|(cols, _)| cols).unwrap_or(FALLBACK_WIDTH)
    }

    fn erase_rows(&self, rows: usize) {
        let up = u16::try_from(rows.saturating_sub(1)).unwrap_or(u16::MAX);
        if let Err(e) = erase(&mut io::stdout().lock(), up) {
            tracing::debug!("failed to erase echoed output: {e}");
        }
    }
}

fn erase(out: &mut impl Write, up: u16) -> io::Result<()> {
    queue!(out, MoveToColumn(0))?;
    if up > 0 {
        queue!(out, MoveUp(up))?;
    }
    queue!(out, Clear(ClearType::FromCursorDown))?;
    out.flush()
}
