//! Terminal backend that redraws the whole frame on every present.

use std::io::Write;

use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use grid_chase_rendering::{Frame, RenderingBackend};

/// Writes frames to any byte sink, normally stdout.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W: Write> {
    out: W,
}

impl<W: Write> TerminalBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))
            .context("failed to clear terminal")?;
        // Raw mode does not translate `\n` into a carriage return.
        for line in frame.lines() {
            write!(self.out, "{line}\r\n").context("failed to write frame")?;
        }
        self.out.flush().context("failed to flush frame")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_chase_core::{GlyphMatrix, Legend, SessionState};
    use grid_chase_rendering::Status;

    #[test]
    fn present_writes_every_line_with_carriage_returns() {
        let legend = Legend::default();
        let matrix = GlyphMatrix::filled(4, &legend.blank);
        let frame = Frame::compose(
            &matrix,
            &legend,
            Status {
                state: SessionState::Won,
                tick: 3,
                remaining: 0,
            },
        );
        let mut backend = TerminalBackend::new(Vec::new());

        backend.present(&frame).expect("writing to memory succeeds");

        let written = String::from_utf8(backend.into_inner()).expect("utf-8 output");
        assert!(written.contains("P: player\r\n"));
        assert!(written.contains("____\r\n"));
        assert!(written.ends_with("tick 3 | remaining 0 | Game Clear!\r\n"));
    }
}
