#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grid Chase adapters.

use std::fmt;

use anyhow::Result as AnyResult;
use grid_chase_core::{GlyphMatrix, Legend, SessionState};

/// Key bindings shown beneath the legend.
pub const KEY_HELP: [&str; 5] = [
    "w: move up",
    "a: move left",
    "s: move down",
    "d: move right",
    "esc: quit",
];

/// Summary of the session printed under the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    /// Session state after the latest tick.
    pub state: SessionState,
    /// Ticks resolved so far.
    pub tick: u64,
    /// Consumables still waiting to be collected.
    pub remaining: usize,
}

impl Status {
    /// Message announced once the session has ended.
    #[must_use]
    pub const fn banner(&self) -> Option<&'static str> {
        match self.state {
            SessionState::Running => None,
            SessionState::Lost => Some("Game Over!"),
            SessionState::Won => Some("Game Clear!"),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} | remaining {}", self.tick, self.remaining)?;
        if let Some(banner) = self.banner() {
            write!(f, " | {banner}")?;
        }
        Ok(())
    }
}

/// Fully composed text frame ready to be presented.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    header: Vec<String>,
    rows: Vec<String>,
    status: Status,
}

impl Frame {
    /// Composes the legend header, key help, grid rows and status line.
    #[must_use]
    pub fn compose(matrix: &GlyphMatrix, legend: &Legend, status: Status) -> Self {
        let mut header = legend_lines(legend);
        header.extend(KEY_HELP.iter().map(|line| (*line).to_owned()));

        let rows: Vec<String> = matrix
            .rows()
            .map(|row| row.iter().map(|glyph| glyph.as_str()).collect::<String>())
            .collect();

        Self {
            header,
            rows,
            status,
        }
    }

    /// Legend and key help lines printed above the grid.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Grid rows, top to bottom, with cells concatenated left to right.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Status summarised under the grid.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Every line of the frame in presentation order.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.header
            .iter()
            .cloned()
            .chain(std::iter::once(String::new()))
            .chain(self.rows.iter().cloned())
            .chain(std::iter::once(String::new()))
            .chain(std::iter::once(self.status.to_string()))
    }
}

/// One line per entity kind naming the glyph that draws it.
#[must_use]
pub fn legend_lines(legend: &Legend) -> Vec<String> {
    vec![
        format!("{}: player", legend.player),
        format!("{}: adversary", legend.adversary),
        format!("{}: consumable", legend.consumable),
        format!("{}: wall", legend.wall),
    ]
}

/// Rendering backend capable of presenting Grid Chase frames.
pub trait RenderingBackend {
    /// Replaces whatever the backend showed before with `frame`.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_chase_core::{Glyph, Position};

    fn running(tick: u64, remaining: usize) -> Status {
        Status {
            state: SessionState::Running,
            tick,
            remaining,
        }
    }

    #[test]
    fn rows_concatenate_cells_without_separators() {
        let legend = Legend::default();
        let mut matrix = GlyphMatrix::filled(3, &legend.blank);
        let _ = matrix.stamp(Position::new(1, 0), &legend.player);
        let _ = matrix.stamp(Position::new(2, 2), &Glyph::new("e1"));

        let frame = Frame::compose(&matrix, &legend, running(0, 1));

        assert_eq!(frame.rows(), ["_P_", "___", "__e1"]);
    }

    #[test]
    fn header_lists_legend_then_key_help() {
        let legend = Legend::default();
        let matrix = GlyphMatrix::filled(4, &legend.blank);

        let frame = Frame::compose(&matrix, &legend, running(0, 3));

        assert_eq!(frame.header()[0], "P: player");
        assert_eq!(frame.header()[3], "#: wall");
        assert_eq!(frame.header()[4], "w: move up");
        assert_eq!(frame.header().len(), 4 + KEY_HELP.len());
    }

    #[test]
    fn status_line_announces_terminal_states() {
        assert_eq!(running(4, 2).to_string(), "tick 4 | remaining 2");

        let lost = Status {
            state: SessionState::Lost,
            ..running(5, 2)
        };
        assert_eq!(lost.to_string(), "tick 5 | remaining 2 | Game Over!");

        let won = Status {
            state: SessionState::Won,
            ..running(9, 0)
        };
        assert_eq!(won.banner(), Some("Game Clear!"));
    }

    #[test]
    fn lines_place_grid_between_header_and_status() {
        let legend = Legend::default();
        let matrix = GlyphMatrix::filled(4, &legend.blank);
        let frame = Frame::compose(&matrix, &legend, running(1, 3));

        let lines: Vec<String> = frame.lines().collect();

        assert_eq!(lines.len(), frame.header().len() + 1 + 4 + 1 + 1);
        assert_eq!(lines[frame.header().len() + 1], "____");
        assert_eq!(lines.last().map(String::as_str), Some("tick 1 | remaining 3"));
    }
}
