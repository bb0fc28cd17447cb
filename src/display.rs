use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::io;
use std::io::Write;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

use crate::framebuffer::Framebuffer;

/// Display is used by the interpreter to put the framebuffer on a screen,
/// once per 60Hz tick. It only ever gets a read-only view, so a variety of
/// kinds of screen would work.
pub trait Display {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error>;
}

/// lit or dark pixels as canvas coordinates; y grows downwards on the
/// CHIP-8 but upwards on a TUI canvas, hence the negation
fn bitplane(frame: &Framebuffer, lit: bool) -> Vec<(f64, f64)> {
    frame
        .rows()
        .enumerate()
        .flat_map(|(y, row)| {
            row.enumerate()
                .filter(move |(_, px)| *px == lit)
                .map(move |(x, _)| (x as f64, -(y as f64)))
        })
        .collect()
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(MonoTermDisplay { terminal })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        if let Err(e) = self.terminal.show_cursor() {
            log::error!("couldn't restore the cursor: {}", e);
        }
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        let (w, h) = (frame.width(), frame.height());
        let dark = bitplane(frame, false);
        let lit = bitplane(frame, true);

        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + w as u16, 2 + h as u16);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds([0.0, (w - 1) as f64])
                .y_bounds([-((h - 1) as f64), 0.0])
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &dark,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

const GLYPH_SET: char = '\u{2588}';
const GLYPH_CLEAR: char = ' ';

/// plain glyph grid: clear the screen, then one line of full blocks and
/// spaces per row. works on anything that takes bytes
pub struct GlyphDisplay<W: Write> {
    out: W,
}

impl<W: Write> GlyphDisplay<W> {
    pub fn new(out: W) -> Self {
        GlyphDisplay { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Display for GlyphDisplay<W> {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        for row in frame.rows() {
            let line: String = row
                .map(|px| if px { GLYPH_SET } else { GLYPH_CLEAR })
                .collect();
            // raw mode: no implicit carriage return
            write!(self.out, "{}\r\n", line)?;
        }
        self.out.flush()
    }
}

/// useful for testing non-display routines; keeps the last frame it was given
#[derive(Default)]
pub struct DummyDisplay {
    pub frames: usize,
    pub last: Option<Framebuffer>,
}

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        self.frames += 1;
        self.last = Some(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultKind;

    #[test]
    fn test_bitplanes_partition_screen() -> Result<(), FaultKind> {
        let mut fb = Framebuffer::new();
        fb.plot(3, 2)?;
        let lit = bitplane(&fb, true);
        let dark = bitplane(&fb, false);
        assert_eq!(lit, vec![(3.0, -2.0)]);
        assert_eq!(dark.len(), 64 * 32 - 1);
        Ok(())
    }

    #[test]
    fn test_glyph_grid() -> Result<(), Box<dyn std::error::Error>> {
        let mut fb = Framebuffer::new();
        fb.plot_row(0, 0, 0xc0)?;
        let mut d = GlyphDisplay::new(Vec::new());
        d.draw(&fb)?;
        let text = String::from_utf8(d.into_inner())?;
        let rows: Vec<&str> = text.split("\r\n").collect();
        // clear-screen escape, then 32 rows and a trailing empty split
        assert_eq!(rows.len(), 33);
        assert!(rows[0].ends_with(&format!("\u{2588}\u{2588}{}", " ".repeat(62))));
        assert_eq!(rows[1], " ".repeat(64));
        assert_eq!(rows[32], "");
        Ok(())
    }

    #[test]
    fn test_dummy_keeps_last_frame() -> Result<(), io::Error> {
        let mut d = DummyDisplay::new();
        let fb = Framebuffer::new();
        d.draw(&fb)?;
        d.draw(&fb)?;
        assert_eq!(d.frames, 2);
        assert_eq!(d.last, Some(fb));
        Ok(())
    }
}
