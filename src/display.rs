use std::io;

use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

use crate::framebuffer::{Framebuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Display is used to put finished frames in front of the user. It should
/// abstract the implementation details, so a variety of kinds of screen
/// would work; the machine knows nothing about colour, scaling or windows.
pub trait Display {
    /// render one frame
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error>;
}

/// canvas coordinates of every pixel in `frame` whose state matches `lit`.
/// tui canvases grow upward, the framebuffer grows downward, hence the
/// negated y
fn plot(frame: &Framebuffer, lit: bool) -> Vec<(f64, f64)> {
    let mut coords = Vec::new();
    for (y, row) in frame.rows().iter().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            if px == lit {
                coords.push((x as f64, -1.0 * y as f64));
            }
        }
    }
    coords
}

fn x_bounds() -> [f64; 2] {
    [0.0, (DISPLAY_WIDTH - 1) as f64]
}

fn y_bounds() -> [f64; 2] {
    [-1.0 * (DISPLAY_HEIGHT - 1) as f64, 0.0]
}

/// monochrome display in a terminal, rendered with TUI over crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay { terminal })
    }

    /// draw a fixed pattern; handy for eyeballing the render path without
    /// loading a program
    pub fn test_card(&mut self) -> Result<(), io::Error> {
        self.draw(&test_card())
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        // a 1:1 ratio between terminal cells, chip-8 pixels and the
        // internal TUI canvas, plus the border
        self.terminal.draw(|f| {
            let size = Rect::new(
                0,
                0,
                2 + DISPLAY_WIDTH as u16,
                2 + DISPLAY_HEIGHT as u16,
            );

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(x_bounds())
                .y_bounds(y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &plot(frame, false),
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &plot(frame, true),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// a border plus a checkerboard; enough structure to spot scaling and
/// orientation mistakes
pub fn test_card() -> Framebuffer {
    let mut packed = [0u8; DISPLAY_WIDTH * DISPLAY_HEIGHT / 8];
    for (i, byte) in packed.iter_mut().enumerate() {
        let row = i / (DISPLAY_WIDTH / 8);
        *byte = if row == 0 || row == DISPLAY_HEIGHT - 1 {
            0xFF
        } else if row % 2 == 0 {
            0xAA
        } else {
            0x55
        };
        // left and right edges
        if i % (DISPLAY_WIDTH / 8) == 0 {
            *byte |= 0x80;
        }
        if i % (DISPLAY_WIDTH / 8) == DISPLAY_WIDTH / 8 - 1 {
            *byte |= 0x01;
        }
    }
    Framebuffer::from_packed(&packed)
}

/// useful for testing non-display routines
pub struct DummyDisplay {
    pub frames_drawn: usize,
}

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay { frames_drawn: 0 }
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, _frame: &Framebuffer) -> Result<(), io::Error> {
        self.frames_drawn += 1;
        Ok(())
    }
}
