use std::cell::RefCell;
use std::rc::Rc;

use common::{RenderContext, Surface};
use ratatui::style::Color;
use tracing::warn;

use super::types::{CharDimensions, ColorGrid};

/// Pixel extent of one terminal character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub px_per_col: f64,
    pub px_per_row: f64,
}

impl Scale {
    /// One game cell of `cell_size` pixels covers `dims` characters.
    pub fn new(cell_size: u32, dims: CharDimensions) -> Self {
        let cell = f64::from(cell_size.max(1));
        Self {
            px_per_col: cell / dims.horizontal as f64,
            px_per_row: cell / dims.vertical as f64,
        }
    }

    fn columns(&self, pixels: f64) -> usize {
        (pixels / self.px_per_col).ceil().max(0.0) as usize
    }

    fn rows(&self, pixels: f64) -> usize {
        (pixels / self.px_per_row).ceil().max(0.0) as usize
    }

    /// Character range covered by a pixel rectangle, as `(x0, y0, x1, y1)`.
    fn span(&self, x: f64, y: f64, width: f64, height: f64) -> (usize, usize, usize, usize) {
        let x0 = (x / self.px_per_col).floor().max(0.0) as usize;
        let y0 = (y / self.px_per_row).floor().max(0.0) as usize;
        (x0, y0, self.columns(x + width), self.rows(y + height))
    }
}

/// Parses `#rrggbb`, `#rgb` and named colours.
pub fn parse_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#');
    match hex {
        Some(hex) if hex.len() == 3 && hex.is_ascii() => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Color::Rgb(channel(0)?, channel(1)?, channel(2)?))
        }
        _ => value.trim().parse::<Color>().ok(),
    }
}

/// Drawing context writing into a shared [`ColorGrid`].
pub struct TerminalContext {
    grid: Rc<RefCell<ColorGrid>>,
    scale: Scale,
    fill: Color,
}

impl RenderContext for TerminalContext {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x0, y0, x1, y1) = self.scale.span(x, y, width, height);
        self.grid.borrow_mut().paint(x0, y0, x1, y1, None);
    }

    fn set_fill_style(&mut self, color: &str) {
        match parse_color(color) {
            Some(parsed) => self.fill = parsed,
            None => warn!("Unrecognised colour {:?}, keeping {:?}", color, self.fill),
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x0, y0, x1, y1) = self.scale.span(x, y, width, height);
        self.grid.borrow_mut().paint(x0, y0, x1, y1, Some(self.fill));
    }
}

/// Off-screen drawing surface measured in game pixels and backed by terminal characters.
pub struct TerminalSurface {
    width: u32,
    height: u32,
    scale: Scale,
    grid: Rc<RefCell<ColorGrid>>,
}

impl TerminalSurface {
    pub fn new(cell_size: u32, dims: CharDimensions) -> Self {
        Self {
            width: 0,
            height: 0,
            scale: Scale::new(cell_size, dims),
            grid: Rc::new(RefCell::new(ColorGrid::new(0, 0))),
        }
    }

    /// Handle to the character grid, shared with every context handed out.
    pub fn grid(&self) -> Rc<RefCell<ColorGrid>> {
        self.grid.clone()
    }

    fn resize_grid(&self) {
        let columns = self.scale.columns(f64::from(self.width));
        let rows = self.scale.rows(f64::from(self.height));
        self.grid.borrow_mut().resize(columns, rows);
    }
}

impl Surface for TerminalSurface {
    type Context = TerminalContext;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_width(&mut self, width: u32) {
        self.width = width;
        self.resize_grid();
    }

    fn set_height(&mut self, height: u32) {
        self.height = height;
        self.resize_grid();
    }

    fn context_2d(&self) -> Option<TerminalContext> {
        Some(TerminalContext {
            grid: self.grid.clone(),
            scale: self.scale,
            fill: Color::White,
        })
    }
}
