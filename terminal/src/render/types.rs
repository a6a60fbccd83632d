use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

pub const FILLED: char = '█';

/// How many terminal characters one game cell occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharDimensions {
    pub horizontal: usize,
    pub vertical: usize,
}

impl CharDimensions {
    pub fn new(horizontal: usize, vertical: usize) -> Self {
        Self {
            horizontal: horizontal.max(1),
            vertical: vertical.max(1),
        }
    }
}

impl Default for CharDimensions {
    fn default() -> Self {
        // Terminal glyphs are roughly twice as tall as they are wide
        Self::new(2, 1)
    }
}

/// Raster of terminal characters, each either blank or painted in a colour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorGrid {
    cells: Vec<Vec<Option<Color>>>,
    width: usize,
    height: usize,
}

impl ColorGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![vec![None; width]; height],
            width,
            height,
        }
    }

    /// Resize and blank the whole grid.
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        self.cells.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    /// Paint the half-open character range `[x0, x1) x [y0, y1)`, clipped to the grid.
    pub fn paint(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, color: Option<Color>) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for row in self.cells.iter_mut().take(y1).skip(y0) {
            for cell in row.iter_mut().take(x1).skip(x0) {
                *cell = color;
            }
        }
    }

    pub fn painted_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    /// Convert to ratatui lines, merging runs of equal colour into one span.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        self.cells
            .iter()
            .map(|row| {
                let mut spans = Vec::new();
                let mut run = String::new();
                let mut run_color: Option<Color> = None;

                for (i, &cell) in row.iter().enumerate() {
                    if i > 0 && cell != run_color {
                        spans.push(span_for(std::mem::take(&mut run), run_color));
                    }
                    run_color = cell;
                    run.push(if cell.is_some() { FILLED } else { ' ' });
                }
                if !run.is_empty() {
                    spans.push(span_for(run, run_color));
                }
                Line::from(spans)
            })
            .collect()
    }
}

fn span_for(text: String, color: Option<Color>) -> Span<'static> {
    match color {
        Some(color) => Span::styled(text, Style::default().fg(color)),
        None => Span::raw(text),
    }
}
