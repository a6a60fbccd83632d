use log::debug;
use serde::{Deserialize, Serialize};

use crate::{CanvasError, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};

/// 2D drawing operations the game needs.
pub trait RenderContext {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn set_fill_style(&mut self, color: &str);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}

/// A drawing surface with size attributes and a 2D context.
pub trait Surface {
    type Context: RenderContext;

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_width(&mut self, width: u32);
    fn set_height(&mut self, height: u32);

    /// `None` when the surface cannot provide a 2D context.
    fn context_2d(&self) -> Option<Self::Context>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        CanvasOptions {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

pub struct Canvas<S: Surface> {
    surface: S,
    ctx: S::Context,
    options: CanvasOptions,
}

impl<S: Surface> Canvas<S> {
    pub fn new(surface: S, options: CanvasOptions) -> Result<Self, CanvasError> {
        let ctx = surface.context_2d().ok_or(CanvasError::ContextUnavailable)?;
        let mut canvas = Canvas { surface, ctx, options };
        canvas.apply_size();
        Ok(canvas)
    }

    fn apply_size(&mut self) {
        let CanvasOptions { width, height } = self.options;
        self.surface.set_width(width);
        self.surface.set_height(height);
        debug!("Canvas sized to {}x{}", width, height);
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.options = CanvasOptions { width, height };
        self.apply_size();
    }

    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    pub fn context(&self) -> &S::Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut S::Context {
        &mut self.ctx
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
