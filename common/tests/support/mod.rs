#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Result;
use common::{Canvas, CanvasOptions, RenderContext, SnakeGame, SnakeGameOptions, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear { x: f64, y: f64, width: f64, height: f64 },
    FillStyle(String),
    Fill { x: f64, y: f64, width: f64, height: f64 },
}

/// Context that records every call into a shared log.
#[derive(Clone, Default)]
pub struct RecordingContext {
    pub ops: Rc<RefCell<Vec<DrawOp>>>,
}

impl RenderContext for RecordingContext {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.borrow_mut().push(DrawOp::Clear { x, y, width, height });
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ops.borrow_mut().push(DrawOp::FillStyle(color.to_string()));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.borrow_mut().push(DrawOp::Fill { x, y, width, height });
    }
}

pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    pub has_context: bool,
    pub ops: Rc<RefCell<Vec<DrawOp>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        RecordingSurface {
            width: 300,
            height: 150,
            has_context: true,
            ops: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn without_context() -> Self {
        RecordingSurface { has_context: false, ..Self::new() }
    }
}

impl Surface for RecordingSurface {
    type Context = RecordingContext;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    fn context_2d(&self) -> Option<RecordingContext> {
        self.has_context.then(|| RecordingContext { ops: self.ops.clone() })
    }
}

/// Clock whose reading is set by the test.
#[derive(Clone, Default)]
pub struct ManualClock {
    pub now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn reader(&self) -> Box<dyn Fn() -> f64> {
        let now = self.now.clone();
        Box::new(move || now.get())
    }
}

pub type TestGame = SnakeGame<RecordingSurface, Box<dyn Fn() -> f64>>;

pub struct Harness {
    pub game: TestGame,
    pub clock: ManualClock,
    pub ops: Rc<RefCell<Vec<DrawOp>>>,
    time: f64,
}

impl Harness {
    pub fn new(options: SnakeGameOptions, width: u32, height: u32) -> Result<Self> {
        let surface = RecordingSurface::new();
        let ops = surface.ops.clone();
        let canvas = Canvas::new(surface, CanvasOptions { width, height })?;
        let clock = ManualClock::default();
        let game = SnakeGame::new(canvas, clock.reader(), options, 12345)?;
        Ok(Harness { game, clock, ops, time: 0.0 })
    }

    /// 600x600 canvas, 20px cells, 10 segments, one update every 8 refreshes.
    pub fn scenario() -> Result<Self> {
        let options = SnakeGameOptions {
            start_tails: 10,
            size_cell: 20,
            speed: 8,
            ..Default::default()
        };
        Self::new(options, 600, 600)
    }

    /// Push `count` display refreshes 16ms apart.
    pub fn refresh(&mut self, count: u32) {
        for _ in 0..count {
            self.time += 16.0;
            self.clock.now.set(self.time);
            self.game.frame(self.time);
        }
    }

    /// Push exactly one gameplay update.
    pub fn tick(&mut self) {
        let speed = self.game.options().speed;
        self.refresh(speed);
    }

    pub fn fills(&self) -> Vec<DrawOp> {
        self.ops
            .borrow()
            .iter()
            .filter(|op| matches!(op, DrawOp::Fill { .. }))
            .cloned()
            .collect()
    }
}
