use anyhow::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::util::PseudoRandom;
use crate::{
    Animate, AnimateOptions, Berry, Callback, Canvas, Clock, ConfigError, Direction, EventEmitter,
    EventError, GameEvent, GameEventKind, Grid, IntoEventKinds, Position, RenderContext,
    SnakeError, Snake, Surface, Velocity, DEFAULT_BERRY_COLOR, DEFAULT_BODY_COLOR,
    DEFAULT_HEAD_COLOR, DEFAULT_SIZE_CELL, DEFAULT_SPEED, DEFAULT_START_TAILS, SCORE_INCREMENT,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnakeGameOptions {
    pub start_tails: u32,
    pub size_cell: u32,
    /// Display refreshes per gameplay update
    pub speed: u32,
    pub head_color: String,
    pub body_color: String,
    pub berry_color: String,
}

impl Default for SnakeGameOptions {
    fn default() -> Self {
        SnakeGameOptions {
            start_tails: DEFAULT_START_TAILS,
            size_cell: DEFAULT_SIZE_CELL,
            speed: DEFAULT_SPEED,
            head_color: DEFAULT_HEAD_COLOR.to_string(),
            body_color: DEFAULT_BODY_COLOR.to_string(),
            berry_color: DEFAULT_BERRY_COLOR.to_string(),
        }
    }
}

impl SnakeGameOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_tails == 0 {
            return Err(ConfigError::NoStartTails);
        }
        if self.size_cell == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.speed == 0 {
            return Err(ConfigError::ZeroSpeed);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Stopped,
    Playing,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Stopped => "stopped",
            GameStatus::Playing => "playing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub score: u32,
    pub snake: Snake,
    pub berry: Berry,
}

/// The game state machine.
///
/// Owns every piece of mutable game state. Hosts drive it from a single
/// thread: [`SnakeGame::frame`] once per display refresh and
/// [`SnakeGame::handle_key`] per key press. Each call runs to completion
/// before the next one starts.
pub struct SnakeGame<S: Surface, C: Clock> {
    options: SnakeGameOptions,
    canvas: Canvas<S>,
    animate: Animate<C>,
    events: EventEmitter,
    rng: PseudoRandom,

    status: GameStatus,
    controls_attached: bool,
    snake: Snake,
    berry: Berry,
    score: u32,
    frame_count: u32,
}

impl<S: Surface, C: Clock> SnakeGame<S, C> {
    pub fn new(canvas: Canvas<S>, clock: C, options: SnakeGameOptions, seed: u64) -> Result<Self, SnakeError> {
        options.validate()?;
        let (width, height) = (canvas.width(), canvas.height());
        if width < options.size_cell || height < options.size_cell {
            return Err(ConfigError::CanvasTooSmall { width, height, cell: options.size_cell }.into());
        }

        let animate = Animate::new(clock, AnimateOptions { looping: true, ..Default::default() });

        Ok(SnakeGame {
            options,
            canvas,
            animate,
            events: EventEmitter::new(),
            rng: PseudoRandom::new(seed),
            status: GameStatus::Stopped,
            controls_attached: false,
            snake: Snake::default(),
            berry: Berry::default(),
            score: 0,
            frame_count: 0,
        })
    }

    pub fn on(&self, events: impl IntoEventKinds, listener: Callback) -> Result<(), EventError> {
        self.events.on(events, listener)
    }

    pub fn off(&self, events: impl IntoEventKinds, listener: &Callback) -> Result<(), EventError> {
        self.events.off(events, listener)
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    fn grid(&self) -> Grid {
        Grid::new(self.canvas.width(), self.canvas.height(), self.options.size_cell)
    }

    pub fn start(&mut self) {
        let grid = self.grid();
        let velocity = Velocity { dx: 0, dy: -(grid.cell as i32) };

        self.snake = Snake::new(grid.center(), velocity, self.options.start_tails as usize);
        self.snake.wrap(grid);
        self.score = 0;
        self.frame_count = 0;
        self.relocate_berry();
        self.controls_attached = true;
        self.status = GameStatus::Playing;
        self.animate.start(None);

        info!(
            "Game started on a {}x{} grid with {} segments",
            grid.columns, grid.rows, self.snake.len()
        );
        self.events.dispatch(GameEvent { kind: GameEventKind::Start, score: self.score });
    }

    pub fn stop(&mut self) {
        if !self.animate.is_scheduled() && !self.controls_attached {
            debug!("Stop ignored, game is not running");
            return;
        }

        self.status = GameStatus::Stopped;
        self.animate.stop();
        self.controls_attached = false;

        info!("Game stopped with score {}", self.score);
        self.events.dispatch(GameEvent { kind: GameEventKind::Stop, score: self.score });
    }

    /// Feed one display refresh. Returns whether the game wants further frames.
    pub fn frame(&mut self, time: f64) -> bool {
        if self.animate.frame(time).is_some() {
            self.on_animation_frame();
        }
        self.animate.is_scheduled()
    }

    fn on_animation_frame(&mut self) {
        self.frame_count += 1;
        if self.frame_count < self.options.speed {
            return;
        }
        self.frame_count = 0;

        if self.status == GameStatus::Stopped {
            self.stop();
            return;
        }

        self.update();
        self.draw();
    }

    fn update(&mut self) {
        let grid = self.grid();

        self.snake.step_forward();
        self.snake.head = self.snake.head.wrap(grid);

        if self.snake.head == self.berry.position {
            self.score += SCORE_INCREMENT;
            self.snake.grow();
            debug!("Berry eaten at {:?}, score {}", self.berry.position, self.score);
            self.events.dispatch(GameEvent { kind: GameEventKind::UpdateScore, score: self.score });
            self.relocate_berry();
        }

        if self.snake.bites_itself() {
            info!("Snake bit itself at {:?}", self.snake.head);
            self.status = GameStatus::Stopped;
        }
    }

    fn draw(&mut self) {
        let cell = self.options.size_cell as f64;
        let (width, height) = (self.canvas.width() as f64, self.canvas.height() as f64);
        let ctx = self.canvas.context_mut();

        ctx.clear_rect(0.0, 0.0, width, height);

        ctx.set_fill_style(&self.options.berry_color);
        fill_cell(ctx, self.berry.position, cell);

        ctx.set_fill_style(&self.options.head_color);
        fill_cell(ctx, self.snake.head, cell);

        ctx.set_fill_style(&self.options.body_color);
        for segment in &self.snake.tails {
            fill_cell(ctx, *segment, cell);
        }
    }

    fn relocate_berry(&mut self) {
        let grid = self.grid();
        let column = self.rng.next_below(grid.columns);
        let row = self.rng.next_below(grid.rows);
        self.berry = Berry::new(grid.cell_position(column, row));
    }

    /// Steer the snake. Returns whether the turn was applied.
    pub fn handle_key(&mut self, direction: Direction) -> bool {
        if !self.controls_attached {
            debug!("Ignoring {:?}, controls are not attached", direction);
            return false;
        }
        self.snake.turn(direction, self.options.size_cell)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn controls_attached(&self) -> bool {
        self.controls_attached
    }

    pub fn is_animating(&self) -> bool {
        self.animate.is_scheduled()
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }

    pub fn berry(&self) -> &Berry {
        &self.berry
    }

    pub fn berry_mut(&mut self) -> &mut Berry {
        &mut self.berry
    }

    pub fn options(&self) -> &SnakeGameOptions {
        &self.options
    }

    pub fn canvas(&self) -> &Canvas<S> {
        &self.canvas
    }

    /// Resize the canvas and keep the snake and berry on the new grid.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_size(width, height);

        let grid = self.grid();
        self.snake.wrap(grid);
        if self.berry.position.wrap(grid) != self.berry.position {
            debug!("Berry at {:?} is off the {}x{} grid", self.berry.position, grid.columns, grid.rows);
            self.relocate_berry();
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status,
            score: self.score,
            snake: self.snake.clone(),
            berry: self.berry,
        }
    }

    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }
}

fn fill_cell<R: RenderContext>(ctx: &mut R, position: Position, cell: f64) {
    ctx.fill_rect(position.x as f64, position.y as f64, cell, cell);
}
