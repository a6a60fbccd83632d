use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use common::{
    Callback, Canvas, CanvasOptions, Direction, GameEvent, GameEventKind, SnakeGame,
    SnakeGameOptions,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info};

use crate::render::surface::TerminalSurface;
use crate::render::types::{CharDimensions, ColorGrid};

pub type GameClock = Box<dyn Fn() -> f64>;
pub type TerminalGame = SnakeGame<TerminalSurface, GameClock>;

#[derive(Debug, PartialEq, Eq)]
pub enum AppCommand {
    Quit,
}

/// Everything needed to set up a game in the terminal.
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub game: SnakeGameOptions,
    pub canvas: CanvasOptions,
    pub char_dims: CharDimensions,
    pub seed: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Ready,
    Playing,
    GameOver,
}

/// Score and state as seen through game events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub phase: Phase,
    pub score: u32,
    pub best: u32,
    pub games: u32,
}

impl Scoreboard {
    pub fn apply(&mut self, event: &GameEvent) {
        self.score = event.score;
        self.best = self.best.max(event.score);
        match event.kind {
            GameEventKind::Start => {
                self.phase = Phase::Playing;
                self.games += 1;
            }
            GameEventKind::Stop => self.phase = Phase::GameOver,
            GameEventKind::UpdateScore => {}
        }
    }
}

pub struct App {
    game: TerminalGame,
    grid: Rc<RefCell<ColorGrid>>,
    scoreboard: Rc<RefCell<Scoreboard>>,
}

impl App {
    pub fn new(config: GameConfig, clock: GameClock) -> Result<Self> {
        let surface = TerminalSurface::new(config.game.size_cell, config.char_dims);
        let grid = surface.grid();
        let canvas = Canvas::new(surface, config.canvas)?;
        let game = SnakeGame::new(canvas, clock, config.game, config.seed)?;

        let scoreboard = Rc::new(RefCell::new(Scoreboard::default()));
        let listener: Callback = {
            let scoreboard = scoreboard.clone();
            Rc::new(move |event: &GameEvent| scoreboard.borrow_mut().apply(event))
        };
        game.on("start stop updateScore", listener)?;

        info!(
            "Terminal game ready: {}x{} px, {} chars",
            game.canvas().width(),
            game.canvas().height(),
            grid.borrow().width()
        );

        Ok(Self { game, grid, scoreboard })
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(AppCommand::Quit);
            }
            KeyCode::Char('q') | KeyCode::Esc => return Some(AppCommand::Quit),
            KeyCode::Char('s') | KeyCode::Enter => self.game.start(),
            KeyCode::Char('p') => self.game.stop(),
            KeyCode::Up => self.steer(Direction::Up),
            KeyCode::Right => self.steer(Direction::Right),
            KeyCode::Down => self.steer(Direction::Down),
            KeyCode::Left => self.steer(Direction::Left),
            _ => {}
        }
        None
    }

    fn steer(&mut self, direction: Direction) {
        if !self.game.handle_key(direction) {
            debug!("Turn {:?} rejected", direction);
        }
    }

    /// Advance the game to `now` (milliseconds on the game clock).
    pub fn update(&mut self, now: f64) {
        self.game.frame(now);
    }

    pub fn game(&self) -> &TerminalGame {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut TerminalGame {
        &mut self.game
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard.borrow().clone()
    }

    pub fn render(&self, frame: &mut Frame) {
        let [status_area, arena_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(self.render_status(), status_area);

        let arena = Paragraph::new(self.grid.borrow().to_lines())
            .block(Block::default().borders(Borders::ALL).title(" Snake "));
        frame.render_widget(arena, arena_area);

        let help = Paragraph::new("arrows steer · s/enter start · p stop · q quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(help, help_area);
    }

    fn render_status(&self) -> Paragraph<'static> {
        let board = self.scoreboard.borrow();
        let (label, color) = match board.phase {
            Phase::Ready => ("Press s to start", Color::Cyan),
            Phase::Playing => ("Playing", Color::Green),
            Phase::GameOver => ("Game over, press s to restart", Color::Red),
        };

        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Score: {}", board.score),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  Best: {}  ", board.best)),
            Span::styled(label, Style::default().fg(color)),
        ]))
    }
}
