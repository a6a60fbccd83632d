use anyhow::Result;
use clap::Parser;
use common::{
    CanvasOptions, SnakeGameOptions, DEFAULT_CANVAS_WIDTH, DEFAULT_SPEED, DEFAULT_START_TAILS,
};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::info;
use tracing_subscriber::EnvFilter;

use terminal::app::{App, AppCommand, GameConfig};
use terminal::render::CharDimensions;

#[derive(Parser, Debug)]
#[command(name = "snake-terminal", about = "Classic snake in the terminal")]
struct Args {
    /// Body segments behind the head at start
    #[arg(long, default_value_t = DEFAULT_START_TAILS)]
    start_tails: u32,

    /// Edge of one grid cell in pixels
    #[arg(long, default_value_t = 20)]
    size_cell: u32,

    /// Display refreshes per gameplay update
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    speed: u32,

    #[arg(long, default_value_t = DEFAULT_CANVAS_WIDTH)]
    width: u32,

    #[arg(long, default_value_t = 400)]
    height: u32,

    /// Display refreshes per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Berry placement seed, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (nothing is logged otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            game: SnakeGameOptions {
                start_tails: self.start_tails,
                size_cell: self.size_cell,
                speed: self.speed,
                ..Default::default()
            },
            canvas: CanvasOptions { width: self.width, height: self.height },
            char_dims: CharDimensions::default(),
            seed: self.seed.unwrap_or_else(clock_seed),
        }
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(1)
}

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let origin = Instant::now();
    let elapsed_ms = move || origin.elapsed().as_secs_f64() * 1000.0;
    let mut app = App::new(args.game_config(), Box::new(elapsed_ms))?;
    info!("Starting with {:?}", args);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, elapsed_ms, args.frame_interval());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let board = app.scoreboard();
    info!("Exiting after {} games, best score {}", board.games, board.best);
    res
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    now: impl Fn() -> f64,
    frame_interval: Duration,
) -> Result<()> {
    let mut next_frame = Instant::now();

    loop {
        let tick = Instant::now();
        if tick >= next_frame {
            app.update(now());
            terminal.draw(|f| app.render(f))?;

            next_frame += frame_interval;
            // Skip missed frames instead of bursting
            if next_frame < tick {
                next_frame = tick + frame_interval;
            }
        }

        let timeout = next_frame.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if let Some(AppCommand::Quit) = app.handle_input(key) {
                    return Ok(());
                }
            }
        }
    }
}
