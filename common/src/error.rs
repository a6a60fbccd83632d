use thiserror::Error;

use crate::GameEventKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("unknown event `{0}`")]
    UnknownEvent(String),

    #[error("the listener doesn't exist for event `{event}`")]
    ListenerNotFound { event: GameEventKind },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("selector must be a string or a canvas element: {0}")]
    InvalidSurface(String),

    #[error("failed to get a 2d rendering context")]
    ContextUnavailable,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("startTails must be at least 1")]
    NoStartTails,

    #[error("sizeCell must be greater than 0")]
    ZeroCellSize,

    #[error("speed must be greater than 0")]
    ZeroSpeed,

    #[error("canvas of {width}x{height} cannot hold a single {cell}px cell")]
    CanvasTooSmall { width: u32, height: u32, cell: u32 },
}

#[derive(Debug, Error)]
pub enum SnakeError {
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Event(#[from] EventError),
}
