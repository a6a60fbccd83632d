mod animate;
mod canvas;
mod constants;
mod error;
mod event_emitter;
mod game;
mod snake;

pub mod util;

pub use animate::*;
pub use canvas::*;
pub use constants::*;
pub use error::*;
pub use event_emitter::*;
pub use game::*;
pub use snake::*;
pub use util::PseudoRandom;
