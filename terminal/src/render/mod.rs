pub mod surface;
pub mod types;

pub use surface::{parse_color, Scale, TerminalContext, TerminalSurface};
pub use types::{CharDimensions, ColorGrid};
