mod game;
mod surface;

pub use game::SnakeGameHandle;
pub use surface::{WebContext, WebSurface};

use log::info;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    info!("Snake client loaded");
}
