use common::{CanvasError, RenderContext, Surface};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const DEFAULT_SELECTOR: &str = "canvas";

pub struct WebContext(CanvasRenderingContext2d);

impl RenderContext for WebContext {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.0.clear_rect(x, y, width, height);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.0.set_fill_style(&JsValue::from_str(color));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.0.fill_rect(x, y, width, height);
    }
}

/// A `<canvas>` element on the page.
pub struct WebSurface {
    element: HtmlCanvasElement,
}

impl WebSurface {
    /// Accepts a CSS selector, a canvas element, or nothing (first `canvas` on the page).
    pub fn resolve(target: &JsValue) -> Result<Self, CanvasError> {
        let element = if target.is_undefined() || target.is_null() {
            Self::query(DEFAULT_SELECTOR)?
        } else if let Some(selector) = target.as_string() {
            Self::query(&selector)?
        } else {
            target
                .clone()
                .dyn_into::<HtmlCanvasElement>()
                .map_err(|_| CanvasError::InvalidSurface("expected a selector or a canvas element".to_string()))?
        };
        Ok(WebSurface { element })
    }

    fn query(selector: &str) -> Result<HtmlCanvasElement, CanvasError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| CanvasError::InvalidSurface("no document available".to_string()))?;

        document
            .query_selector(selector)
            .ok()
            .flatten()
            .ok_or_else(|| CanvasError::InvalidSurface(format!("nothing matches `{}`", selector)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| CanvasError::InvalidSurface(format!("`{}` is not a canvas element", selector)))
    }
}

impl Surface for WebSurface {
    type Context = WebContext;

    fn width(&self) -> u32 {
        self.element.width()
    }

    fn height(&self) -> u32 {
        self.element.height()
    }

    fn set_width(&mut self, width: u32) {
        self.element.set_width(width);
    }

    fn set_height(&mut self, height: u32) {
        self.element.set_height(height);
    }

    fn context_2d(&self) -> Option<WebContext> {
        self.element
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())
            .map(WebContext)
    }
}
