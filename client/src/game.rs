use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use common::{
    Callback, Canvas, CanvasOptions, Direction, EventEmitter, GameEvent, GameEventKind, Listener,
    SnakeGame, SnakeGameOptions,
};
use log::{debug, error};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

use crate::surface::WebSurface;

type PageClock = Box<dyn Fn() -> f64>;
type WebGame = SnakeGame<WebSurface, PageClock>;

/// Options object accepted by the JavaScript constructor. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClientOptions {
    #[serde(flatten)]
    game: SnakeGameOptions,
    #[serde(flatten)]
    canvas: CanvasOptions,
}

/// A JavaScript function registered through `on`.
#[derive(Clone)]
struct JsListener(js_sys::Function);

impl Listener for JsListener {
    fn notify(&self, event: &GameEvent) {
        let payload = match serde_wasm_bindgen::to_value(event) {
            Ok(payload) => payload,
            Err(err) => {
                error!("Failed to serialize {} event: {}", event.kind, err);
                return;
            }
        };
        if let Err(err) = self.0.call1(&JsValue::NULL, &payload) {
            error!("Listener for {} threw: {:?}", event.kind, err);
        }
    }

    fn same_as(&self, other: &Self) -> bool {
        let a: &JsValue = self.0.as_ref();
        let b: &JsValue = other.0.as_ref();
        a == b
    }
}

struct Inner {
    game: RefCell<WebGame>,
    // Core events wait here until the game borrow is released
    outbox: Rc<RefCell<VecDeque<GameEvent>>>,
    listeners: EventEmitter<JsListener>,

    frame_callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    frame_id: Cell<Option<i32>>,
    keydown_callback: RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>,
    keydown_attached: Cell<bool>,
}

impl Inner {
    fn install_callbacks(this: &Rc<Inner>) {
        let weak = Rc::downgrade(this);
        let on_frame = Closure::wrap(Box::new(move |time: f64| {
            if let Some(inner) = weak.upgrade() {
                inner.on_frame(time);
            }
        }) as Box<dyn FnMut(f64)>);
        *this.frame_callback.borrow_mut() = Some(on_frame);

        let weak = Rc::downgrade(this);
        let on_keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.on_keydown(&event);
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        *this.keydown_callback.borrow_mut() = Some(on_keydown);
    }

    fn on_frame(&self, time: f64) {
        self.frame_id.set(None);
        self.game.borrow_mut().frame(time);
        self.sync_controls();
        self.flush();

        // A listener may have stopped or restarted the game during flush
        if self.game.borrow().is_animating() {
            self.request_frame();
        }
    }

    fn on_keydown(&self, event: &KeyboardEvent) {
        let Some(direction) = Direction::from_key(&event.key()) else {
            return;
        };
        event.prevent_default();
        self.game.borrow_mut().handle_key(direction);
    }

    fn request_frame(&self) {
        if self.frame_id.get().is_some() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = self.frame_callback.borrow();
        if let Some(callback) = callback.as_ref() {
            match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                Ok(id) => self.frame_id.set(Some(id)),
                Err(err) => error!("requestAnimationFrame failed: {:?}", err),
            }
        }
    }

    fn cancel_frame(&self) {
        if let Some(id) = self.frame_id.take() {
            if let Some(window) = web_sys::window() {
                if let Err(err) = window.cancel_animation_frame(id) {
                    error!("cancelAnimationFrame failed: {:?}", err);
                }
            }
        }
    }

    /// Mirror the game's controls flag onto the document keydown listener.
    fn sync_controls(&self) {
        let wanted = self.game.borrow().controls_attached();
        self.set_keydown(wanted);
    }

    fn set_keydown(&self, attach: bool) {
        if attach == self.keydown_attached.get() {
            return;
        }
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let callback = self.keydown_callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };

        let function = callback.as_ref().unchecked_ref();
        let result = if attach {
            document.add_event_listener_with_callback("keydown", function)
        } else {
            document.remove_event_listener_with_callback("keydown", function)
        };
        match result {
            Ok(()) => {
                self.keydown_attached.set(attach);
                debug!("Keyboard controls {}", if attach { "attached" } else { "detached" });
            }
            Err(err) => error!("Failed to update keydown listener: {:?}", err),
        }
    }

    fn flush(&self) {
        loop {
            let next = self.outbox.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            self.listeners.dispatch(event);
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cancel_frame();
        self.set_keydown(false);
    }
}

/// Snake game bound to a canvas on the page.
#[wasm_bindgen(js_name = SnakeGame)]
pub struct SnakeGameHandle {
    inner: Rc<Inner>,
}

#[wasm_bindgen(js_class = SnakeGame)]
impl SnakeGameHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(target: JsValue, options: JsValue) -> Result<SnakeGameHandle, JsError> {
        let options: ClientOptions = if options.is_undefined() || options.is_null() {
            ClientOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };

        let surface = WebSurface::resolve(&target)?;
        let canvas = Canvas::new(surface, options.canvas)?;

        let performance = web_sys::window()
            .and_then(|window| window.performance())
            .ok_or_else(|| JsError::new("performance API is unavailable"))?;
        let clock: PageClock = Box::new(move || performance.now());

        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let game = SnakeGame::new(canvas, clock, options.game, seed)?;

        let outbox = Rc::new(RefCell::new(VecDeque::new()));
        let forward: Callback = {
            let outbox = outbox.clone();
            Rc::new(move |event: &GameEvent| outbox.borrow_mut().push_back(*event))
        };
        game.on(GameEventKind::ALL, forward)?;

        let inner = Rc::new(Inner {
            game: RefCell::new(game),
            outbox,
            listeners: EventEmitter::new(),
            frame_callback: RefCell::new(None),
            frame_id: Cell::new(None),
            keydown_callback: RefCell::new(None),
            keydown_attached: Cell::new(false),
        });
        Inner::install_callbacks(&inner);

        Ok(SnakeGameHandle { inner })
    }

    pub fn start(&self) {
        self.inner.game.borrow_mut().start();
        self.inner.sync_controls();
        self.inner.request_frame();
        self.inner.flush();
    }

    pub fn stop(&self) {
        self.inner.game.borrow_mut().stop();
        self.inner.cancel_frame();
        self.inner.sync_controls();
        self.inner.flush();
    }

    /// `events` is a space separated string or an array of event names.
    pub fn on(&self, events: JsValue, listener: js_sys::Function) -> Result<(), JsError> {
        let names = event_names(&events)?;
        self.inner.listeners.on(names.as_slice(), JsListener(listener))?;
        Ok(())
    }

    pub fn off(&self, events: JsValue, listener: js_sys::Function) -> Result<(), JsError> {
        let names = event_names(&events)?;
        self.inner.listeners.off(names.as_slice(), &JsListener(listener))?;
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.inner.game.borrow().score()
    }

    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        self.inner.game.borrow().status().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.game.borrow().canvas().width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.game.borrow().canvas().height()
    }

    #[wasm_bindgen(js_name = setSize)]
    pub fn set_size(&self, width: u32, height: u32) {
        self.inner.game.borrow_mut().set_size(width, height);
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        self.inner
            .game
            .borrow()
            .snapshot_json()
            .map_err(|err| JsError::new(&err.to_string()))
    }
}

fn event_names(events: &JsValue) -> Result<Vec<String>, JsError> {
    if let Some(names) = events.as_string() {
        return Ok(names.split_whitespace().map(str::to_string).collect());
    }
    if js_sys::Array::is_array(events) {
        return js_sys::Array::from(events)
            .iter()
            .map(|name| {
                name.as_string()
                    .ok_or_else(|| JsError::new("event names must be strings"))
            })
            .collect();
    }
    Err(JsError::new("events must be a string or an array of strings"))
}
