use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::EventError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameEventKind {
    Start,
    Stop,
    UpdateScore,
}

impl GameEventKind {
    pub const ALL: [GameEventKind; 3] = [GameEventKind::Start, GameEventKind::Stop, GameEventKind::UpdateScore];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameEventKind::Start => "start",
            GameEventKind::Stop => "stop",
            GameEventKind::UpdateScore => "updateScore",
        }
    }
}

impl fmt::Display for GameEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameEventKind {
    type Err = EventError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        GameEventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| EventError::UnknownEvent(name.to_string()))
    }
}

/// Payload handed to every listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    #[serde(rename = "type")]
    pub kind: GameEventKind,
    pub score: u32,
}

/// Anything that can be registered on an [`EventEmitter`].
pub trait Listener: Clone {
    fn notify(&self, event: &GameEvent);

    /// Identity used by `on` deduplication and by `off`.
    fn same_as(&self, other: &Self) -> bool;
}

pub type Callback = Rc<dyn Fn(&GameEvent)>;

impl Listener for Callback {
    fn notify(&self, event: &GameEvent) {
        (**self)(event)
    }

    fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

/// Event names accepted by `on`, `off` and `emit`.
pub trait IntoEventKinds {
    fn into_event_kinds(self) -> Result<Vec<GameEventKind>, EventError>;
}

impl IntoEventKinds for GameEventKind {
    fn into_event_kinds(self) -> Result<Vec<GameEventKind>, EventError> {
        Ok(vec![self])
    }
}

/// Space delimited, e.g. `"start stop"`.
impl IntoEventKinds for &str {
    fn into_event_kinds(self) -> Result<Vec<GameEventKind>, EventError> {
        self.split_whitespace().map(str::parse).collect()
    }
}

impl IntoEventKinds for &[GameEventKind] {
    fn into_event_kinds(self) -> Result<Vec<GameEventKind>, EventError> {
        Ok(self.to_vec())
    }
}

impl<const N: usize> IntoEventKinds for [GameEventKind; N] {
    fn into_event_kinds(self) -> Result<Vec<GameEventKind>, EventError> {
        Ok(self.to_vec())
    }
}

impl IntoEventKinds for Vec<GameEventKind> {
    fn into_event_kinds(self) -> Result<Vec<GameEventKind>, EventError> {
        Ok(self)
    }
}

impl IntoEventKinds for &[String] {
    fn into_event_kinds(self) -> Result<Vec<GameEventKind>, EventError> {
        self.iter().map(|name| name.parse()).collect()
    }
}

/// Named-event publish/subscribe.
///
/// All methods take `&self`; listeners may subscribe or unsubscribe while an
/// emit is running. Dispatch reads the live listener list one entry at a time,
/// so such changes may or may not be seen by the emit in progress.
pub struct EventEmitter<L: Listener = Callback> {
    events: RefCell<HashMap<GameEventKind, Vec<L>>>,
}

impl<L: Listener> Default for EventEmitter<L> {
    fn default() -> Self {
        EventEmitter {
            events: RefCell::new(HashMap::new()),
        }
    }
}

impl<L: Listener> EventEmitter<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, events: impl IntoEventKinds, listener: L) -> Result<(), EventError> {
        let kinds = events.into_event_kinds()?;
        let mut map = self.events.borrow_mut();
        for kind in kinds {
            let listeners = map.entry(kind).or_default();
            if !listeners.iter().any(|l| l.same_as(&listener)) {
                listeners.push(listener.clone());
                debug!("Listener added for {} ({} total)", kind, listeners.len());
            }
        }
        Ok(())
    }

    pub fn off(&self, events: impl IntoEventKinds, listener: &L) -> Result<(), EventError> {
        let kinds = events.into_event_kinds()?;
        let mut map = self.events.borrow_mut();
        for kind in kinds {
            let listeners = map
                .get_mut(&kind)
                .ok_or(EventError::ListenerNotFound { event: kind })?;
            let index = listeners
                .iter()
                .position(|l| l.same_as(listener))
                .ok_or(EventError::ListenerNotFound { event: kind })?;
            listeners.remove(index);
            if listeners.is_empty() {
                map.remove(&kind);
            }
            debug!("Listener removed for {}", kind);
        }
        Ok(())
    }

    pub fn emit(&self, events: impl IntoEventKinds, score: u32) -> Result<(), EventError> {
        for kind in events.into_event_kinds()? {
            self.dispatch(GameEvent { kind, score });
        }
        Ok(())
    }

    /// Notify every listener of `event.kind` in registration order.
    pub fn dispatch(&self, event: GameEvent) {
        let mut index = 0;
        loop {
            // The borrow ends before the listener runs
            let next = self
                .events
                .borrow()
                .get(&event.kind)
                .and_then(|listeners| listeners.get(index).cloned());
            match next {
                Some(listener) => listener.notify(&event),
                None => break,
            }
            index += 1;
        }
    }

    pub fn has(&self, kind: GameEventKind) -> bool {
        self.events.borrow().contains_key(&kind)
    }

    pub fn listener_count(&self, kind: GameEventKind) -> usize {
        self.events.borrow().get(&kind).map_or(0, Vec::len)
    }
}
