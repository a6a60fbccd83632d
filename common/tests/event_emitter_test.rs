use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use common::{Callback, EventEmitter, EventError, GameEvent, GameEventKind};

fn recorder(name: &'static str, log: &Rc<RefCell<Vec<(&'static str, GameEvent)>>>) -> Callback {
    let log = log.clone();
    Rc::new(move |event: &GameEvent| log.borrow_mut().push((name, *event)))
}

#[test]
fn test_listeners_run_in_registration_order() -> Result<()> {
    let emitter: EventEmitter = EventEmitter::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    emitter.on("start", recorder("first", &log))?;
    emitter.on("start", recorder("second", &log))?;
    emitter.emit("start", 0)?;

    let start = GameEvent { kind: GameEventKind::Start, score: 0 };
    assert_eq!(*log.borrow(), vec![("first", start), ("second", start)]);
    Ok(())
}

#[test]
fn test_registering_twice_is_idempotent() -> Result<()> {
    let emitter: EventEmitter = EventEmitter::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let listener = recorder("only", &log);

    emitter.on(GameEventKind::UpdateScore, listener.clone())?;
    emitter.on(GameEventKind::UpdateScore, listener.clone())?;
    assert_eq!(emitter.listener_count(GameEventKind::UpdateScore), 1);

    emitter.emit(GameEventKind::UpdateScore, 20)?;
    assert_eq!(log.borrow().len(), 1);
    Ok(())
}

#[test]
fn test_one_listener_on_many_events() -> Result<()> {
    let emitter: EventEmitter = EventEmitter::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let listener = recorder("score", &log);

    emitter.on([GameEventKind::Start, GameEventKind::Stop, GameEventKind::UpdateScore], listener.clone())?;
    emitter.emit("stop updateScore", 40)?;

    let kinds: Vec<GameEventKind> = log.borrow().iter().map(|(_, e)| e.kind).collect();
    assert_eq!(kinds, vec![GameEventKind::Stop, GameEventKind::UpdateScore]);
    assert!(log.borrow().iter().all(|(_, e)| e.score == 40));

    emitter.off("start stop", &listener)?;
    assert!(!emitter.has(GameEventKind::Start));
    assert!(!emitter.has(GameEventKind::Stop));
    assert!(emitter.has(GameEventKind::UpdateScore));
    Ok(())
}

#[test]
fn test_off_unknown_listener_fails() -> Result<()> {
    let emitter: EventEmitter = EventEmitter::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    emitter.on("start", recorder("registered", &log))?;

    let stranger = recorder("stranger", &log);
    let err = emitter.off("start", &stranger).unwrap_err();
    assert_eq!(err, EventError::ListenerNotFound { event: GameEventKind::Start });
    assert!(err.to_string().contains("doesn't exist"));

    // Nothing registered at all
    assert!(emitter.off("stop", &stranger).is_err());
    Ok(())
}

#[test]
fn test_off_stops_delivery() -> Result<()> {
    let emitter: EventEmitter = EventEmitter::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let listener = recorder("gone", &log);

    emitter.on("updateScore", listener.clone())?;
    emitter.off("updateScore", &listener)?;
    emitter.emit("updateScore", 10)?;

    assert!(log.borrow().is_empty());
    assert!(emitter.off("updateScore", &listener).is_err());
    Ok(())
}

#[test]
fn test_unknown_event_names_are_errors() {
    let emitter: EventEmitter = EventEmitter::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    assert_eq!(
        emitter.on("begin", recorder("x", &log)),
        Err(EventError::UnknownEvent("begin".to_string()))
    );
    assert!(emitter.emit("start nope", 0).is_err());
    assert!(log.borrow().is_empty());
}

#[test]
fn test_listener_can_subscribe_others_while_emitting() -> Result<()> {
    let emitter: Rc<EventEmitter> = Rc::new(EventEmitter::new());
    let log = Rc::new(RefCell::new(Vec::new()));

    let late = recorder("late", &log);
    let registrar: Callback = {
        let emitter = emitter.clone();
        let late = late.clone();
        Rc::new(move |_event: &GameEvent| {
            emitter.on("stop", late.clone()).ok();
        })
    };

    emitter.on("start", registrar.clone())?;
    emitter.emit("start", 0)?;
    emitter.emit("stop", 5)?;

    assert_eq!(
        *log.borrow(),
        vec![("late", GameEvent { kind: GameEventKind::Stop, score: 5 })]
    );

    emitter.off("start", &registrar)?;
    Ok(())
}
