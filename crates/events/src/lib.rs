//! Game event families and the synchronous event bus.
//!
//! Everything the engine tells the outside world travels through this
//! crate: field-control events from board moves, state-change events from
//! the session and timers, program-control events for lifecycle actions
//! and quiz events. The [`EventBus`] delivers synchronously to every
//! subscribed [`GameListener`] and is safe to share across threads.

mod bus;
mod event;
mod listener;

pub use bus::{EventBus, ListenerId};
pub use event::{
    FieldControlEvent, FieldControlKind, GameEvent, ProgramControlEvent, QuizEvent,
    StateChangeEvent,
};
pub use listener::GameListener;
