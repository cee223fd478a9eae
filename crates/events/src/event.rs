//! Event payload types, one tagged union per family.

use picross_types::{GameState, GameTime};
use serde::{Deserialize, Serialize};

/// What happened to a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldControlKind {
    Occupied,
    Unoccupied,
    Marked,
    Unmarked,
    WrongOccupied,
    ActiveChanged,
}

/// A field-level change at `(column, row)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldControlEvent {
    pub kind: FieldControlKind,
    pub column: usize,
    pub row: usize,
}

/// Session state and clock reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StateChangeEvent {
    /// The session moved between lifecycle states.
    StateChanged {
        old: GameState,
        new: GameState,
        time: GameTime,
        score: u32,
    },
    /// Periodic tick with the current game clock.
    Timer { time: GameTime },
    /// The clock was adjusted outside the normal tick (penalties, mode
    /// setup).
    SetTime { time: GameTime },
    /// Remaining allowed wrong moves changed.
    SetFailCount { fails_left: u32 },
}

/// Lifecycle actions requested on or reported by the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgramControlEvent {
    Start,
    Stop,
    Pause,
    Resume,
    Restart,
    Quit,
    OptionsChanged,
}

/// A quiz question the player has to answer after a wrong move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizEvent {
    pub question: String,
}

/// Any event carried by the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", content = "event", rename_all = "camelCase")]
pub enum GameEvent {
    FieldControl(FieldControlEvent),
    StateChange(StateChangeEvent),
    ProgramControl(ProgramControlEvent),
    Quiz(QuizEvent),
}

impl GameEvent {
    /// Routes the event to the matching listener callback.
    pub(crate) fn dispatch(&self, listener: &dyn crate::GameListener) {
        listener.on_event(self);
        match self {
            GameEvent::FieldControl(e) => match e.kind {
                FieldControlKind::Occupied => listener.field_occupied(e.column, e.row),
                FieldControlKind::Unoccupied => listener.field_unoccupied(e.column, e.row),
                FieldControlKind::Marked => listener.field_marked(e.column, e.row),
                FieldControlKind::Unmarked => listener.field_unmarked(e.column, e.row),
                FieldControlKind::WrongOccupied => {
                    listener.wrong_field_occupied(e.column, e.row)
                }
                FieldControlKind::ActiveChanged => {
                    listener.active_field_changed(e.column, e.row)
                }
            },
            GameEvent::StateChange(e) => match *e {
                StateChangeEvent::StateChanged {
                    old,
                    new,
                    time,
                    score,
                } => listener.state_changed(old, new, time, score),
                StateChangeEvent::Timer { time } => listener.timer(time),
                StateChangeEvent::SetTime { time } => listener.set_time(time),
                StateChangeEvent::SetFailCount { fails_left } => {
                    listener.set_fail_count(fails_left)
                }
            },
            GameEvent::ProgramControl(e) => match e {
                ProgramControlEvent::OptionsChanged => listener.options_changed(),
                other => listener.program_control(*other),
            },
            GameEvent::Quiz(e) => listener.quiz(&e.question),
        }
    }
}
