//! Listener capability interface.

use picross_types::{GameState, GameTime};

use crate::event::{GameEvent, ProgramControlEvent};

/// Receiver for bus events.
///
/// Every method has a no-op default so a subscriber only overrides what
/// it actually observes. Callbacks take `&self`; listeners that keep
/// state use interior mutability, which also keeps re-entrant publishes
/// from inside a callback legal.
#[allow(unused_variables)]
pub trait GameListener: Send + Sync {
    /// Catch-all invoked for every event, before the specific callback.
    /// Loggers and relays override this instead of every method.
    fn on_event(&self, event: &GameEvent) {}

    // field control
    fn field_occupied(&self, column: usize, row: usize) {}
    fn field_unoccupied(&self, column: usize, row: usize) {}
    fn field_marked(&self, column: usize, row: usize) {}
    fn field_unmarked(&self, column: usize, row: usize) {}
    fn wrong_field_occupied(&self, column: usize, row: usize) {}
    fn active_field_changed(&self, column: usize, row: usize) {}

    // state change
    fn state_changed(&self, old: GameState, new: GameState, time: GameTime, score: u32) {}
    fn timer(&self, time: GameTime) {}
    fn set_time(&self, time: GameTime) {}
    fn set_fail_count(&self, fails_left: u32) {}

    // program control
    fn program_control(&self, event: ProgramControlEvent) {}
    fn options_changed(&self) {}

    // quiz
    fn quiz(&self, question: &str) {}
}
