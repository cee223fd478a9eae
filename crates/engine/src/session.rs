//! Play-session driver.
//!
//! A [`GameSession`] wires one pattern, one play board and one rule set
//! to an event bus. Presentation code calls the methods here; everything
//! the outside world learns about the session travels through the bus as
//! field-control, state-change, program-control and quiz events.

use std::sync::Arc;

use picross_core::{MarkOutcome, Nonogram, OccupyOutcome, PlayBoard};
use picross_events::{EventBus, ProgramControlEvent};
use picross_types::{CursorDirection, GameModeType, GameState, GameTime};

use crate::error::ConfigError;
use crate::modes::{create_game_mode, GameMode};
use crate::settings::GameSettings;

pub struct GameSession {
    bus: EventBus,
    pattern: Arc<Nonogram>,
    settings: GameSettings,
    board: PlayBoard,
    mode: Box<dyn GameMode>,
    state: GameState,
}

impl GameSession {
    /// Builds a session for one pattern from a settings snapshot.
    ///
    /// The snapshot is cloned, so later option edits by the caller never
    /// reach a running game. Configuration problems are fatal here and
    /// leave nothing behind.
    pub fn new(
        bus: EventBus,
        pattern: Arc<Nonogram>,
        settings: &GameSettings,
    ) -> Result<Self, ConfigError> {
        let settings = settings.clone();
        let mode = create_game_mode(&bus, &pattern, &settings)?;
        let board = PlayBoard::new(Arc::clone(&pattern), mode.board_policy());
        Ok(Self {
            bus,
            pattern,
            settings,
            board,
            mode,
            state: GameState::None,
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &PlayBoard {
        &self.board
    }

    pub fn pattern(&self) -> &Arc<Nonogram> {
        &self.pattern
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn mode_type(&self) -> GameModeType {
        self.mode.mode_type()
    }

    pub fn score(&self) -> u32 {
        self.mode.score()
    }

    pub fn game_time(&self) -> GameTime {
        self.mode.game_time()
    }

    pub fn is_solved(&self) -> bool {
        self.state == GameState::Solved
    }

    pub fn is_lost(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Question waiting for an answer, if the rule set asked one.
    pub fn pending_question(&self) -> Option<&str> {
        self.mode.pending_question()
    }

    /// Starts the session. Only valid once, from the initial state.
    pub fn start(&mut self) {
        if self.state != GameState::None {
            tracing::debug!(state = self.state.as_str(), "start ignored");
            return;
        }
        self.bus.fire_program_control(ProgramControlEvent::Start);
        self.mode.on_start();
        self.transition(GameState::Running);
    }

    /// Pauses a running session; a no-op in any other state.
    pub fn pause(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        self.mode.on_pause();
        self.bus.fire_program_control(ProgramControlEvent::Pause);
        self.transition(GameState::Paused);
    }

    /// Resumes a paused session.
    pub fn resume(&mut self) {
        if self.state != GameState::Paused {
            return;
        }
        self.mode.on_resume();
        self.bus.fire_program_control(ProgramControlEvent::Resume);
        self.transition(GameState::Running);
    }

    /// Ends the session on the player's request.
    pub fn stop(&mut self) {
        if self.state.is_terminal() || self.state == GameState::None {
            return;
        }
        self.mode.on_stop();
        self.bus.fire_program_control(ProgramControlEvent::Stop);
        self.transition(GameState::UserStopped);
    }

    /// Quits from any state, releasing the owned timer.
    pub fn quit(&mut self) {
        self.mode.on_quit();
        self.bus.fire_program_control(ProgramControlEvent::Quit);
        if !self.state.is_terminal() && self.state != GameState::None {
            self.transition(GameState::UserStopped);
        }
    }

    /// Starts over on the same pattern with the same settings snapshot.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.mode.on_quit();
        self.mode = create_game_mode(&self.bus, &self.pattern, &self.settings)?;
        self.board = PlayBoard::new(Arc::clone(&self.pattern), self.mode.board_policy());
        self.bus.fire_program_control(ProgramControlEvent::Restart);
        self.mode.on_start();
        self.transition(GameState::Running);
        Ok(())
    }

    /// Tries to occupy a cell. Returns whether the board changed; a wrong
    /// guess returns false after routing its consequence through the rule
    /// set. Out-of-range coordinates are a caller bug and error out.
    pub fn occupy(&mut self, column: usize, row: usize) -> picross_core::Result<bool> {
        if self.state != GameState::Running {
            tracing::debug!(state = self.state.as_str(), "field can not be occupied");
            return Ok(false);
        }
        match self.board.occupy(column, row)? {
            OccupyOutcome::Occupied => {
                self.bus.fire_field_occupied(column, row);
                self.check_outcome();
                Ok(true)
            }
            OccupyOutcome::Unoccupied => {
                self.bus.fire_field_unoccupied(column, row);
                self.check_outcome();
                Ok(true)
            }
            OccupyOutcome::Wrong { marked } => {
                self.bus.fire_wrong_field_occupied(column, row);
                if marked {
                    self.bus.fire_field_marked(column, row);
                }
                self.mode.on_wrong_move();
                self.check_outcome();
                Ok(false)
            }
            OccupyOutcome::Rejected => Ok(false),
        }
    }

    /// Toggles the mark on a cell. Returns whether the board changed.
    pub fn mark(&mut self, column: usize, row: usize) -> picross_core::Result<bool> {
        if self.state != GameState::Running {
            tracing::debug!(state = self.state.as_str(), "field can not be marked");
            return Ok(false);
        }
        match self.board.mark(column, row)? {
            MarkOutcome::Marked => {
                self.bus.fire_field_marked(column, row);
                self.check_outcome();
                Ok(true)
            }
            MarkOutcome::Unmarked => {
                self.bus.fire_field_unmarked(column, row);
                // taking a mark off a picture cell can complete a
                // marked-through solve
                self.check_outcome();
                Ok(true)
            }
            MarkOutcome::Rejected => Ok(false),
        }
    }

    /// Moves the active-cell cursor, clamped at the edges.
    pub fn move_active(&mut self, direction: CursorDirection) {
        if self.board.move_active(direction) {
            let (column, row) = self.board.active();
            self.bus.fire_active_field_changed(column, row);
        }
    }

    pub fn set_active(&mut self, column: usize, row: usize) -> picross_core::Result<()> {
        self.board.set_active(column, row)?;
        self.bus.fire_active_field_changed(column, row);
        Ok(())
    }

    /// Answers the pending quiz question. Returns whether the answer was
    /// accepted.
    pub fn answer_quiz(&mut self, answer: &str) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        let accepted = self.mode.check_answer(answer);
        if !accepted {
            self.check_outcome();
        }
        accepted
    }

    /// Reveals the solution and ends the session as solved.
    pub fn solve_game(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        self.board.solve();
        self.mode.on_stop();
        self.transition(GameState::Solved);
    }

    /// Polled check for conditions that ripen without a move, like a
    /// count-down running out.
    pub fn update(&mut self) {
        if self.state == GameState::Running && self.mode.is_lost() {
            self.mode.on_stop();
            self.transition(GameState::GameOver);
        }
    }

    fn check_outcome(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        if self.mode.is_lost() {
            self.mode.on_stop();
            self.transition(GameState::GameOver);
        } else if self.mode.is_solved(&self.board) {
            self.mode.on_stop();
            self.transition(GameState::Solved);
        }
    }

    fn transition(&mut self, new: GameState) {
        let old = std::mem::replace(&mut self.state, new);
        self.bus
            .fire_state_changed(old, new, self.mode.game_time(), self.mode.score());
    }
}
