//! Penalty rule set: wrong moves cost time off a budget clock, the game
//! is never lost; the score is whatever remains.

use picross_core::{BoardPolicy, PlayBoard};
use picross_events::EventBus;
use picross_types::{GameModeType, GameTime};

use crate::error::ConfigError;
use crate::settings::GameSettings;
use crate::timer::{GameTimer, TimerDirection};

use super::{board_complete, checked_policy, GameMode};

/// Minutes deducted: 1, 2, 4, 8, then 8 for every further wrong move.
fn penalty_minutes(wrong_moves_so_far: u32) -> u64 {
    1u64 << wrong_moves_so_far.min(3)
}

pub struct PenaltyMode {
    bus: EventBus,
    timer: GameTimer,
    penalty_count: u32,
    policy: BoardPolicy,
    count_marked: bool,
}

impl PenaltyMode {
    pub fn new(bus: &EventBus, settings: &GameSettings) -> Result<Self, ConfigError> {
        if settings.max_time.is_zero() {
            return Err(ConfigError::Validation(
                "penalty rule set needs a positive time budget".into(),
            ));
        }
        Ok(Self {
            bus: bus.clone(),
            timer: GameTimer::new(bus.clone(), TimerDirection::CountDown, settings.max_time),
            penalty_count: 0,
            policy: checked_policy(settings),
            count_marked: settings.count_marked,
        })
    }
}

impl GameMode for PenaltyMode {
    fn mode_type(&self) -> GameModeType {
        GameModeType::Penalty
    }

    fn board_policy(&self) -> BoardPolicy {
        self.policy
    }

    fn on_start(&mut self) {
        self.timer.start();
        self.bus.fire_set_time(self.timer.game_time());
    }

    fn on_wrong_move(&mut self) {
        let minutes = penalty_minutes(self.penalty_count);
        self.penalty_count += 1;
        self.timer.sub_time(minutes, 0);
        tracing::debug!(minutes, "penalty deducted");
        self.bus.fire_set_time(self.timer.game_time());
    }

    fn is_solved(&self, board: &PlayBoard) -> bool {
        board_complete(board, self.count_marked)
    }

    fn score(&self) -> u32 {
        self.timer.remaining().as_secs() as u32
    }

    fn game_time(&self) -> GameTime {
        self.timer.game_time()
    }

    fn on_pause(&mut self) {
        self.timer.stop();
    }

    fn on_resume(&mut self) {
        self.timer.start();
    }

    fn on_stop(&mut self) {
        self.timer.stop();
    }

    fn on_quit(&mut self) {
        self.timer.stop();
    }
}
