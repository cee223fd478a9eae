//! Count-up rule set: elapsed time is the score, lower is better. Wrong
//! moves add penalty minutes to the clock instead of losing the game.

use picross_core::{BoardPolicy, PlayBoard};
use picross_events::EventBus;
use picross_types::{GameModeType, GameTime};

use crate::settings::GameSettings;
use crate::timer::{GameTimer, TimerDirection};

use super::{board_complete, checked_policy, GameMode};

/// Minutes added per wrong move; the last entry repeats.
const PENALTIES: [u64; 4] = [1, 2, 4, 8];

const SCORE_BASE: u64 = 10_000;

pub struct CountUpTimeMode {
    bus: EventBus,
    timer: GameTimer,
    penalty_count: usize,
    policy: BoardPolicy,
    count_marked: bool,
}

impl CountUpTimeMode {
    pub fn new(bus: &EventBus, settings: &GameSettings) -> Self {
        Self {
            bus: bus.clone(),
            timer: GameTimer::new(bus.clone(), TimerDirection::CountUp, std::time::Duration::ZERO),
            penalty_count: 0,
            policy: checked_policy(settings),
            count_marked: settings.count_marked,
        }
    }
}

impl GameMode for CountUpTimeMode {
    fn mode_type(&self) -> GameModeType {
        GameModeType::CountUpTime
    }

    fn board_policy(&self) -> BoardPolicy {
        self.policy
    }

    fn on_start(&mut self) {
        self.timer.start();
    }

    fn on_wrong_move(&mut self) {
        let minutes = PENALTIES[self.penalty_count.min(PENALTIES.len() - 1)];
        self.penalty_count += 1;
        self.timer.add_time(minutes, 0);
        self.bus.fire_set_time(self.timer.game_time());
    }

    fn is_solved(&self, board: &PlayBoard) -> bool {
        board_complete(board, self.count_marked)
    }

    /// Lower elapsed time means a higher score.
    fn score(&self) -> u32 {
        SCORE_BASE.saturating_sub(self.timer.game_time().total_seconds()) as u32
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
