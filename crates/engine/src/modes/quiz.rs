//! Quiz rule set: a wrong move triggers an arithmetic question; a wrong
//! answer loses the game. The score accumulates correct answers.

use std::time::{SystemTime, UNIX_EPOCH};

use picross_core::{BoardPolicy, PlayBoard};
use picross_events::EventBus;
use picross_types::GameModeType;

use crate::settings::GameSettings;

use super::{board_complete, checked_policy, GameMode};

/// LCG with Numerical Recipes constants, enough for question factors.
struct QuestionRng {
    state: u32,
}

impl QuestionRng {
    fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_range(&mut self, max: u32) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state % max
    }
}

struct Question {
    text: String,
    answer: i64,
}

pub struct QuizMode {
    bus: EventBus,
    rng: QuestionRng,
    pending: Option<Question>,
    correct_answers: u32,
    lost: bool,
    policy: BoardPolicy,
    count_marked: bool,
}

impl QuizMode {
    pub fn new(bus: &EventBus, settings: &GameSettings) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0x5eed);
        Self::with_seed(bus, settings, seed)
    }

    /// Deterministic questions for tests.
    pub fn with_seed(bus: &EventBus, settings: &GameSettings, seed: u32) -> Self {
        Self {
            bus: bus.clone(),
            rng: QuestionRng::new(seed),
            pending: None,
            correct_answers: 0,
            lost: false,
            policy: checked_policy(settings),
            count_marked: settings.count_marked,
        }
    }

    fn next_question(&mut self) -> Question {
        let a = i64::from(self.rng.next_range(20) + 1);
        let b = i64::from(self.rng.next_range(20) + 1);
        Question {
            text: format!("Multiply {a} by {b}!"),
            answer: a * b,
        }
    }
}

impl GameMode for QuizMode {
    fn mode_type(&self) -> GameModeType {
        GameModeType::Quiz
    }

    fn board_policy(&self) -> BoardPolicy {
        self.policy
    }

    fn on_wrong_move(&mut self) {
        // one question at a time; a wrong move during an open question
        // does not stack another
        if self.pending.is_some() {
            return;
        }
        let question = self.next_question();
        self.bus.fire_quiz(question.text.clone());
        self.pending = Some(question);
    }

    fn is_solved(&self, board: &PlayBoard) -> bool {
        board_complete(board, self.count_marked)
    }

    fn is_lost(&self) -> bool {
        self.lost
    }

    /// Accumulated correctly answered questions.
    fn score(&self) -> u32 {
        self.correct_answers
    }

    fn pending_question(&self) -> Option<&str> {
        self.pending.as_ref().map(|q| q.text.as_str())
    }

    fn check_answer(&mut self, answer: &str) -> bool {
        let Some(question) = self.pending.take() else {
            return true;
        };
        let correct = answer
            .trim()
            .parse::<i64>()
            .map(|given| given == question.answer)
            .unwrap_or(false);
        if correct {
            self.correct_answers += 1;
        } else {
            tracing::debug!(expected = question.answer, given = answer, "quiz answer wrong");
            self.lost = true;
        }
        correct
    }
}
