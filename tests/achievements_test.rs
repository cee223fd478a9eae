//! Achievement tracking driven by real sessions.

use std::sync::Arc;

use picross::core::{Nonogram, NonogramMeta};
use picross::engine::achievements::{Achievement, AchievementTracker};
use picross::engine::{GameSession, GameSettings};
use picross::events::EventBus;
use picross::types::GameState;

fn plus_pattern() -> Arc<Nonogram> {
    Arc::new(
        Nonogram::new(
            NonogramMeta::named("plus"),
            &[
                vec![false, true, false],
                vec![true, true, true],
                vec![false, true, false],
            ],
        )
        .unwrap(),
    )
}

const PLUS_CELLS: [(usize, usize); 5] = [(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)];

fn wired() -> (GameSession, AchievementTracker) {
    let bus = EventBus::new();
    let tracker = AchievementTracker::new(&bus);
    let settings = GameSettings {
        mark_invalid: false,
        ..GameSettings::default()
    };
    let session = GameSession::new(bus, plus_pattern(), &settings).unwrap();
    (session, tracker)
}

fn solve(session: &mut GameSession) {
    for (x, y) in PLUS_CELLS {
        assert!(session.occupy(x, y).unwrap());
    }
    assert_eq!(session.state(), GameState::Solved);
}

#[test]
fn clean_solve_accomplishes_unmarked_and_first_faultless() {
    let (mut session, tracker) = wired();
    session.start();
    solve(&mut session);

    assert!(tracker.is_accomplished(Achievement::Unmarked));
    assert!(tracker.is_accomplished(Achievement::OneWithoutError));
    // speed: five fields within milliseconds clears every tier
    assert!(tracker.is_accomplished(Achievement::UltraHighSpeedSolving));
    // a single win is no streak of three
    assert!(!tracker.is_accomplished(Achievement::ThreeWithoutError));
}

#[test]
fn marked_fields_spoil_the_unmarked_achievement() {
    let (mut session, tracker) = wired();
    session.start();
    session.mark(0, 0).unwrap();
    session.mark(2, 2).unwrap();
    solve(&mut session);

    assert!(!tracker.is_accomplished(Achievement::Unmarked));
    // marking is not a fault
    assert!(tracker.is_accomplished(Achievement::OneWithoutError));
}

#[test]
fn wrong_move_spoils_faultlessness_for_the_session() {
    let (mut session, tracker) = wired();
    session.start();
    assert!(!session.occupy(0, 0).unwrap());
    solve(&mut session);

    assert!(!tracker.is_accomplished(Achievement::OneWithoutError));
    assert!(tracker.is_accomplished(Achievement::Unmarked));
}

#[test]
fn restart_resets_per_session_counters() {
    let (mut session, tracker) = wired();
    session.start();
    session.mark(0, 0).unwrap();
    assert!(!session.occupy(2, 0).unwrap());

    session.restart().unwrap();
    solve(&mut session);

    // both the marks and the fault belonged to the abandoned run
    assert!(tracker.is_accomplished(Achievement::Unmarked));
    assert!(tracker.is_accomplished(Achievement::OneWithoutError));
}

#[test]
fn streak_of_three_faultless_wins_via_restart() {
    let (mut session, tracker) = wired();
    session.start();
    solve(&mut session);
    for _ in 0..2 {
        session.restart().unwrap();
        solve(&mut session);
    }

    assert!(tracker.is_accomplished(Achievement::ThreeWithoutError));
    assert!(!tracker.is_accomplished(Achievement::FiveWithoutError));

    let map = tracker.accomplishments();
    assert_eq!(map[&Achievement::ThreeWithoutError], true);
    assert_eq!(map[&Achievement::FiveWithoutError], false);
}

#[test]
fn accomplishments_are_monotonic_across_later_sessions() {
    let (mut session, tracker) = wired();
    session.start();
    solve(&mut session);
    assert!(tracker.is_accomplished(Achievement::Unmarked));

    // a sloppier follow-up run does not revoke anything
    session.restart().unwrap();
    session.mark(0, 0).unwrap();
    session.mark(2, 2).unwrap();
    solve(&mut session);
    assert!(tracker.is_accomplished(Achievement::Unmarked));
}
