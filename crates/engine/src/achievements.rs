//! Achievement meters and their tracker.
//!
//! Each meter subscribes to exactly the events its condition needs and
//! latches once accomplished: `is_accomplished` is monotonic for the
//! lifetime of the meter. The [`AchievementTracker`] is a plain service
//! object created per bus wiring; it owns the meters, keeps the aggregate
//! map and unsubscribes everything when dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use picross_events::{EventBus, GameListener, ListenerId, ProgramControlEvent};
use picross_types::{GameState, GameTime};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Everything a player can accomplish within this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Achievement {
    OneWithoutError,
    ThreeWithoutError,
    FiveWithoutError,
    Unmarked,
    HighSpeedSolving,
    VeryHighSpeedSolving,
    UltraHighSpeedSolving,
}

/// A single observer deriving one boolean accomplishment from the event
/// stream.
pub trait AchievementMeter: GameListener {
    fn achievement(&self) -> Achievement;

    /// Monotonic: once this returns true it keeps returning true.
    fn is_accomplished(&self) -> bool;
}

/// Solve with fewer than `condition` marked fields.
struct UnmarkedMeter {
    achievement: Achievement,
    condition: u32,
    marked_fields: Mutex<u32>,
    accomplished: AtomicBool,
}

impl UnmarkedMeter {
    fn new(achievement: Achievement, condition: u32) -> Self {
        Self {
            achievement,
            condition,
            marked_fields: Mutex::new(0),
            accomplished: AtomicBool::new(false),
        }
    }
}

impl GameListener for UnmarkedMeter {
    fn field_marked(&self, _column: usize, _row: usize) {
        *lock(&self.marked_fields) += 1;
    }

    fn program_control(&self, event: ProgramControlEvent) {
        if matches!(event, ProgramControlEvent::Start | ProgramControlEvent::Restart) {
            *lock(&self.marked_fields) = 0;
        }
    }

    fn state_changed(&self, _old: GameState, new: GameState, _time: GameTime, _score: u32) {
        if new == GameState::Solved && *lock(&self.marked_fields) < self.condition {
            self.accomplished.store(true, Ordering::Relaxed);
        }
    }
}

impl AchievementMeter for UnmarkedMeter {
    fn achievement(&self) -> Achievement {
        self.achievement
    }

    fn is_accomplished(&self) -> bool {
        self.accomplished.load(Ordering::Relaxed)
    }
}

/// Win `condition` games in a row without a single wrong move.
struct FaultlessnessMeter {
    achievement: Achievement,
    condition: u32,
    inner: Mutex<FaultlessnessState>,
    accomplished: AtomicBool,
}

#[derive(Default)]
struct FaultlessnessState {
    streak: u32,
    errors_in_current_game: u32,
}

impl FaultlessnessMeter {
    fn new(achievement: Achievement, condition: u32) -> Self {
        Self {
            achievement,
            condition,
            inner: Mutex::new(FaultlessnessState::default()),
            accomplished: AtomicBool::new(false),
        }
    }
}

impl GameListener for FaultlessnessMeter {
    fn wrong_field_occupied(&self, _column: usize, _row: usize) {
        lock(&self.inner).errors_in_current_game += 1;
    }

    fn program_control(&self, event: ProgramControlEvent) {
        if matches!(event, ProgramControlEvent::Start | ProgramControlEvent::Restart) {
            lock(&self.inner).errors_in_current_game = 0;
        }
    }

    fn state_changed(&self, _old: GameState, new: GameState, _time: GameTime, _score: u32) {
        let mut state = lock(&self.inner);
        match new {
            GameState::GameOver => state.streak = 0,
            GameState::Solved => {
                if state.errors_in_current_game == 0 {
                    state.streak += 1;
                    if state.streak >= self.condition {
                        self.accomplished.store(true, Ordering::Relaxed);
                    }
                } else {
                    state.streak = 0;
                }
            }
            _ => {}
        }
    }
}

impl AchievementMeter for FaultlessnessMeter {
    fn achievement(&self) -> Achievement {
        self.achievement
    }

    fn is_accomplished(&self) -> bool {
        self.accomplished.load(Ordering::Relaxed)
    }
}

/// Solve at a rate of at least `condition` occupied fields per minute.
/// The meter clocks the session itself, excluding paused stretches.
struct SpeedMeter {
    achievement: Achievement,
    condition: u32,
    inner: Mutex<SpeedState>,
    accomplished: AtomicBool,
}

#[derive(Default)]
struct SpeedState {
    occupied_fields: u32,
    started: Option<Instant>,
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl SpeedMeter {
    fn new(achievement: Achievement, condition: u32) -> Self {
        Self {
            achievement,
            condition,
            inner: Mutex::new(SpeedState::default()),
            accomplished: AtomicBool::new(false),
        }
    }
}

impl GameListener for SpeedMeter {
    fn field_occupied(&self, _column: usize, _row: usize) {
        lock(&self.inner).occupied_fields += 1;
    }

    fn program_control(&self, event: ProgramControlEvent) {
        let mut state = lock(&self.inner);
        match event {
            ProgramControlEvent::Start | ProgramControlEvent::Restart => {
                *state = SpeedState {
                    started: Some(Instant::now()),
                    ..SpeedState::default()
                };
            }
            ProgramControlEvent::Pause => state.paused_at = Some(Instant::now()),
            ProgramControlEvent::Resume => {
                if let Some(paused_at) = state.paused_at.take() {
                    state.paused_total += paused_at.elapsed();
                }
            }
            _ => {}
        }
    }

    fn state_changed(&self, _old: GameState, new: GameState, _time: GameTime, _score: u32) {
        if new != GameState::Solved {
            return;
        }
        let state = lock(&self.inner);
        let Some(started) = state.started else {
            return;
        };
        let play_time = started.elapsed().saturating_sub(state.paused_total);
        let millis = play_time.as_millis().max(1) as u64;
        let fields_per_minute = u64::from(state.occupied_fields) * 60_000 / millis;
        tracing::debug!(fields_per_minute, condition = self.condition, "solve speed measured");
        if fields_per_minute >= u64::from(self.condition) {
            self.accomplished.store(true, Ordering::Relaxed);
        }
    }
}

impl AchievementMeter for SpeedMeter {
    fn achievement(&self) -> Achievement {
        self.achievement
    }

    fn is_accomplished(&self) -> bool {
        self.accomplished.load(Ordering::Relaxed)
    }
}

/// Service object owning the meters for one event bus.
///
/// Created once per running session wiring; never a global. Dropping the
/// tracker unsubscribes every meter from the bus.
pub struct AchievementTracker {
    bus: EventBus,
    meters: Vec<Arc<dyn AchievementMeter>>,
    subscriptions: Vec<ListenerId>,
    accomplished: Mutex<HashMap<Achievement, bool>>,
}

impl AchievementTracker {
    pub fn new(bus: &EventBus) -> Self {
        let meters: Vec<Arc<dyn AchievementMeter>> = Achievement::iter()
            .map(|achievement| build_meter(achievement))
            .collect();
        let subscriptions = meters
            .iter()
            .map(|meter| {
                let listener: Arc<dyn GameListener> = Arc::clone(meter) as Arc<dyn GameListener>;
                bus.subscribe(listener)
            })
            .collect();
        let accomplished = Achievement::iter().map(|a| (a, false)).collect();
        Self {
            bus: bus.clone(),
            meters,
            subscriptions,
            accomplished: Mutex::new(accomplished),
        }
    }

    /// Folds newly accomplished meters into the aggregate map. Entries
    /// only ever flip from false to true.
    pub fn update(&self) {
        let mut map = lock(&self.accomplished);
        for meter in &self.meters {
            let entry = map.entry(meter.achievement()).or_insert(false);
            if !*entry && meter.is_accomplished() {
                *entry = true;
                tracing::info!(achievement = %meter.achievement(), "achievement accomplished");
            }
        }
    }

    pub fn is_accomplished(&self, achievement: Achievement) -> bool {
        self.update();
        lock(&self.accomplished)
            .get(&achievement)
            .copied()
            .unwrap_or(false)
    }

    /// Current aggregate accomplishment map.
    pub fn accomplishments(&self) -> HashMap<Achievement, bool> {
        self.update();
        lock(&self.accomplished).clone()
    }
}

impl Drop for AchievementTracker {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.bus.unsubscribe(id);
        }
    }
}

fn build_meter(achievement: Achievement) -> Arc<dyn AchievementMeter> {
    match achievement {
        Achievement::OneWithoutError => Arc::new(FaultlessnessMeter::new(achievement, 1)),
        Achievement::ThreeWithoutError => Arc::new(FaultlessnessMeter::new(achievement, 3)),
        Achievement::FiveWithoutError => Arc::new(FaultlessnessMeter::new(achievement, 5)),
        Achievement::Unmarked => Arc::new(UnmarkedMeter::new(achievement, 1)),
        Achievement::HighSpeedSolving => Arc::new(SpeedMeter::new(achievement, 30)),
        Achievement::VeryHighSpeedSolving => Arc::new(SpeedMeter::new(achievement, 60)),
        Achievement::UltraHighSpeedSolving => Arc::new(SpeedMeter::new(achievement, 90)),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use picross_types::GameTime;

    fn solved_event(meter: &dyn GameListener) {
        meter.state_changed(
            GameState::Running,
            GameState::Solved,
            GameTime::default(),
            0,
        );
    }

    #[test]
    fn test_unmarked_meter_condition_boundary() {
        let meter = UnmarkedMeter::new(Achievement::Unmarked, 1);
        meter.program_control(ProgramControlEvent::Start);
        solved_event(&meter);
        assert!(meter.is_accomplished());

        let meter = UnmarkedMeter::new(Achievement::Unmarked, 1);
        meter.program_control(ProgramControlEvent::Start);
        meter.field_marked(0, 0);
        meter.field_marked(1, 0);
        solved_event(&meter);
        assert!(!meter.is_accomplished());
    }

    #[test]
    fn test_unmarked_meter_is_monotonic() {
        let meter = UnmarkedMeter::new(Achievement::Unmarked, 1);
        meter.program_control(ProgramControlEvent::Start);
        solved_event(&meter);
        assert!(meter.is_accomplished());

        // a later marked-up solve does not take it back
        meter.program_control(ProgramControlEvent::Start);
        meter.field_marked(0, 0);
        meter.field_marked(1, 0);
        solved_event(&meter);
        assert!(meter.is_accomplished());
    }

    #[test]
    fn test_faultlessness_streak_and_reset() {
        let meter = FaultlessnessMeter::new(Achievement::ThreeWithoutError, 3);
        for _ in 0..2 {
            meter.program_control(ProgramControlEvent::Start);
            solved_event(&meter);
        }
        assert!(!meter.is_accomplished());

        // a lost game resets the streak
        meter.program_control(ProgramControlEvent::Start);
        meter.state_changed(
            GameState::Running,
            GameState::GameOver,
            GameTime::default(),
            0,
        );
        for _ in 0..2 {
            meter.program_control(ProgramControlEvent::Start);
            solved_event(&meter);
        }
        assert!(!meter.is_accomplished());

        meter.program_control(ProgramControlEvent::Start);
        solved_event(&meter);
        assert!(meter.is_accomplished());
    }

    #[test]
    fn test_faultlessness_wrong_move_breaks_the_game() {
        let meter = FaultlessnessMeter::new(Achievement::OneWithoutError, 1);
        meter.program_control(ProgramControlEvent::Start);
        meter.wrong_field_occupied(0, 0);
        solved_event(&meter);
        assert!(!meter.is_accomplished());

        meter.program_control(ProgramControlEvent::Start);
        solved_event(&meter);
        assert!(meter.is_accomplished());
    }

    #[test]
    fn test_speed_meter_measures_rate() {
        // a handful of fields within milliseconds clears any human bar
        let meter = SpeedMeter::new(Achievement::HighSpeedSolving, 30);
        meter.program_control(ProgramControlEvent::Start);
        for i in 0..5 {
            meter.field_occupied(i, 0);
        }
        solved_event(&meter);
        assert!(meter.is_accomplished());

        // an impossible bar stays out of reach
        let meter = SpeedMeter::new(Achievement::UltraHighSpeedSolving, u32::MAX);
        meter.program_control(ProgramControlEvent::Start);
        meter.field_occupied(0, 0);
        solved_event(&meter);
        assert!(!meter.is_accomplished());
    }

    #[test]
    fn test_tracker_aggregates_and_unsubscribes() {
        let bus = EventBus::new();
        let tracker = AchievementTracker::new(&bus);
        let subscribed = bus.subscriber_count();
        assert_eq!(subscribed, Achievement::iter().count());

        bus.fire_program_control(ProgramControlEvent::Start);
        for i in 0..3 {
            bus.fire_field_occupied(i, 0);
        }
        bus.fire_state_changed(
            GameState::Running,
            GameState::Solved,
            GameTime::default(),
            100,
        );

        assert!(tracker.is_accomplished(Achievement::OneWithoutError));
        assert!(tracker.is_accomplished(Achievement::Unmarked));
        assert!(!tracker.is_accomplished(Achievement::ThreeWithoutError));
        let map = tracker.accomplishments();
        assert_eq!(map.len(), Achievement::iter().count());

        drop(tracker);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
