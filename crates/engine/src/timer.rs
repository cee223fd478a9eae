//! Game clock with pause/resume and a periodic tick.
//!
//! Elapsed and remaining time are always recomputed from monotonic
//! [`Instant`] readings minus the accumulated pause duration; nothing is
//! advanced by summing tick deltas, so the clock cannot drift no matter
//! how many pause/resume cycles happen. The tick runs on its own thread
//! and publishes through the shared event bus, interleaving safely with
//! player-driven events.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use picross_events::EventBus;
use picross_types::{GameTime, TICK_INTERVAL};

/// Whether the clock runs toward or away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerDirection {
    CountUp,
    CountDown,
}

#[derive(Debug)]
struct TimerState {
    direction: TimerDirection,
    /// Base duration loaded at construction.
    loaded: Duration,
    /// Manual adjustment from add_time/sub_time, in milliseconds.
    offset_ms: i64,
    started_at: Option<Instant>,
    paused_at: Option<Instant>,
    accumulated_pause: Duration,
    running: bool,
}

impl TimerState {
    /// Wall time spent running, pause time excluded.
    fn raw_elapsed(&self) -> Duration {
        let Some(start) = self.started_at else {
            return Duration::ZERO;
        };
        let reference = if self.running {
            Instant::now()
        } else {
            self.paused_at.unwrap_or(start)
        };
        reference
            .saturating_duration_since(start)
            .saturating_sub(self.accumulated_pause)
    }

    /// The directional clock value, floored at zero.
    fn clock(&self) -> Duration {
        let raw = self.raw_elapsed().as_millis() as i64;
        let base = self.loaded.as_millis() as i64 + self.offset_ms;
        let ms = match self.direction {
            TimerDirection::CountDown => base - raw,
            TimerDirection::CountUp => base + raw,
        };
        Duration::from_millis(ms.max(0) as u64)
    }
}

struct Ticker {
    stop_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

/// Clock owned by a time-aware rule set.
pub struct GameTimer {
    bus: EventBus,
    state: Arc<Mutex<TimerState>>,
    tick_interval: Duration,
    ticker: Option<Ticker>,
}

impl GameTimer {
    pub fn new(bus: EventBus, direction: TimerDirection, loaded: Duration) -> Self {
        tracing::debug!(?direction, loaded_ms = loaded.as_millis() as u64, "game timer created");
        Self {
            bus,
            state: Arc::new(Mutex::new(TimerState {
                direction,
                loaded,
                offset_ms: 0,
                started_at: None,
                paused_at: None,
                accumulated_pause: Duration::ZERO,
                running: false,
            })),
            tick_interval: TICK_INTERVAL,
            ticker: None,
        }
    }

    /// Overrides the tick period (tests use short intervals).
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Starts or resumes the clock and the periodic tick.
    ///
    /// The first call records the reference instant; later calls fold the
    /// just-ended pause into the accumulated pause total.
    pub fn start(&mut self) {
        {
            let mut state = lock(&self.state);
            if state.running {
                return;
            }
            match state.started_at {
                None => state.started_at = Some(Instant::now()),
                Some(_) => {
                    if let Some(paused_at) = state.paused_at.take() {
                        state.accumulated_pause += paused_at.elapsed();
                    }
                }
            }
            state.running = true;
        }
        self.spawn_ticker();
    }

    /// Pauses the clock and cancels the tick. Idempotent.
    pub fn stop(&mut self) {
        {
            let mut state = lock(&self.state);
            if !state.running {
                return;
            }
            state.paused_at = Some(Instant::now());
            state.running = false;
        }
        self.cancel_ticker();
    }

    pub fn is_running(&self) -> bool {
        lock(&self.state).running
    }

    /// Run time so far, pause time excluded.
    pub fn elapsed(&self) -> Duration {
        lock(&self.state).raw_elapsed()
    }

    /// Time left on a count-down clock; zero for count-up clocks.
    pub fn remaining(&self) -> Duration {
        let state = lock(&self.state);
        match state.direction {
            TimerDirection::CountDown => state.clock(),
            TimerDirection::CountUp => Duration::ZERO,
        }
    }

    /// The directional clock value as carried by events.
    pub fn game_time(&self) -> GameTime {
        GameTime::from_duration(lock(&self.state).clock())
    }

    /// True once a count-down clock reached zero.
    pub fn is_time_elapsed(&self) -> bool {
        let state = lock(&self.state);
        state.direction == TimerDirection::CountDown && state.clock().is_zero()
    }

    /// Adds to the manual offset applied on every later reading.
    pub fn add_time(&self, minutes: u64, seconds: u64) {
        lock(&self.state).offset_ms += ((minutes * 60 + seconds) * 1000) as i64;
    }

    /// Subtracts from the manual offset.
    pub fn sub_time(&self, minutes: u64, seconds: u64) {
        lock(&self.state).offset_ms -= ((minutes * 60 + seconds) * 1000) as i64;
    }

    fn spawn_ticker(&mut self) {
        if self.ticker.is_some() {
            return;
        }
        let (stop_tx, stop_rx) = mpsc::channel();
        let bus = self.bus.clone();
        let state = Arc::clone(&self.state);
        let interval = self.tick_interval;
        let handle = thread::spawn(move || loop {
            bus.fire_timer(GameTime::from_duration(lock(&state).clock()));
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        self.ticker = Some(Ticker { stop_tx, handle });
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            let _ = ticker.stop_tx.send(());
            let _ = ticker.handle.join();
        }
    }
}

impl Drop for GameTimer {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

fn lock(state: &Mutex<TimerState>) -> MutexGuard<'_, TimerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
