//! Synchronous multi-listener event bus.
//!
//! `publish` enqueues the event and drains the queue on the calling
//! thread: delivery is synchronous and FIFO per publisher. A publish
//! issued from inside a listener callback is queued and delivered after
//! the current event finishes, so listeners may react by firing further
//! events without recursing or deadlocking. When two threads publish
//! concurrently, whichever holds the dispatch guard delivers both; the
//! other returns immediately after enqueueing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use picross_types::{GameState, GameTime};

use crate::event::{
    FieldControlEvent, FieldControlKind, GameEvent, ProgramControlEvent, QuizEvent,
    StateChangeEvent,
};
use crate::listener::GameListener;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct BusInner {
    listeners: Mutex<Vec<(ListenerId, Arc<dyn GameListener>)>>,
    next_id: AtomicU64,
    queue: Mutex<VecDeque<GameEvent>>,
    /// Held by the thread currently delivering events.
    dispatching: Mutex<()>,
}

/// Cloneable bus handle; clones share the same subscriber list and queue.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                queue: Mutex::new(VecDeque::new()),
                dispatching: Mutex::new(()),
            }),
        }
    }

    /// Registers a listener. Delivery happens in registration order.
    pub fn subscribe(&self, listener: Arc<dyn GameListener>) -> ListenerId {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.inner.listeners).push((id, listener));
        id
    }

    /// Removes a listener. Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = lock(&self.inner.listeners);
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }

    /// Publishes an event to every current subscriber.
    pub fn publish(&self, event: GameEvent) {
        if let GameEvent::StateChange(StateChangeEvent::StateChanged { old, new, .. }) = &event {
            tracing::debug!(old = old.as_str(), new = new.as_str(), "game state changed");
        }
        lock(&self.inner.queue).push_back(event);
        self.drain();
    }

    fn drain(&self) {
        loop {
            let guard = match self.inner.dispatching.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                // Another thread is dispatching and will pick our event up.
                Err(TryLockError::WouldBlock) => return,
            };

            loop {
                let Some(event) = lock(&self.inner.queue).pop_front() else {
                    break;
                };
                // Deliver against a snapshot so listeners can subscribe or
                // unsubscribe from inside a callback.
                let snapshot: Vec<Arc<dyn GameListener>> = lock(&self.inner.listeners)
                    .iter()
                    .map(|(_, listener)| Arc::clone(listener))
                    .collect();
                for listener in snapshot {
                    event.dispatch(listener.as_ref());
                }
            }

            drop(guard);
            // An event enqueued between the empty check and the guard drop
            // would be stranded; re-check before returning.
            if lock(&self.inner.queue).is_empty() {
                return;
            }
        }
    }

    fn fire_field(&self, kind: FieldControlKind, column: usize, row: usize) {
        self.publish(GameEvent::FieldControl(FieldControlEvent { kind, column, row }));
    }

    pub fn fire_field_occupied(&self, column: usize, row: usize) {
        self.fire_field(FieldControlKind::Occupied, column, row);
    }

    pub fn fire_field_unoccupied(&self, column: usize, row: usize) {
        self.fire_field(FieldControlKind::Unoccupied, column, row);
    }

    pub fn fire_field_marked(&self, column: usize, row: usize) {
        self.fire_field(FieldControlKind::Marked, column, row);
    }

    pub fn fire_field_unmarked(&self, column: usize, row: usize) {
        self.fire_field(FieldControlKind::Unmarked, column, row);
    }

    pub fn fire_wrong_field_occupied(&self, column: usize, row: usize) {
        self.fire_field(FieldControlKind::WrongOccupied, column, row);
    }

    pub fn fire_active_field_changed(&self, column: usize, row: usize) {
        self.fire_field(FieldControlKind::ActiveChanged, column, row);
    }

    pub fn fire_state_changed(&self, old: GameState, new: GameState, time: GameTime, score: u32) {
        self.publish(GameEvent::StateChange(StateChangeEvent::StateChanged {
            old,
            new,
            time,
            score,
        }));
    }

    pub fn fire_timer(&self, time: GameTime) {
        self.publish(GameEvent::StateChange(StateChangeEvent::Timer { time }));
    }

    pub fn fire_set_time(&self, time: GameTime) {
        self.publish(GameEvent::StateChange(StateChangeEvent::SetTime { time }));
    }

    pub fn fire_set_fail_count(&self, fails_left: u32) {
        self.publish(GameEvent::StateChange(StateChangeEvent::SetFailCount {
            fails_left,
        }));
    }

    pub fn fire_program_control(&self, event: ProgramControlEvent) {
        self.publish(GameEvent::ProgramControl(event));
    }

    pub fn fire_quiz(&self, question: impl Into<String>) {
        self.publish(GameEvent::Quiz(QuizEvent {
            question: question.into(),
        }));
    }
}

/// Poison-tolerant lock: a panicking listener must not take the bus down.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        log: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }

        fn push(&self, entry: impl Into<String>) {
            self.log.lock().unwrap().push(entry.into());
        }
    }

    impl GameListener for Recorder {
        fn field_occupied(&self, column: usize, row: usize) {
            self.push(format!("occupied {column},{row}"));
        }

        fn field_marked(&self, column: usize, row: usize) {
            self.push(format!("marked {column},{row}"));
        }

        fn wrong_field_occupied(&self, column: usize, row: usize) {
            self.push(format!("wrong {column},{row}"));
        }

        fn state_changed(&self, old: GameState, new: GameState, _time: GameTime, _score: u32) {
            self.push(format!("state {}->{}", old.as_str(), new.as_str()));
        }

        fn timer(&self, time: GameTime) {
            self.push(format!("tick {time}"));
        }

        fn program_control(&self, event: ProgramControlEvent) {
            self.push(format!("program {event:?}"));
        }
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let bus = EventBus::new();
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        bus.subscribe(first.clone());
        bus.subscribe(second.clone());

        bus.fire_field_occupied(1, 2);

        assert_eq!(first.entries(), vec!["occupied 1,2"]);
        assert_eq!(second.entries(), vec!["occupied 1,2"]);
    }

    #[test]
    fn test_fifo_for_single_publisher() {
        let bus = EventBus::new();
        let recorder = Arc::new(Recorder::default());
        bus.subscribe(recorder.clone());

        bus.fire_field_occupied(0, 0);
        bus.fire_wrong_field_occupied(1, 0);
        bus.fire_field_marked(2, 0);

        assert_eq!(
            recorder.entries(),
            vec!["occupied 0,0", "wrong 1,0", "marked 2,0"]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let recorder = Arc::new(Recorder::default());
        let id = bus.subscribe(recorder.clone());

        bus.fire_field_occupied(0, 0);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.fire_field_occupied(1, 1);

        assert_eq!(recorder.entries(), vec!["occupied 0,0"]);
        assert_eq!(bus.subscriber_count(), 0);
    }

    /// A listener that republishes finishes delivering the current event
    /// to everyone before the nested event goes out.
    #[test]
    fn test_reentrant_publish_is_queued() {
        struct Chainer {
            bus: EventBus,
            log: Mutex<Vec<String>>,
        }

        impl GameListener for Chainer {
            fn field_occupied(&self, column: usize, row: usize) {
                self.log.lock().unwrap().push(format!("chainer occupied {column},{row}"));
                self.bus.fire_field_marked(column, row);
            }

            fn field_marked(&self, column: usize, row: usize) {
                self.log.lock().unwrap().push(format!("chainer marked {column},{row}"));
            }
        }

        let bus = EventBus::new();
        let chainer = Arc::new(Chainer {
            bus: bus.clone(),
            log: Mutex::new(Vec::new()),
        });
        let tail = Arc::new(Recorder::default());
        bus.subscribe(chainer.clone());
        bus.subscribe(tail.clone());

        bus.fire_field_occupied(4, 4);

        // the tail listener saw the occupied event before the nested mark
        assert_eq!(tail.entries(), vec!["occupied 4,4", "marked 4,4"]);
        assert_eq!(
            chainer.log.lock().unwrap().clone(),
            vec!["chainer occupied 4,4", "chainer marked 4,4"]
        );
    }

    #[test]
    fn test_concurrent_publish_delivers_everything() {
        let bus = EventBus::new();
        let recorder = Arc::new(Recorder::default());
        bus.subscribe(recorder.clone());

        let threads: Vec<_> = (0..4)
            .map(|t| {
                let bus = bus.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        bus.fire_field_occupied(t, i);
                    }
                })
            })
            .collect();
        for handle in threads {
            handle.join().unwrap();
        }

        let entries = recorder.entries();
        assert_eq!(entries.len(), 200);
        // per-publisher order is preserved
        for t in 0..4 {
            let rows: Vec<usize> = entries
                .iter()
                .filter_map(|e| {
                    e.strip_prefix(&format!("occupied {t},"))
                        .map(|row| row.parse().unwrap())
                })
                .collect();
            assert_eq!(rows, (0..50).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_subscribe_during_dispatch_sees_later_events() {
        struct Subscriber {
            bus: EventBus,
            late: Arc<Recorder>,
            added: Mutex<bool>,
        }

        impl GameListener for Subscriber {
            fn field_occupied(&self, _column: usize, _row: usize) {
                let mut added = self.added.lock().unwrap();
                if !*added {
                    self.bus.subscribe(self.late.clone());
                    *added = true;
                }
            }
        }

        let bus = EventBus::new();
        let late = Arc::new(Recorder::default());
        bus.subscribe(Arc::new(Subscriber {
            bus: bus.clone(),
            late: late.clone(),
            added: Mutex::new(false),
        }));

        bus.fire_field_occupied(0, 0);
        assert_eq!(late.entries(), Vec::<String>::new());

        bus.fire_field_occupied(1, 0);
        assert_eq!(late.entries(), vec!["occupied 1,0"]);
    }
}
