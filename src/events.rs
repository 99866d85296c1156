//! Lock-free event queue between callback context and the control loop.
//!
//! Events are produced by:
//! - MQTT client callbacks (new commanded power, link state)
//! - HTTP panel handlers (manual override triggers)
//! - timer bookkeeping in the main loop
//!
//! and consumed one at a time by the main control loop.  The producers run
//! on different tasks, so the queue is the multi-producer lock-free ring
//! from `heapless` behind a thin firmware-specific API.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ MQTT handler │────▶│              │     │              │
//! │ Panel handler│────▶│  Event Queue │────▶│  Main Loop   │
//! │ Timers       │────▶│  (lock-free) │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::mpmc::Q16;

/// System event types, ordered by rough priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // ── Sensing ───────────────────────────────────────────
    /// Temperature sampling interval elapsed.
    TemperatureTick,

    // ── Control ───────────────────────────────────────────
    /// Actuator path pacing tick.
    ControlTick,
    /// A command source changed (MQTT power or panel override); the
    /// actuator path reruns immediately instead of waiting for a tick.
    CommandReceived,

    // ── Communication ─────────────────────────────────────
    /// The MQTT/WiFi link went up or down.
    LinkChanged,
}

// 16 pending events is plenty: the loop drains the queue every 100 ms
// and each producer contributes at most a couple of entries per cycle.
static EVENT_QUEUE: Q16<Event> = Q16::new();

/// Push an event into the queue.
/// Safe to call from any producer context (lock-free).
/// Returns `false` if the queue is full (event dropped — the shared
/// command state still carries the latest value, so a dropped
/// `CommandReceived` only delays the recompute by one loop iteration).
pub fn push_event(event: Event) -> bool {
    EVENT_QUEUE.enqueue(event).is_ok()
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    EVENT_QUEUE.dequeue()
}

/// Drain all pending events into a callback, FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

// ── Tests ─────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // The queue is a process-wide static; serialise the tests that use it.
    static QUEUE_LOCK: Mutex<()> = Mutex::new(());

    fn lock_and_drain() -> std::sync::MutexGuard<'static, ()> {
        let guard = QUEUE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        drain_events(|_| {});
        guard
    }

    #[test]
    fn fifo_order_and_drop_on_full() {
        let _guard = lock_and_drain();

        assert!(push_event(Event::TemperatureTick));
        assert!(push_event(Event::ControlTick));
        assert!(push_event(Event::LinkChanged));

        assert_eq!(pop_event(), Some(Event::TemperatureTick));
        assert_eq!(pop_event(), Some(Event::ControlTick));
        assert_eq!(pop_event(), Some(Event::LinkChanged));
        assert_eq!(pop_event(), None);

        for _ in 0..16 {
            assert!(push_event(Event::ControlTick));
        }
        assert!(!push_event(Event::ControlTick), "full queue drops");
        drain_events(|_| {});
    }

    #[test]
    fn concurrent_producers_lose_no_accepted_event() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let _guard = lock_and_drain();

        const PRODUCERS: usize = 4;
        const PUSHES: usize = 20_000;

        let accepted = AtomicUsize::new(0);
        let done = AtomicUsize::new(0);
        let mut consumed = 0_usize;

        std::thread::scope(|scope| {
            for _ in 0..PRODUCERS {
                scope.spawn(|| {
                    for _ in 0..PUSHES {
                        if push_event(Event::CommandReceived) {
                            accepted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    done.fetch_add(1, Ordering::Release);
                });
            }

            // Drain concurrently so producers keep finding room.
            while done.load(Ordering::Acquire) < PRODUCERS {
                drain_events(|event| {
                    assert_eq!(event, Event::CommandReceived);
                    consumed += 1;
                });
            }
        });

        // Producers joined; everything accepted must still be readable.
        drain_events(|event| {
            assert_eq!(event, Event::CommandReceived);
            consumed += 1;
        });
        assert_eq!(
            consumed,
            accepted.load(Ordering::Relaxed),
            "an accepted event was lost"
        );
    }
}
