// event.rs - Fixed-timestep event queue
//
// The queue polls signals and input every `tick` and turns accumulated time
// into TIMER events once per `delay`, so the simulation rate is independent
// of how often the interface is polled.

use std::sync::Arc;
use std::time::Duration;

use crate::input::{InputSource, Key};
use crate::signal::SignalFlags;

pub const QUEUE_SIZE: usize = 1024;
pub const SECOND: Duration = Duration::from_micros(1_000_000);
pub const DELAY_MIN: Duration = Duration::from_micros(20_000);
pub const DELAY_MAX: Duration = SECOND;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Quit,
    Key(Key),
    Timer,
    Winch,
}

/// Fixed-capacity circular buffer; `head == None` means empty.
#[derive(Debug)]
struct Ring {
    slots: Box<[Option<Event>]>,
    head: Option<usize>,
    tail: usize,
}

impl Ring {
    fn new() -> Self {
        Self {
            slots: vec![None; QUEUE_SIZE].into_boxed_slice(),
            head: None,
            tail: 0,
        }
    }

    fn next_index(i: usize) -> usize {
        (i + 1) % QUEUE_SIZE
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn is_full(&self) -> bool {
        self.head == Some(Self::next_index(self.tail))
    }

    fn len(&self) -> usize {
        match self.head {
            None => 0,
            Some(head) => (self.tail + QUEUE_SIZE - head) % QUEUE_SIZE + 1,
        }
    }

    fn push(&mut self, event: Event) {
        assert!(!self.is_full(), "event queue overflow ({QUEUE_SIZE} pending events)");

        let slot = match self.head {
            None => {
                self.head = Some(0);
                0
            }
            Some(_) => Self::next_index(self.tail),
        };
        self.slots[slot] = Some(event);
        self.tail = slot;
    }

    fn shift(&mut self) -> Option<Event> {
        let head = self.head?;
        let event = self.slots[head].take();

        self.head = if head == self.tail {
            None
        } else {
            Some(Self::next_index(head))
        };

        event
    }
}

/// Scheduler emitting QUIT, KEY, TIMER and WINCH events.
///
/// Each poll iteration produces at most one event per source, which keeps the
/// fixed capacity out of reach as long as events are consumed.
pub struct EventQueue<I> {
    ring: Ring,
    tick: Duration,
    delay: Duration,
    accumulator: Duration,
    paused: bool,
    signals: Arc<SignalFlags>,
    input: I,
}

impl<I: InputSource> EventQueue<I> {
    /// Polls `fps` times per second and emits a TIMER every `delay`.
    pub fn new(fps: u32, delay: Duration, signals: Arc<SignalFlags>, input: I) -> Self {
        assert!(fps > 0, "polling rate must be positive");
        let tick = Duration::from_micros(SECOND.as_micros() as u64 / fps as u64);
        Self::with_tick(tick, delay, signals, input)
    }

    pub fn with_tick(tick: Duration, delay: Duration, signals: Arc<SignalFlags>, input: I) -> Self {
        assert!(
            delay > tick,
            "delay {delay:?} must be longer than the polling tick {tick:?}"
        );

        log::debug!("event queue: tick {tick:?}, delay {delay:?}");

        Self {
            ring: Ring::new(),
            tick,
            delay,
            accumulator: Duration::ZERO,
            paused: false,
            signals,
            input,
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pending(&self) -> usize {
        self.ring.len()
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Stops or resumes TIMER events. Polling, QUIT and WINCH carry on.
    pub fn pause(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn delay_floor(&self) -> Duration {
        DELAY_MIN.max(self.tick + Duration::from_micros(1))
    }

    /// Sets the simulation period, clamped so it stays above the tick and
    /// within `[DELAY_MIN, DELAY_MAX]`. Returns the period in effect.
    pub fn set_delay(&mut self, delay: Duration) -> Duration {
        self.delay = delay.clamp(self.delay_floor(), DELAY_MAX.max(self.delay_floor()));
        log::debug!("simulation delay set to {:?}", self.delay);
        self.delay
    }

    /// Shifts the period by `micros` (negative is faster).
    pub fn add_delay(&mut self, micros: i64) -> Duration {
        let current = self.delay.as_micros() as i64;
        let target = current.saturating_add(micros).max(0) as u64;
        self.set_delay(Duration::from_micros(target))
    }

    fn push(&mut self, event: Event) {
        self.ring.push(event);
    }

    /// One poll iteration without sleeping.
    pub fn poll(&mut self) {
        if self.signals.quit_requested() {
            self.push(Event::Quit);
        }

        if self.signals.take_resize() {
            self.push(Event::Winch);
        }

        if let Some(key) = self.input.poll_key() {
            self.push(Event::Key(key));
        }

        if !self.paused {
            self.accumulator += self.tick;

            if self.accumulator >= self.delay {
                let rest = self.accumulator.as_nanos() % self.delay.as_nanos();
                self.accumulator = Duration::from_nanos(rest as u64);
                self.push(Event::Timer);
            }
        }
    }

    pub fn try_next_event(&mut self) -> Option<Event> {
        self.ring.shift()
    }

    /// Sleeps a tick at a time, polling after each one, until an event is
    /// queued; then returns the oldest event.
    pub async fn wait_for_event(&mut self) -> Event {
        loop {
            if let Some(event) = self.ring.shift() {
                return event;
            }

            tokio::time::sleep(self.tick).await;
            self.poll();
        }
    }
}
