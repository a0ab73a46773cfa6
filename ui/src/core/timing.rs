//! Monotonic timing and input debouncing.

use std::cell::Cell;
use std::rc::Rc;

use super::platform;

/// Milliseconds from an arbitrary fixed origin; only differences are meaningful.
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.performance())
            .map(|performance| performance.now())
            .unwrap_or(0.0)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use once_cell::sync::Lazy;
        use std::time::Instant;

        static ORIGIN: Lazy<Instant> = Lazy::new(Instant::now);
        ORIGIN.elapsed().as_secs_f64() * 1000.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started_ms: f64,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started_ms: now_ms(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        (now_ms() - self.started_ms).max(0.0)
    }
}

/// Trailing-edge debouncer: only the most recent ticket settles as current.
#[derive(Debug, Clone)]
pub struct Debouncer {
    generation: Rc<Cell<u64>>,
    delay_ms: u32,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            generation: Rc::new(Cell::new(0)),
            delay_ms,
        }
    }

    /// Issues a ticket and invalidates every earlier one.
    pub fn ticket(&self) -> DebounceTicket {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        DebounceTicket {
            generation,
            source: Rc::clone(&self.generation),
            delay_ms: self.delay_ms,
        }
    }
}

impl PartialEq for Debouncer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.generation, &other.generation) && self.delay_ms == other.delay_ms
    }
}

#[derive(Debug)]
pub struct DebounceTicket {
    generation: u64,
    source: Rc<Cell<u64>>,
    delay_ms: u32,
}

impl DebounceTicket {
    pub fn is_current(&self) -> bool {
        self.source.get() == self.generation
    }

    /// Waits out the delay, then reports whether no newer ticket was issued.
    pub async fn settle(self) -> bool {
        platform::sleep_ms(self.delay_ms).await;
        self.is_current()
    }
}
