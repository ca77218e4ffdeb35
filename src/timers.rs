//! RAII timer for measuring evaluation phases.

use std::time::{Duration, Instant};

/// Adds the time between construction and drop to a `Duration` slot.
///
/// The slot is updated on every exit path, including early returns.
///
/// ```rust,ignore
/// let mut lookup = Duration::ZERO;
/// {
///     let _timer = PhaseTimer::new(&mut lookup);
///     directory.find_by_identifier(id)?;
/// }
/// ```
pub struct PhaseTimer<'a> {
    start: Instant,
    slot: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(slot: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            slot,
        }
    }
}

impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        *self.slot += self.start.elapsed();
    }
}

/// Milliseconds as a float, the unit phase timings are reported in.
pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}
