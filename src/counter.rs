//! Count-up animation for progress labels.
//!
//! Purely cosmetic: the value at the last tick is always the target, so a
//! sink that animates ends on exactly what a sink that doesn't would show.

use std::time::Duration;

pub const ANIMATION_DURATION: Duration = Duration::from_millis(1000);
pub const TICK_INTERVAL: Duration = Duration::from_millis(20);

/// Number of ticks needed to cover `duration`, never less than one.
pub fn tick_count(duration: Duration, interval: Duration) -> u32 {
    if interval.is_zero() {
        return 1;
    }
    let ticks = duration.as_millis() / interval.as_millis().max(1);
    ticks.clamp(1, u32::MAX as u128) as u32
}

/// Intermediate value at `tick` of `ticks`, rising linearly from 0.
pub fn value_at(target: u64, tick: u32, ticks: u32) -> u64 {
    if ticks == 0 || tick >= ticks {
        return target;
    }
    (target as u128 * tick as u128 / ticks as u128) as u64
}

/// Yields the value for every tick from 1 through the last.
#[derive(Debug, Clone)]
pub struct Counter {
    target: u64,
    tick: u32,
    ticks: u32,
}

impl Counter {
    pub fn new(target: u64, ticks: u32) -> Self {
        Self {
            target,
            tick: 0,
            ticks: ticks.max(1),
        }
    }
}

impl Iterator for Counter {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.tick >= self.ticks {
            return None;
        }
        self.tick += 1;
        Some(value_at(self.target, self.tick, self.ticks))
    }
}
