//! Time keeping for command spacing.
//!
//! The millisecond counter wraps after `u32::MAX`; all comparisons go through
//! the signed difference of two timestamps so that a deadline just past the
//! wrap is not mistaken for one four billion milliseconds away.

/// Time after power-up or soft reset before the sensor accepts commands (tPU, tSR).
pub const POWER_UP_DELAY_MS: u32 = 600;

/// Measurement interval of the sensor in low power mode.
pub const LOW_POWER_INTERVAL_MS: u32 = 2_000;

/// Measurement interval of the sensor in ultra-low power mode.
pub const ULTRA_LOW_POWER_INTERVAL_MS: u32 = 30_000;

/// A free running millisecond counter.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch, wrapping at `u32::MAX`.
    fn now_ms(&mut self) -> u32;
}

impl<F> Clock for F
where
    F: FnMut() -> u32,
{
    fn now_ms(&mut self) -> u32 {
        self()
    }
}

/// Milliseconds left until `next`, or a value `<= 0` once `next` has been reached.
#[must_use]
pub const fn remaining_ms(now: u32, next: u32) -> i32 {
    next.wrapping_sub(now) as i32
}

/// Whether the bus may be used at `now` when it is reserved until `next`.
#[must_use]
pub const fn is_available(now: u32, next: u32) -> bool {
    remaining_ms(now, next) <= 0
}

/// The first instant after a command issued at `now` that took `delay_ms` to process.
#[must_use]
pub const fn deadline(now: u32, delay_ms: u32) -> u32 {
    now.wrapping_add(delay_ms).wrapping_add(1)
}
