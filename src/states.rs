//! State types for the SGP sensors

use crate::timing::{LOW_POWER_INTERVAL_MS, ULTRA_LOW_POWER_INTERVAL_MS};

/// Lifecycle of a sensor session.
///
/// ```text
/// Uninitialized --initialize--> Discovering --ok--> Ready
///                                    |
///                                    +--wrong device--> Faulted
/// ```
///
/// A reset notification moves any state back to `Uninitialized`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Nothing is known about the sensor
    #[default]
    Uninitialized,
    /// Identification or start-up is in progress or has failed on the bus
    Discovering,
    /// The sensor is identified and measuring continuously
    Ready,
    /// The device on the bus is not a supported sensor
    Faulted,
}

/// Power modes of the SGPC3.
///
/// The sensor updates its measurement every two seconds in low power mode and
/// every thirty seconds in ultra-low power mode.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Ultra-low power mode
    UltraLow = 0,
    /// Low power mode, the default after reset
    #[default]
    Low = 1,
}

impl PowerMode {
    /// Interval between two measurements in this mode.
    #[must_use]
    pub const fn sampling_interval_ms(self) -> u32 {
        match self {
            PowerMode::UltraLow => ULTRA_LOW_POWER_INTERVAL_MS,
            PowerMode::Low => LOW_POWER_INTERVAL_MS,
        }
    }
}

impl From<PowerMode> for u16 {
    fn from(val: PowerMode) -> Self {
        val as u16
    }
}
