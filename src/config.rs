//! Session configuration

use crate::family::Family;
use crate::timing::POWER_UP_DELAY_MS;

/// Tunables of a sensor session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Lowest product version accepted during initialization.
    pub min_product_version: u8,
    /// Time the sensor needs after a reset before it accepts commands.
    pub power_up_delay_ms: u32,
}

impl Config {
    /// Defaults for the sensor family `F`.
    #[must_use]
    pub const fn for_family<F: Family>() -> Self {
        Self {
            min_product_version: F::MIN_PRODUCT_VERSION,
            power_up_delay_ms: POWER_UP_DELAY_MS,
        }
    }

    /// Accept sensors down to `version`.
    ///
    /// A sensor too old for the power mode command only starts in
    /// [`PowerMode::Low`](crate::states::PowerMode::Low).
    #[must_use]
    pub const fn with_min_product_version(mut self, version: u8) -> Self {
        self.min_product_version = version;
        self
    }

    /// Override the power-up delay.
    #[must_use]
    pub const fn with_power_up_delay_ms(mut self, delay_ms: u32) -> Self {
        self.power_up_delay_ms = delay_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::{Sgp30, Sgpc3};

    #[test]
    fn family_defaults() {
        assert_eq!(Config::for_family::<Sgpc3>().min_product_version, 6);
        assert_eq!(Config::for_family::<Sgp30>().min_product_version, 0x20);
        assert_eq!(Config::for_family::<Sgpc3>().power_up_delay_ms, 600);
    }

    #[test]
    fn builder() {
        let config = Config::for_family::<Sgpc3>()
            .with_min_product_version(4)
            .with_power_up_delay_ms(10);
        assert_eq!(config.min_product_version, 4);
        assert_eq!(config.power_up_delay_ms, 10);
    }
}
