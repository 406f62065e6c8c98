//! Measurement results

/// Pattern returned by the on-chip self test when it passes.
pub const SELF_TEST_PASSED: u16 = 0xD400;

/// TVOC concentration and raw signal, as returned by SGPC3 Measure TVOC and Raw.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TvocAndRaw {
    /// TVOC concentration in ppb
    pub tvoc_ppb: u16,
    /// Raw ethanol signal
    pub raw: u16,
}

/// Air quality as returned by SGP30 Measure IAQ.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AirQuality {
    /// CO2 equivalent in ppm
    pub co2eq_ppm: u16,
    /// TVOC concentration in ppb
    pub tvoc_ppb: u16,
}

/// Raw sensor signals of the SGP30.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSignals {
    /// Raw H2 signal
    pub h2: u16,
    /// Raw ethanol signal
    pub ethanol: u16,
}

/// Baseline of the SGP30 IAQ algorithm.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AirQualityBaseline {
    /// CO2 equivalent baseline
    pub co2eq: u16,
    /// TVOC baseline
    pub tvoc: u16,
}

/// Absolute humidity for on-chip humidity compensation, in g/m³ as 8.8 fixed point.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AbsoluteHumidity(u16);

impl AbsoluteHumidity {
    /// Writing this value switches humidity compensation off.
    pub const DISABLED: Self = Self(0);

    /// Use a raw 8.8 fixed point value.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Convert from g/m³. Values outside 0 to 255.996 are clamped.
    #[must_use]
    pub fn from_grams_per_cubic_meter(value: f32) -> Self {
        // float to int casts saturate
        Self((value * 256.0 + 0.5) as u16)
    }

    /// The raw 8.8 fixed point value sent to the sensor.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// The humidity in g/m³.
    #[must_use]
    pub fn grams_per_cubic_meter(self) -> f32 {
        f32::from(self.0) / 256.0
    }
}

impl From<AbsoluteHumidity> for u16 {
    fn from(val: AbsoluteHumidity) -> Self {
        val.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_humidity_fixed_point() {
        assert_eq!(AbsoluteHumidity::from_grams_per_cubic_meter(11.757).raw(), 0x0BC2);
        assert_eq!(AbsoluteHumidity::from_grams_per_cubic_meter(1.0).raw(), 0x0100);
        assert_eq!(AbsoluteHumidity::from_raw(0x0080).grams_per_cubic_meter(), 0.5);
    }

    #[test]
    fn absolute_humidity_clamps() {
        assert_eq!(AbsoluteHumidity::from_grams_per_cubic_meter(-3.0).raw(), 0);
        assert_eq!(AbsoluteHumidity::from_grams_per_cubic_meter(1000.0).raw(), u16::MAX);
        assert_eq!(AbsoluteHumidity::DISABLED.raw(), 0);
    }
}
