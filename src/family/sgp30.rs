//! I2C commands for the SGP30 multi-pixel gas sensor
//!
//! Set IAQ Baseline takes two parameter words and cannot be described by a
//! [`Descriptor`]; it is not supported.

use super::Family;
use crate::command::Descriptor;
use crate::feature_set::PRODUCT_TYPE_SGP30;
use crate::sample::AirQuality;

/// I2C commands sent to the sensor, in numerical order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Start the IAQ algorithm
    InitAirQuality,
    /// Measure CO2 equivalent and TVOC
    MeasureAirQuality,
    /// Get the IAQ baseline
    GetAirQualityBaseline,
    /// Get the feature set version
    GetFeatureSetVersion,
    /// On-chip self test
    MeasureTest,
    /// Measure the raw H2 and ethanol signals
    MeasureRaw,
    /// Set absolute humidity for compensation
    SetAbsoluteHumidity,
    /// Get the serial id
    GetSerialId,
}

impl Command {
    /// Every command, in numerical order.
    pub const ALL: [Command; 8] = [
        Command::InitAirQuality,
        Command::MeasureAirQuality,
        Command::GetAirQualityBaseline,
        Command::GetFeatureSetVersion,
        Command::MeasureTest,
        Command::MeasureRaw,
        Command::SetAbsoluteHumidity,
        Command::GetSerialId,
    ];

    /// Wire shape and timing of the command.
    #[must_use]
    pub const fn descriptor(self) -> Descriptor {
        match self {
            Command::InitAirQuality => Descriptor::new(0x2003, 0, 0, 10, 0),
            Command::MeasureAirQuality => Descriptor::new(0x2008, 0, 2, 12, 0),
            Command::GetAirQualityBaseline => Descriptor::new(0x2015, 0, 2, 10, 0),
            Command::GetFeatureSetVersion => Descriptor::new(0x202f, 0, 1, 10, 0),
            Command::MeasureTest => Descriptor::new(0x2032, 0, 1, 220, 0),
            Command::MeasureRaw => Descriptor::new(0x2050, 0, 2, 25, 0),
            Command::SetAbsoluteHumidity => Descriptor::new(0x2061, 1, 0, 10, 0),
            Command::GetSerialId => Descriptor::new(0x3682, 0, 3, 1, 0),
        }
    }
}

impl From<Command> for Descriptor {
    fn from(val: Command) -> Self {
        val.descriptor()
    }
}

impl From<Command> for [u8; 2] {
    fn from(val: Command) -> Self {
        val.descriptor().opcode_bytes()
    }
}

/// Marker type for the SGP30 family.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sgp30;

impl Family for Sgp30 {
    const NAME: &'static str = "SGP30";
    const PRODUCT_TYPE: u8 = PRODUCT_TYPE_SGP30;
    const MIN_PRODUCT_VERSION: u8 = 0x20;

    const GET_FEATURE_SET: Descriptor = Command::GetFeatureSetVersion.descriptor();
    const INIT_CONTINUOUS: Descriptor = Command::InitAirQuality.descriptor();
    const MEASURE: Descriptor = Command::MeasureAirQuality.descriptor();
    const MEASURE_TEST: Descriptor = Command::MeasureTest.descriptor();
    const GET_SERIAL_ID: Descriptor = Command::GetSerialId.descriptor();
    const SET_ABSOLUTE_HUMIDITY: Descriptor = Command::SetAbsoluteHumidity.descriptor();
    const SET_POWER_MODE: Option<Descriptor> = None;

    type Measurement = AirQuality;

    fn decode_measurement(words: [u16; 3]) -> Self::Measurement {
        AirQuality {
            co2eq_ppm: words[0],
            tvoc_ppb: words[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcodes_are_sorted_and_unique() {
        for pair in Command::ALL.windows(2) {
            assert!(pair[0].descriptor().opcode() < pair[1].descriptor().opcode());
        }
    }

    #[test]
    fn measurement_decodes_both_words() {
        let aq = Sgp30::decode_measurement([400, 12, 0]);
        assert_eq!(aq.co2eq_ppm, 400);
        assert_eq!(aq.tvoc_ppb, 12);
    }
}
