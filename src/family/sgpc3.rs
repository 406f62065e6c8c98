//! I2C commands for the SGPC3 TVOC sensor

use super::Family;
use crate::command::Descriptor;
use crate::feature_set::PRODUCT_TYPE_SGPC3;

/// I2C commands sent to the sensor, in numerical order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Measure TVOC
    MeasureTvoc,
    /// Get the TVOC baseline
    GetTvocBaseline,
    /// Set the TVOC baseline
    SetTvocBaseline,
    /// Get the feature set version
    GetFeatureSetVersion,
    /// On-chip self test
    MeasureTest,
    /// Measure TVOC and the raw signal
    MeasureTvocAndRaw,
    /// Measure the raw signal
    MeasureRaw,
    /// Set absolute humidity for compensation
    SetAbsoluteHumidity,
    /// Select low or ultra-low power mode
    SetPowerMode,
    /// Start continuous operation
    TvocInitContinuous,
    /// Get the inceptive baseline.
    /// The datasheet lists a parameter for this command; the vendor sample code
    /// sends none. This follows the sample code.
    GetTvocInceptiveBaseline,
    /// Get the serial id
    GetSerialId,
}

impl Command {
    /// Every command, in numerical order.
    pub const ALL: [Command; 12] = [
        Command::MeasureTvoc,
        Command::GetTvocBaseline,
        Command::SetTvocBaseline,
        Command::GetFeatureSetVersion,
        Command::MeasureTest,
        Command::MeasureTvocAndRaw,
        Command::MeasureRaw,
        Command::SetAbsoluteHumidity,
        Command::SetPowerMode,
        Command::TvocInitContinuous,
        Command::GetTvocInceptiveBaseline,
        Command::GetSerialId,
    ];

    /// Wire shape and timing of the command.
    #[must_use]
    pub const fn descriptor(self) -> Descriptor {
        match self {
            Command::MeasureTvoc => Descriptor::new(0x2008, 0, 1, 50, 0),
            Command::GetTvocBaseline => Descriptor::new(0x2015, 0, 1, 10, 0),
            Command::SetTvocBaseline => Descriptor::new(0x201e, 1, 0, 10, 0),
            Command::GetFeatureSetVersion => Descriptor::new(0x202f, 0, 1, 10, 0),
            Command::MeasureTest => Descriptor::new(0x2032, 0, 1, 220, 0),
            Command::MeasureTvocAndRaw => Descriptor::new(0x2046, 0, 2, 50, 0),
            Command::MeasureRaw => Descriptor::new(0x204d, 0, 1, 50, 0),
            Command::SetAbsoluteHumidity => Descriptor::new(0x2061, 1, 0, 10, 6),
            Command::SetPowerMode => Descriptor::new(0x209f, 1, 0, 10, 6),
            Command::TvocInitContinuous => Descriptor::new(0x20ae, 0, 0, 10, 0),
            Command::GetTvocInceptiveBaseline => Descriptor::new(0x20b3, 0, 1, 10, 5),
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

/// Marker type for the SGPC3 family.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sgpc3;

impl Family for Sgpc3 {
    const NAME: &'static str = "SGPC3";
    const PRODUCT_TYPE: u8 = PRODUCT_TYPE_SGPC3;
    // The vendor sample code accepts 4, but only 6 has been tested.
    const MIN_PRODUCT_VERSION: u8 = 6;

    const GET_FEATURE_SET: Descriptor = Command::GetFeatureSetVersion.descriptor();
    const INIT_CONTINUOUS: Descriptor = Command::TvocInitContinuous.descriptor();
    const MEASURE: Descriptor = Command::MeasureTvoc.descriptor();
    const MEASURE_TEST: Descriptor = Command::MeasureTest.descriptor();
    const GET_SERIAL_ID: Descriptor = Command::GetSerialId.descriptor();
    const SET_ABSOLUTE_HUMIDITY: Descriptor = Command::SetAbsoluteHumidity.descriptor();
    const SET_POWER_MODE: Option<Descriptor> = Some(Command::SetPowerMode.descriptor());

    /// TVOC concentration in ppb (0 to 60000)
    type Measurement = u16;

    fn decode_measurement(words: [u16; 3]) -> Self::Measurement {
        words[0]
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
    fn shapes() {
        for command in Command::ALL {
            let d = command.descriptor();
            assert!(d.param_words() <= 1, "{command:?}");
            assert!(d.response_words() <= 3, "{command:?}");
            // no command both takes and returns data
            assert!(d.param_words() == 0 || d.response_words() == 0, "{command:?}");
        }
        assert_eq!(Command::MeasureTest.descriptor().delay_ms(), 220);
        assert_eq!(Command::GetSerialId.descriptor().response_len(), 9);
        assert_eq!(Command::GetTvocInceptiveBaseline.descriptor().feature_level(), 5);
    }

    #[test]
    fn wire_bytes() {
        let bytes: [u8; 2] = Command::SetPowerMode.into();
        assert_eq!(bytes, [0x20, 0x9f]);
    }
}
