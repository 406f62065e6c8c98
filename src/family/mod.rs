//! Sensor families sharing the Sensirion SGP command protocol.
//!
//! The families differ only in their command tables and in how a measurement
//! is decoded; the transaction layer and the checksum are shared.

use crate::command::Descriptor;

pub mod sgp30;
pub mod sgpc3;

/// A sensor family: its identity, its well-known commands and its measurement.
pub trait Family {
    /// Human readable name of the family
    const NAME: &'static str;
    /// Product type reported in the feature set word
    const PRODUCT_TYPE: u8;
    /// Lowest product version this driver supports by default
    const MIN_PRODUCT_VERSION: u8;

    /// Get Feature Set Version
    const GET_FEATURE_SET: Descriptor;
    /// Start continuous operation after identification
    const INIT_CONTINUOUS: Descriptor;
    /// The regular measurement
    const MEASURE: Descriptor;
    /// On-chip self test
    const MEASURE_TEST: Descriptor;
    /// Read the 48-bit serial id
    const GET_SERIAL_ID: Descriptor;
    /// Set absolute humidity for compensation
    const SET_ABSOLUTE_HUMIDITY: Descriptor;
    /// Select the power mode, if the family has power modes
    const SET_POWER_MODE: Option<Descriptor>;

    /// Result of [`Family::MEASURE`]
    type Measurement;

    /// Decode the words returned by [`Family::MEASURE`].
    ///
    /// `words` holds the validated response; entries past
    /// `MEASURE.response_words()` are zero.
    fn decode_measurement(words: [u16; 3]) -> Self::Measurement;
}

pub use sgp30::Sgp30;
pub use sgpc3::Sgpc3;
