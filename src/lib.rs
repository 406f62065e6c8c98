//! A platform agnostic Rust driver for the Sensirion `SGPC3` and `SGP30` gas sensors, based
//! on the [`embedded-hal`](https://github.com/rust-embedded/embedded-hal) traits.
//! Heavily inspired by the [`sgp30 driver by Danilo Bergen`](https://github.com/dbrgn/sgp30-rs)
//!
//! ## The Device
//!
//! The Sensirion `SGPC3` is a low power TVOC sensor, the `SGP30` its multi-pixel
//! sibling reporting CO2 equivalent and TVOC. Both sit at the fixed I2C address `0x58`
//! and speak the same protocol: a 16-bit command, optionally followed by one
//! parameter word, answered by up to three words. Every word is protected by a CRC-8.
//!
//! - [SGPC3 Datasheet](https://sensirion.com/media/documents/2F75BA98/616544D4/Sensirion_Gas_Sensors_Datasheet_SGPC3.pdf)
//! - [SGP30 Datasheet](https://sensirion.com/media/documents/984E0DD5/61644B8B/Sensirion_Gas_Sensors_Datasheet_SGP30.pdf)
//!
//! ## Usage
//!
//! ### Instantiating
//!
//! Import this crate and an `embedded_hal` implementation, provide a millisecond
//! clock, then instantiate the device:
//!
//! ```no_run
//! use linux_embedded_hal as hal;
//!
//! use hal::{Delay, I2cdev};
//! use sgpc3::Sgpc3;
//!
//! # fn main() {
//! let dev = I2cdev::new("/dev/i2c-1").unwrap();
//! let start = std::time::Instant::now();
//! let clock = move || start.elapsed().as_millis() as u32;
//! let mut sgp = Sgpc3::new(dev, Delay, clock);
//! # }
//! ```
//!
//! ### Initializing
//!
//! The sensor has to be identified and started before it measures:
//!
//! ```no_run
//! use linux_embedded_hal as hal;
//! use hal::{Delay, I2cdev};
//! use sgpc3::{PowerMode, Sgpc3};
//!
//! let dev = I2cdev::new("/dev/i2c-1").unwrap();
//! let start = std::time::Instant::now();
//! let mut sgp = Sgpc3::new(dev, Delay, move || start.elapsed().as_millis() as u32);
//! match sgp.initialize(PowerMode::Low) {
//!     Ok(()) => println!("feature set {}", sgp.feature_level()),
//!     Err(e) => eprintln!("Error during initialization: {e}"),
//! }
//! ```
//!
//! ### Fetching Some Data
//!
//! ```no_run
//! use linux_embedded_hal as hal;
//! use hal::{Delay, I2cdev};
//! use sgpc3::{PowerMode, Sgpc3};
//!
//! let dev = I2cdev::new("/dev/i2c-1").unwrap();
//! let start = std::time::Instant::now();
//! let mut sgp = Sgpc3::new(dev, Delay, move || start.elapsed().as_millis() as u32);
//! sgp.initialize(PowerMode::Low).unwrap();
//!
//! let tvoc = match sgp.measure() {
//!     Ok(t) => dbg!(t),
//!     Err(_) => panic!(),
//! };
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;


use core::marker::PhantomData;
use embedded_hal::{delay::DelayNs, i2c::I2c};

pub mod capability;
pub mod command;
pub mod config;
pub mod crc;
pub mod family;
pub mod feature_set;
pub mod sample;
pub mod states;
pub mod timing;
pub mod transaction;

pub use crate::capability::NotSupported;
pub use crate::command::Descriptor;
pub use crate::config::Config;
pub use crate::family::Family;
pub use crate::feature_set::FeatureSet;
pub use crate::sample::*;
pub use crate::states::{PowerMode, SessionState};
pub use crate::timing::Clock;
pub use crate::transaction::{Transport, I2C_ADDRESS};

use crate::command::MAX_RESPONSE_WORDS;

/// All possible errors in this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SgpError<E> {
    /// I2C write failed; the command may or may not have reached the sensor
    #[error("I2C write failed")]
    Write(E),
    /// I2C read failed or returned fewer bytes than the command answers with
    #[error("I2C read failed")]
    Read(E),
    /// A response word did not match its CRC; the whole response is dropped
    #[error("CRC mismatch in response")]
    BadChecksum,
    /// The sensor's feature set does not support the command, or the sensor is not ready
    #[error("command not supported in the current sensor state")]
    NotSupported,
    /// The device did not identify as a supported sensor of this family
    #[error("wrong device type or version")]
    WrongDeviceType,
    /// The buffers handed in do not match the command's parameter or response length
    #[error("buffers do not match the command shape")]
    InvalidCommandShape,
}

impl<E> From<NotSupported> for SgpError<E> {
    fn from(_: NotSupported) -> Self {
        SgpError::NotSupported
    }
}

/// A session with one SGP sensor of family `F`.
#[derive(Debug)]
pub struct Sgp<I2C, D, C, F> {
    /// Bus, delay, clock and command spacing.
    transport: Transport<I2C, D, C>,
    /// Session tunables.
    config: Config,
    /// Feature set version; 0 while the sensor is not identified.
    feature_level: u8,
    /// The power mode last confirmed by the sensor.
    power_mode: PowerMode,
    /// Where the session is in its lifecycle.
    state: SessionState,
    /// The sensor family
    family: PhantomData<F>,
}

/// Driver for the `SGPC3`.
pub type Sgpc3<I2C, D, C> = Sgp<I2C, D, C, family::Sgpc3>;

/// Driver for the `SGP30`.
pub type Sgp30<I2C, D, C> = Sgp<I2C, D, C, family::Sgp30>;

impl<I, D, C, F> Sgp<I, D, C, F>
where
    I: I2c,
    D: DelayNs,
    C: Clock,
    F: Family,
{
    /// Create a new instance of the driver with the family's default configuration.
    pub fn new(i2c: I, delay: D, clock: C) -> Self {
        Self::with_config(i2c, delay, clock, Config::for_family::<F>())
    }

    /// Create a new instance of the driver.
    pub fn with_config(i2c: I, delay: D, clock: C, config: Config) -> Self {
        Self {
            transport: Transport::new(i2c, delay, clock),
            config,
            feature_level: 0,
            power_mode: PowerMode::default(),
            state: SessionState::Uninitialized,
            family: PhantomData::<F>,
        }
    }

    /// Destroy driver instance, return I2C bus instance.
    pub fn destroy(self) -> I {
        self.transport.destroy()
    }

    /// Where the session is in its lifecycle.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Feature set version discovered during initialization, 0 if unknown.
    pub fn feature_level(&self) -> u8 {
        self.feature_level
    }

    /// The power mode last confirmed by the sensor.
    pub fn power_mode(&self) -> PowerMode {
        self.power_mode
    }

    /// Earliest time the next command may be written.
    pub fn next_available(&self) -> u32 {
        self.transport.next_available()
    }

    /// Session tunables.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check whether the identified sensor supports `descriptor`.
    pub fn check_supported(&self, descriptor: Descriptor) -> Result<(), NotSupported> {
        capability::check_supported(descriptor, self.feature_level)
    }

    /// Identify the sensor and start continuous operation in `mode`.
    ///
    /// This is treated as following a reset: the sensor is given its power-up
    /// time before the first command. If the device is not a supported member
    /// of the family the session ends up [`SessionState::Faulted`] and
    /// [`SgpError::WrongDeviceType`] is returned. Bus errors leave the session
    /// in [`SessionState::Discovering`]; calling this again retries.
    pub fn initialize(&mut self, mode: PowerMode) -> Result<(), SgpError<I::Error>> {
        let now = self.transport.now();
        self.handle_reset(now);
        self.feature_level = 0;
        self.state = SessionState::Discovering;

        let feature_set = self.get_feature_set()?;
        debug!(
            "feature set: product type {}, version {}",
            feature_set.product_type,
            feature_set.product_version
        );
        if feature_set.product_type != F::PRODUCT_TYPE
            || feature_set.product_version < self.config.min_product_version
        {
            warn!("device is not a supported {}", F::NAME);
            self.state = SessionState::Faulted;
            return Err(SgpError::WrongDeviceType);
        }
        self.feature_level = feature_set.product_version;

        // after a reset the sensor already runs in the default mode
        let power = match F::SET_POWER_MODE {
            Some(d) if mode == PowerMode::default() && self.check_supported(d).is_err() => {
                Ok(())
            }
            Some(_) => self.set_power_mode(mode),
            None if mode == PowerMode::default() => Ok(()),
            None => Err(SgpError::NotSupported),
        };
        let started = self.send(F::INIT_CONTINUOUS);

        started.and(power)?;
        self.state = SessionState::Ready;
        debug!("{} ready", F::NAME);
        Ok(())
    }

    /// Take the family's regular measurement.
    ///
    /// Only valid once [`Sgp::initialize`] has succeeded; otherwise
    /// [`SgpError::NotSupported`] is returned without touching the bus.
    /// Values are returned as the sensor reports them, without scaling.
    pub fn measure(&mut self) -> Result<F::Measurement, SgpError<I::Error>> {
        self.ensure_ready()?;
        self.check_supported(F::MEASURE)?;
        let mut words = [0u16; MAX_RESPONSE_WORDS];
        let count = usize::from(F::MEASURE.response_words());
        let response = words
            .get_mut(..count)
            .ok_or(SgpError::InvalidCommandShape)?;
        self.transport.read_words_into(F::MEASURE, response)?;
        Ok(F::decode_measurement(words))
    }

    /// Select the power mode.
    ///
    /// The recorded mode only changes when the sensor accepted the command.
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), SgpError<I::Error>> {
        let descriptor = F::SET_POWER_MODE.ok_or(SgpError::NotSupported)?;
        self.send_with_param(descriptor, mode.into())?;
        self.power_mode = mode;
        Ok(())
    }

    /// Inform the driver that the sensor finished a power-on or soft reset at `at`.
    ///
    /// The power mode falls back to its default and no command is written
    /// before the power-up time has passed. The feature level is kept until
    /// the next [`Sgp::initialize`].
    pub fn handle_reset(&mut self, at: u32) {
        debug!("sensor reset at {} ms", at);
        self.power_mode = PowerMode::default();
        self.transport
            .reserve_until(at.wrapping_add(self.config.power_up_delay_ms));
        self.state = SessionState::Uninitialized;
    }

    /// Like [`Sgp::handle_reset`], with the reset finishing now.
    pub fn handle_reset_now(&mut self) {
        let now = self.transport.now();
        self.handle_reset(now);
    }

    /// Return the feature set version of the sensor.
    pub fn get_feature_set(&mut self) -> Result<FeatureSet, SgpError<I::Error>> {
        let [word] = self.read_words::<1>(F::GET_FEATURE_SET)?;
        Ok(FeatureSet::from(word))
    }

    /// Return the 48-bit serial id of the sensor.
    pub fn get_serial_id(&mut self) -> Result<u64, SgpError<I::Error>> {
        let [a, b, c] = self.read_words::<3>(F::GET_SERIAL_ID)?;
        Ok(u64::from(a) << 32 | u64::from(b) << 16 | u64::from(c))
    }

    /// Run the on-chip self test. This function blocks for at least 220 milliseconds.
    ///
    /// Must not be called while a continuous measurement is running.
    pub fn self_test(&mut self) -> Result<bool, SgpError<I::Error>> {
        let [result] = self.read_words::<1>(F::MEASURE_TEST)?;
        Ok(result == SELF_TEST_PASSED)
    }

    /// Set the absolute humidity used for on-chip compensation.
    pub fn set_absolute_humidity(
        &mut self,
        humidity: AbsoluteHumidity,
    ) -> Result<(), SgpError<I::Error>> {
        self.send_with_param(F::SET_ABSOLUTE_HUMIDITY, humidity.into())
    }

    /// Run any command after checking it against the sensor's feature set.
    ///
    /// See [`Transport::execute`] for the buffer requirements.
    pub fn execute(
        &mut self,
        descriptor: Descriptor,
        param: Option<&[u8]>,
        response: &mut [u8],
    ) -> Result<(), SgpError<I::Error>> {
        self.check_supported(descriptor)?;
        self.transport.execute(descriptor, param, response)
    }

    /// Measurements and baselines are only meaningful once continuous operation runs.
    fn ensure_ready(&self) -> Result<(), SgpError<I::Error>> {
        if self.state != SessionState::Ready {
            warn!("sensor not ready, state {}", self.state);
            return Err(SgpError::NotSupported);
        }
        Ok(())
    }

    /// Gated command without parameter or response.
    fn send(&mut self, descriptor: Descriptor) -> Result<(), SgpError<I::Error>> {
        self.check_supported(descriptor)?;
        self.transport.send(descriptor)
    }

    /// Gated command with one parameter word.
    fn send_with_param(
        &mut self,
        descriptor: Descriptor,
        param: u16,
    ) -> Result<(), SgpError<I::Error>> {
        self.check_supported(descriptor)?;
        self.transport.send_with_param(descriptor, param)
    }

    /// Gated command returning `N` words.
    fn read_words<const N: usize>(
        &mut self,
        descriptor: Descriptor,
    ) -> Result<[u16; N], SgpError<I::Error>> {
        self.check_supported(descriptor)?;
        self.transport.read_words(descriptor)
    }
}

impl<I, D, C> Sgp<I, D, C, family::Sgpc3>
where
    I: I2c,
    D: DelayNs,
    C: Clock,
{
    /// Measure TVOC (ppb) and the raw signal in one go.
    pub fn measure_tvoc_and_raw(&mut self) -> Result<TvocAndRaw, SgpError<I::Error>> {
        self.ensure_ready()?;
        let [tvoc_ppb, raw] =
            self.read_words::<2>(family::sgpc3::Command::MeasureTvocAndRaw.into())?;
        Ok(TvocAndRaw { tvoc_ppb, raw })
    }

    /// Measure the raw signal.
    pub fn measure_raw(&mut self) -> Result<u16, SgpError<I::Error>> {
        self.ensure_ready()?;
        let [raw] = self.read_words::<1>(family::sgpc3::Command::MeasureRaw.into())?;
        Ok(raw)
    }

    /// Read the TVOC baseline. Storing it across resets is up to the caller.
    pub fn get_tvoc_baseline(&mut self) -> Result<u16, SgpError<I::Error>> {
        self.ensure_ready()?;
        let [baseline] = self.read_words::<1>(family::sgpc3::Command::GetTvocBaseline.into())?;
        Ok(baseline)
    }

    /// Restore a TVOC baseline read earlier.
    pub fn set_tvoc_baseline(&mut self, baseline: u16) -> Result<(), SgpError<I::Error>> {
        self.ensure_ready()?;
        self.send_with_param(family::sgpc3::Command::SetTvocBaseline.into(), baseline)
    }

    /// Read the inceptive baseline. Needs feature set 5.
    pub fn get_tvoc_inceptive_baseline(&mut self) -> Result<u16, SgpError<I::Error>> {
        self.ensure_ready()?;
        let [baseline] =
            self.read_words::<1>(family::sgpc3::Command::GetTvocInceptiveBaseline.into())?;
        Ok(baseline)
    }
}

impl<I, D, C> Sgp<I, D, C, family::Sgp30>
where
    I: I2c,
    D: DelayNs,
    C: Clock,
{
    /// Measure the raw H2 and ethanol signals.
    pub fn measure_raw(&mut self) -> Result<RawSignals, SgpError<I::Error>> {
        self.ensure_ready()?;
        let [h2, ethanol] = self.read_words::<2>(family::sgp30::Command::MeasureRaw.into())?;
        Ok(RawSignals { h2, ethanol })
    }

    /// Read the IAQ baseline. Storing it across resets is up to the caller.
    pub fn get_air_quality_baseline(&mut self) -> Result<AirQualityBaseline, SgpError<I::Error>> {
        self.ensure_ready()?;
        let [co2eq, tvoc] =
            self.read_words::<2>(family::sgp30::Command::GetAirQualityBaseline.into())?;
        Ok(AirQualityBaseline { co2eq, tvoc })
    }
}
