//! Synchronous command transactions.
//!
//! One transaction is: wait until the sensor is free, write the opcode and
//! optional parameter group, wait for the command's processing time, read
//! the response groups and check every checksum. Nothing is retried.

use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::command::{Descriptor, GROUP_LEN, MAX_RESPONSE_WORDS};
use crate::crc;
use crate::timing::{self, Clock};
use crate::SgpError;

/// The fixed I2C address of the SGP sensors.
pub const I2C_ADDRESS: u8 = 0x58;

/// Owns the bus collaborators and the time the sensor becomes free again.
#[derive(Debug)]
pub struct Transport<I2C, D, C> {
    /// The concrete I2C device implementation.
    i2c: I2C,
    /// The concrete Delay implementation.
    delay: D,
    /// Millisecond time source.
    clock: C,
    /// Earliest time the next command may be written.
    next_available: u32,
}

impl<I, D, C> Transport<I, D, C>
where
    I: I2c,
    D: DelayNs,
    C: Clock,
{
    /// Wrap the collaborators. The bus is considered free immediately.
    pub fn new(i2c: I, delay: D, clock: C) -> Self {
        Self {
            i2c,
            delay,
            clock,
            next_available: 0,
        }
    }

    /// Destroy the transport, return I2C bus instance.
    pub fn destroy(self) -> I {
        self.i2c
    }

    /// Current time of the clock.
    pub fn now(&mut self) -> u32 {
        self.clock.now_ms()
    }

    /// Earliest time the next command may be written.
    pub fn next_available(&self) -> u32 {
        self.next_available
    }

    /// Keep the bus reserved until `at`, e.g. after a sensor reset.
    pub fn reserve_until(&mut self, at: u32) {
        self.next_available = at;
    }

    /// Block until the sensor is free. Returns the time at which it was.
    pub fn wait_until_available(&mut self) -> u32 {
        loop {
            let now = self.clock.now_ms();
            let remaining = timing::remaining_ms(now, self.next_available);
            if remaining <= 0 {
                return now;
            }
            trace!("sensor busy for {} ms", remaining);
            self.delay.delay_ms(remaining as u32);
        }
    }

    /// Run one command.
    ///
    /// `param` must hold exactly `descriptor.param_len()` bytes (or be `None`
    /// for commands without a parameter) and `response` exactly
    /// `descriptor.response_len()` bytes. On success `response` holds the
    /// validated groups; on any error it is left untouched.
    pub fn execute(
        &mut self,
        descriptor: Descriptor,
        param: Option<&[u8]>,
        response: &mut [u8],
    ) -> Result<(), SgpError<I::Error>> {
        let param = param.unwrap_or(&[]);
        if param.len() != descriptor.param_len()
            || response.len() != descriptor.response_len()
            || usize::from(descriptor.response_words()) > MAX_RESPONSE_WORDS
        {
            return Err(SgpError::InvalidCommandShape);
        }

        let now = self.wait_until_available();

        let mut frame = [0u8; 2 + GROUP_LEN];
        frame[..2].copy_from_slice(&descriptor.opcode_bytes());
        frame[2..2 + param.len()].copy_from_slice(param);

        debug!(
            "command {:#x}, delay {} ms",
            descriptor.opcode(),
            descriptor.delay_ms()
        );
        let written = self.i2c.write(I2C_ADDRESS, &frame[..2 + param.len()]);

        // the sensor may have reacted to a partial write, so reserve the bus either way
        self.next_available = timing::deadline(now, u32::from(descriptor.delay_ms()));

        if let Err(e) = written {
            warn!("error writing command {:#x}", descriptor.opcode());
            return Err(SgpError::Write(e));
        }

        self.delay.delay_ms(u32::from(descriptor.delay_ms()));

        if response.is_empty() {
            return Ok(());
        }

        let mut buffer = [0u8; MAX_RESPONSE_WORDS * GROUP_LEN];
        let buffer = &mut buffer[..response.len()];
        if let Err(e) = self.i2c.read(I2C_ADDRESS, buffer) {
            warn!(
                "short read of {} bytes for command {:#x}",
                buffer.len(),
                descriptor.opcode()
            );
            return Err(SgpError::Read(e));
        }

        for group in buffer.chunks_exact(GROUP_LEN) {
            if crc::calculate(&group[..2]) != group[2] {
                warn!("checksum mismatch for command {:#x}", descriptor.opcode());
                return Err(SgpError::BadChecksum);
            }
        }

        response.copy_from_slice(buffer);
        Ok(())
    }

    /// Send a command that takes no parameter and returns nothing.
    pub fn send(&mut self, descriptor: Descriptor) -> Result<(), SgpError<I::Error>> {
        self.execute(descriptor, None, &mut [])
    }

    /// Send a command with one parameter word that returns nothing.
    pub fn send_with_param(
        &mut self,
        descriptor: Descriptor,
        param: u16,
    ) -> Result<(), SgpError<I::Error>> {
        let group = crc::encode_word(param);
        self.execute(descriptor, Some(&group[..]), &mut [])
    }

    /// Send a command without parameter that returns `N` words.
    pub fn read_words<const N: usize>(
        &mut self,
        descriptor: Descriptor,
    ) -> Result<[u16; N], SgpError<I::Error>> {
        let mut words = [0u16; N];
        self.read_words_into(descriptor, &mut words)?;
        Ok(words)
    }

    /// Like [`Transport::read_words`], with the count taken from `words.len()`.
    pub fn read_words_into(
        &mut self,
        descriptor: Descriptor,
        words: &mut [u16],
    ) -> Result<(), SgpError<I::Error>> {
        if words.len() > MAX_RESPONSE_WORDS {
            return Err(SgpError::InvalidCommandShape);
        }
        let mut buffer = [0u8; MAX_RESPONSE_WORDS * GROUP_LEN];
        let buffer = &mut buffer[..words.len() * GROUP_LEN];
        self.execute(descriptor, None, buffer)?;
        for (word, group) in words.iter_mut().zip(buffer.chunks_exact(GROUP_LEN)) {
            *word = u16::from_be_bytes([group[0], group[1]]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::SimClock;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use embedded_hal::i2c::ErrorKind;

    const MEASURE: Descriptor = Descriptor::new(0x2008, 0, 1, 50, 0);
    const SET: Descriptor = Descriptor::new(0x209f, 1, 0, 10, 6);
    const SERIAL: Descriptor = Descriptor::new(0x3682, 0, 3, 1, 0);

    fn transport(
        expectations: &[Transaction],
        clock: &SimClock,
    ) -> Transport<I2cMock, SimClock, SimClock> {
        Transport::new(I2cMock::new(expectations), clock.clone(), clock.clone())
    }

    #[test]
    fn write_then_read() {
        let clock = SimClock::at(1000);
        let expectations = [
            Transaction::write(I2C_ADDRESS, vec![0x20, 0x08]),
            Transaction::read(I2C_ADDRESS, vec![0x00, 0x2a, 0xdc]),
        ];
        let mut transport = transport(&expectations, &clock);
        let mut response = [0u8; 3];
        transport.execute(MEASURE, None, &mut response).unwrap();
        assert_eq!(response, [0x00, 0x2a, 0xdc]);
        assert_eq!(transport.next_available(), 1051);
        assert_eq!(clock.sleeps(), vec![50]);
        transport.destroy().done();
    }

    #[test]
    fn parameter_group_follows_opcode() {
        let clock = SimClock::default();
        let expectations = [Transaction::write(
            I2C_ADDRESS,
            vec![0x20, 0x9f, 0x00, 0x01, 0xb0],
        )];
        let mut transport = transport(&expectations, &clock);
        transport.send_with_param(SET, 1).unwrap();
        transport.destroy().done();
    }

    #[test]
    fn three_words() {
        let clock = SimClock::default();
        let expectations = [
            Transaction::write(I2C_ADDRESS, vec![0x36, 0x82]),
            Transaction::read(
                I2C_ADDRESS,
                vec![0x00, 0x01, 0xb0, 0x03, 0x04, 0x68, 0x06, 0x07, 0x4c],
            ),
        ];
        let mut transport = transport(&expectations, &clock);
        let words = transport.read_words::<3>(SERIAL).unwrap();
        assert_eq!(words, [0x0001, 0x0304, 0x0607]);
        transport.destroy().done();
    }

    #[test]
    fn bad_checksum_in_last_group_rejects_everything() {
        let clock = SimClock::default();
        let expectations = [
            Transaction::write(I2C_ADDRESS, vec![0x36, 0x82]),
            Transaction::read(
                I2C_ADDRESS,
                vec![0x00, 0x01, 0xb0, 0x03, 0x04, 0x68, 0x06, 0x07, 0x4d],
            ),
        ];
        let mut transport = transport(&expectations, &clock);
        let mut response = [0xAAu8; 9];
        let result = transport.execute(SERIAL, None, &mut response);
        assert_eq!(result, Err(SgpError::BadChecksum));
        assert_eq!(response, [0xAA; 9]);
        transport.destroy().done();
    }

    #[test]
    fn failed_read() {
        let clock = SimClock::default();
        let expectations = [
            Transaction::write(I2C_ADDRESS, vec![0x20, 0x08]),
            Transaction::read(I2C_ADDRESS, vec![0, 0, 0]).with_error(ErrorKind::Other),
        ];
        let mut transport = transport(&expectations, &clock);
        let result = transport.read_words::<1>(MEASURE);
        assert!(matches!(result, Err(SgpError::Read(_))));
        transport.destroy().done();
    }

    #[test]
    fn failed_write_still_reserves_bus() {
        let clock = SimClock::at(500);
        let expectations = [Transaction::write(I2C_ADDRESS, vec![0x20, 0x08])
            .with_error(ErrorKind::Other)];
        let mut transport = transport(&expectations, &clock);
        let result = transport.read_words::<1>(MEASURE);
        assert!(matches!(result, Err(SgpError::Write(_))));
        assert_eq!(transport.next_available(), 551);
        // no processing delay after a failed write
        assert!(clock.sleeps().is_empty());
        transport.destroy().done();
    }

    #[test]
    fn mismatched_shapes_never_touch_the_bus() {
        let clock = SimClock::default();
        let mut transport = transport(&[], &clock);
        assert_eq!(transport.send(MEASURE), Err(SgpError::InvalidCommandShape));
        assert_eq!(
            transport.send_with_param(MEASURE, 1),
            Err(SgpError::InvalidCommandShape)
        );
        assert_eq!(
            transport.read_words::<2>(MEASURE),
            Err(SgpError::InvalidCommandShape)
        );
        assert_eq!(
            transport.read_words::<4>(MEASURE),
            Err(SgpError::InvalidCommandShape)
        );
        assert_eq!(transport.read_words::<1>(SET), Err(SgpError::InvalidCommandShape));
        assert_eq!(transport.next_available(), 0);
        transport.destroy().done();
    }

    #[test]
    fn oversized_response_is_refused_before_writing() {
        let clock = SimClock::default();
        let mut transport = transport(&[], &clock);
        let four_words = Descriptor::new(0x2000, 0, 4, 0, 0);
        let mut response = [0u8; 12];
        assert_eq!(
            transport.execute(four_words, None, &mut response),
            Err(SgpError::InvalidCommandShape)
        );
        let seven_words = Descriptor::from_bits(0x000E_2000);
        let mut response = [0u8; 21];
        assert_eq!(
            transport.execute(seven_words, None, &mut response),
            Err(SgpError::InvalidCommandShape)
        );
        assert_eq!(transport.next_available(), 0);
        transport.destroy().done();
    }

    #[test]
    fn second_command_waits_for_the_first() {
        let clock = SimClock::at(0);
        let init = Descriptor::new(0x20ae, 0, 0, 10, 0);
        let expectations = [
            Transaction::write(I2C_ADDRESS, vec![0x20, 0xae]),
            Transaction::write(I2C_ADDRESS, vec![0x20, 0xae]),
        ];
        let mut transport = transport(&expectations, &clock);
        transport.send(init).unwrap();
        let first = transport.next_available();
        assert_eq!(first, 11);
        transport.send(init).unwrap();
        // 10 ms processing, 1 ms spacing, 10 ms processing
        assert_eq!(clock.sleeps(), vec![10, 1, 10]);
        assert!(transport.next_available() >= first + u32::from(init.delay_ms()));
        transport.destroy().done();
    }

    #[test]
    fn wait_across_clock_wrap() {
        let clock = SimClock::at(0xFFFF_FFF0);
        let expectations = [Transaction::write(I2C_ADDRESS, vec![0x20, 0xae])];
        let mut transport = transport(&expectations, &clock);
        transport.reserve_until(0x0000_0010);
        transport.send(Descriptor::new(0x20ae, 0, 0, 10, 0)).unwrap();
        assert_eq!(clock.sleeps(), vec![0x20, 10]);
        assert_eq!(transport.next_available(), 0x0000_001B);
        transport.destroy().done();
    }

    #[test]
    fn expired_reservation_before_wrap_does_not_block() {
        let clock = SimClock::at(0x0000_0010);
        let expectations = [Transaction::write(I2C_ADDRESS, vec![0x20, 0xae])];
        let mut transport = transport(&expectations, &clock);
        transport.reserve_until(0xFFFF_FFF0);
        transport.send(Descriptor::new(0x20ae, 0, 0, 10, 0)).unwrap();
        assert_eq!(clock.sleeps(), vec![10]);
        transport.destroy().done();
    }
}
