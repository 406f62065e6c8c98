//! Packed command descriptors.
//!
//! Every command the sensor understands is described by a single `u32`:
//!
//! | bits    | field                                   |
//! |---------|-----------------------------------------|
//! | 0..=13  | opcode                                  |
//! | 16      | number of parameter words (0 or 1)      |
//! | 17..=19 | number of response words (0 to 3)       |
//! | 20..=23 | feature set version required            |
//! | 24..=31 | delay between command and response (ms) |
//!
//! Each word travels on the bus as a 3-byte group: two big-endian bytes and
//! their CRC.

const OPCODE_MASK: u32 = 0x3FFF;
const PARAM_SHIFT: u32 = 16;
const PARAM_MASK: u32 = 0x1 << PARAM_SHIFT;
const RESPONSE_SHIFT: u32 = 17;
const RESPONSE_MASK: u32 = 0x7 << RESPONSE_SHIFT;
const FEATURE_SHIFT: u32 = 20;
const FEATURE_MASK: u32 = 0xF << FEATURE_SHIFT;
const DELAY_SHIFT: u32 = 24;
const DELAY_MASK: u32 = 0xFF << DELAY_SHIFT;

/// Bytes in one word plus its checksum.
pub const GROUP_LEN: usize = 3;

/// Largest response any command produces, in words.
pub const MAX_RESPONSE_WORDS: usize = 3;

/// Wire shape and timing of one sensor command.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Descriptor(u32);

impl Descriptor {
    /// Pack a descriptor. Fields wider than their slot are truncated.
    #[must_use]
    pub const fn new(
        opcode: u16,
        param_words: u8,
        response_words: u8,
        delay_ms: u8,
        feature_level: u8,
    ) -> Self {
        Self(
            (opcode as u32 & OPCODE_MASK)
                | (((param_words as u32) << PARAM_SHIFT) & PARAM_MASK)
                | (((response_words as u32) << RESPONSE_SHIFT) & RESPONSE_MASK)
                | (((feature_level as u32) << FEATURE_SHIFT) & FEATURE_MASK)
                | (((delay_ms as u32) << DELAY_SHIFT) & DELAY_MASK),
        )
    }

    /// Reinterpret a raw packed value.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The packed value.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// The 14-bit command code sent to the sensor.
    #[must_use]
    pub const fn opcode(self) -> u16 {
        (self.0 & OPCODE_MASK) as u16
    }

    /// Number of parameter words following the opcode.
    #[must_use]
    pub const fn param_words(self) -> u8 {
        ((self.0 & PARAM_MASK) >> PARAM_SHIFT) as u8
    }

    /// Number of words the sensor answers with.
    #[must_use]
    pub const fn response_words(self) -> u8 {
        ((self.0 & RESPONSE_MASK) >> RESPONSE_SHIFT) as u8
    }

    /// Feature set version the sensor must report before this command may be issued.
    #[must_use]
    pub const fn feature_level(self) -> u8 {
        ((self.0 & FEATURE_MASK) >> FEATURE_SHIFT) as u8
    }

    /// Processing time of the command in milliseconds.
    #[must_use]
    pub const fn delay_ms(self) -> u8 {
        ((self.0 & DELAY_MASK) >> DELAY_SHIFT) as u8
    }

    /// Parameter length on the wire, checksums included.
    #[must_use]
    pub const fn param_len(self) -> usize {
        self.param_words() as usize * GROUP_LEN
    }

    /// Response length on the wire, checksums included.
    #[must_use]
    pub const fn response_len(self) -> usize {
        self.response_words() as usize * GROUP_LEN
    }

    /// The opcode as it goes on the wire.
    #[must_use]
    pub const fn opcode_bytes(self) -> [u8; 2] {
        self.opcode().to_be_bytes()
    }
}

impl From<Descriptor> for u32 {
    fn from(val: Descriptor) -> Self {
        val.bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn layout() {
        let d = Descriptor::new(0x209f, 1, 0, 10, 6);
        assert_eq!(d.bits(), 0x0A61_209F);
        assert_eq!(d.opcode_bytes(), [0x20, 0x9f]);
        assert_eq!(d.param_len(), 3);
        assert_eq!(d.response_len(), 0);
    }

    #[test]
    fn out_of_range_fields_do_not_leak() {
        let d = Descriptor::new(0xFFFF, 0xFF, 0xFF, 0, 0xFF);
        assert_eq!(d.opcode(), 0x3FFF);
        assert_eq!(d.param_words(), 1);
        assert_eq!(d.response_words(), 7);
        assert_eq!(d.feature_level(), 0xF);
        assert_eq!(d.delay_ms(), 0);
    }

    proptest! {
        #[test]
        fn fields_round_trip(
            opcode in 0..0x4000u16,
            param_words in 0..=1u8,
            response_words in 0..=3u8,
            delay_ms in any::<u8>(),
            feature_level in 0..=15u8,
        ) {
            let d = Descriptor::new(opcode, param_words, response_words, delay_ms, feature_level);
            prop_assert_eq!(d.opcode(), opcode);
            prop_assert_eq!(d.param_words(), param_words);
            prop_assert_eq!(d.response_words(), response_words);
            prop_assert_eq!(d.delay_ms(), delay_ms);
            prop_assert_eq!(d.feature_level(), feature_level);
            prop_assert_eq!(Descriptor::from_bits(d.bits()), d);
        }
    }
}
