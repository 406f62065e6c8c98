//! CRC-8 checksum used on every word exchanged with the sensor.
//!
//! Polynomial `0x31` (x^8 + x^5 + x^4 + 1), initialization `0xFF`, no
//! reflection, no final XOR. The digest is computed four bits at a time from
//! a 16-entry table.

/// Initial value of the CRC accumulator.
pub const CRC8_INIT: u8 = 0xFF;

/// Partial remainders for every possible high nibble.
const CRC8_TABLE: [u8; 16] = [
    0x00, 0x31, 0x62, 0x53, 0xc4, 0xf5, 0xa6, 0x97, 0xb9, 0x88, 0xdb, 0xea, 0x7d, 0x4c, 0x1f, 0x2e,
];

/// Calculate the checksum of `data`, starting from [`CRC8_INIT`].
#[must_use]
pub fn calculate(data: &[u8]) -> u8 {
    calculate_with_seed(data, CRC8_INIT)
}

/// Calculate the checksum of `data`, starting from an arbitrary seed.
///
/// An empty slice yields the seed unchanged.
#[must_use]
pub fn calculate_with_seed(data: &[u8], seed: u8) -> u8 {
    data.iter().fold(seed, |crc, &byte| {
        let crc = (crc << 4) ^ CRC8_TABLE[usize::from((crc ^ byte) >> 4)];
        (crc << 4) ^ CRC8_TABLE[usize::from(((crc >> 4) ^ byte) & 0x0F)]
    })
}

/// Build a 3-byte group: the big-endian word followed by its checksum.
#[must_use]
pub fn encode_word(word: u16) -> [u8; 3] {
    let [hi, lo] = word.to_be_bytes();
    [hi, lo, calculate(&[hi, lo])]
}

/// Check a 3-byte group and return the word it carries.
///
/// Returns `None` when the checksum byte does not match.
#[must_use]
pub fn decode_word(group: &[u8; 3]) -> Option<u16> {
    if calculate(&group[..2]) == group[2] {
        Some(u16::from_be_bytes([group[0], group[1]]))
    } else {
        None
    }
}
