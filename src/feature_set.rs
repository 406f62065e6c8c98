//! Feature set version types

/// Product type reported by the SGP30.
pub const PRODUCT_TYPE_SGP30: u8 = 0;

/// Product type reported by the SGPC3.
pub const PRODUCT_TYPE_SGPC3: u8 = 1;

/// Feature set version as described in the datasheet (Get Feature Set Version).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeatureSet {
    /// The sensor family (bits 12 to 15)
    pub product_type: u8,
    /// The firmware feature level (bits 0 to 7)
    pub product_version: u8,
}

impl From<u16> for FeatureSet {
    fn from(word: u16) -> Self {
        let [hi, lo] = word.to_be_bytes();
        Self {
            product_type: hi >> 4,
            product_version: lo,
        }
    }
}

impl From<FeatureSet> for u16 {
    fn from(val: FeatureSet) -> Self {
        (u16::from(val.product_type & 0x0F) << 12) | u16::from(val.product_version)
    }
}
