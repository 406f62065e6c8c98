//! Feature set gating of commands.

use crate::command::Descriptor;

/// The sensor's feature set version is too old for the requested command.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("command {opcode:#06x} needs feature set {required}, sensor reports {reported}")]
pub struct NotSupported {
    /// Opcode of the rejected command
    pub opcode: u16,
    /// Feature set version the command needs
    pub required: u8,
    /// Feature set version known for the sensor
    pub reported: u8,
}

/// Check whether a sensor at `feature_level` may be sent `descriptor`.
///
/// A feature level of 0 means the sensor has not been identified yet; only
/// commands without a requirement pass then.
pub fn check_supported(descriptor: Descriptor, feature_level: u8) -> Result<(), NotSupported> {
    let required = descriptor.feature_level();
    if feature_level < required {
        Err(NotSupported {
            opcode: descriptor.opcode(),
            required,
            reported: feature_level,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_level_passes() {
        let d = Descriptor::new(0x209f, 1, 0, 10, 6);
        assert!(check_supported(d, 6).is_ok());
        assert!(check_supported(d, 7).is_ok());
        assert_eq!(
            check_supported(d, 5),
            Err(NotSupported {
                opcode: 0x209f,
                required: 6,
                reported: 5
            })
        );
    }

    #[test]
    fn unrestricted_command_passes_unidentified_sensor() {
        let d = Descriptor::new(0x202f, 0, 1, 10, 0);
        assert!(check_supported(d, 0).is_ok());
    }

    proptest! {
        #[test]
        fn fails_iff_level_below_requirement(required in 0..=15u8, level in any::<u8>()) {
            let d = Descriptor::new(0x2000, 0, 0, 0, required);
            prop_assert_eq!(check_supported(d, level).is_err(), level < required);
        }
    }
}
