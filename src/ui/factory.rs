//! Factory test protocol.
//!
//! One request byte, one reply byte:
//! ```text
//! bit 7..5  command
//! bit 4..0  argument
//! ```

/// Factory test commands, in wire order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FactoryCommand {
    /// Reply: ADC reading of pot `argument`.
    ReadPot = 0,
    /// Reply: ADC reading of CV channel `argument`.
    ReadCv = 1,
    /// Reply: switch `argument` (0..=2) or gate `argument - 3`.
    ReadGate = 2,
    /// Bypass on for a non-zero argument.
    SetBypass = 3,
    /// 0: enter calibration, 1: first step, otherwise: second step.
    Calibrate = 4,
}

impl FactoryCommand {
    /// Split a request byte. Unknown commands are `None`.
    pub fn decode(request: u8) -> Option<(Self, u8)> {
        let argument = request & 0x1F;
        let command = match request >> 5 {
            0 => FactoryCommand::ReadPot,
            1 => FactoryCommand::ReadCv,
            2 => FactoryCommand::ReadGate,
            3 => FactoryCommand::SetBypass,
            4 => FactoryCommand::Calibrate,
            _ => return None,
        };
        Some((command, argument))
    }

    pub fn encode(self, argument: u8) -> u8 {
        ((self as u8) << 5) | (argument & 0x1F)
    }
}
