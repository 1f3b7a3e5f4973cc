/// Error type for all expander operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The underlying bus transaction failed.  Propagated unmodified from
    /// the transport; no retry is attempted.
    Bus(E),
    /// Pin index outside the chip's supported range.
    InvalidPin(u8),
    /// The requested feature is not available on this chip, for example a
    /// pull-down resistor or a pull-up/polarity register the chip lacks.
    /// Reported before any bus activity.
    UnsupportedConfiguration,
}

impl<E: core::fmt::Debug> embedded_hal::digital::Error for Error<E> {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Direction of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Pull resistor configuration.
///
/// The whole chip family only provides pull-ups; requesting [`Pull::Down`]
/// always fails with [`Error::UnsupportedConfiguration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    Up,
    Down,
}

/// Register surface shared by every expander in the family.
///
/// Register values are carried as `u16` regardless of chip width; on 8-pin
/// chips only the low byte is meaningful.  Bit `n` corresponds 1:1 to pin
/// `n` (on 16-pin chips the high byte is port B).
///
/// `gppu` and `ipol` are optional capabilities: chips without the register
/// keep the default implementations, which report
/// [`Error::UnsupportedConfiguration`] without touching the bus.
pub trait PortRegisters {
    type BusError;

    /// Number of pins on the chip.
    const PIN_COUNT: u8;

    /// Read the GPIO register, one bit per pin logic level.
    fn gpio(&mut self) -> Result<u16, Error<Self::BusError>>;
    /// Write the GPIO register.  Bits of pins configured as inputs have no
    /// electrical effect.
    fn set_gpio(&mut self, value: u16) -> Result<(), Error<Self::BusError>>;

    /// Read the direction register: bit 1 = input, 0 = output.
    fn iodir(&mut self) -> Result<u16, Error<Self::BusError>>;
    fn set_iodir(&mut self, value: u16) -> Result<(), Error<Self::BusError>>;

    /// Read the pull-up enable register.
    fn gppu(&mut self) -> Result<u16, Error<Self::BusError>> {
        Err(Error::UnsupportedConfiguration)
    }
    fn set_gppu(&mut self, _value: u16) -> Result<(), Error<Self::BusError>> {
        Err(Error::UnsupportedConfiguration)
    }

    /// Read the input polarity inversion register.
    fn ipol(&mut self) -> Result<u16, Error<Self::BusError>> {
        Err(Error::UnsupportedConfiguration)
    }
    fn set_ipol(&mut self, _value: u16) -> Result<(), Error<Self::BusError>> {
        Err(Error::UnsupportedConfiguration)
    }
}

pub(crate) fn set_bit(value: u16, pin: u8) -> u16 {
    value | 1 << pin
}

pub(crate) fn clear_bit(value: u16, pin: u8) -> u16 {
    value & !(1 << pin)
}

pub(crate) fn get_bit(value: u16, pin: u8) -> bool {
    value & 1 << pin != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_helpers() {
        assert_eq!(set_bit(0x0000, 0), 0x0001);
        assert_eq!(set_bit(0x00ff, 15), 0x80ff);
        assert_eq!(clear_bit(0xffff, 3), 0xfff7);
        assert_eq!(clear_bit(0x0008, 3), 0x0000);
        assert!(get_bit(0x0010, 4));
        assert!(!get_bit(0xffef, 4));
    }

    #[test]
    fn bit_helpers_leave_other_bits_alone() {
        for pin in 0..16 {
            let mask = 1u16 << pin;
            assert_eq!(set_bit(0x5a5a, pin) & !mask, 0x5a5a & !mask);
            assert_eq!(clear_bit(0x5a5a, pin) & !mask, 0x5a5a & !mask);
        }
    }
}
