//! Translation of register accesses into bus transactions.
//!
//! The chips in this family come in I2C and SPI flavors sharing the same
//! register maps, so the wire framing is factored out behind
//! [`RegisterBus`]: the chip drivers only ever name a register and a value,
//! the accessor shapes the bytes for its bus.

use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;

/// SPI command byte announcing a register write to the device at `address`.
pub(crate) fn spi_write_command(address: u8) -> u8 {
    0x40 | address << 1
}

/// SPI command byte announcing a register read from the device at `address`.
pub(crate) fn spi_read_command(address: u8) -> u8 {
    0x41 | address << 1
}

/// Register access primitives, parameterized by register address.
///
/// 16-bit accesses span two sequential register addresses starting at `reg`,
/// low byte first on the wire.  Each operation is a single scoped bus
/// transaction; the device is released on every exit path.
pub trait RegisterBus {
    type BusError;

    fn read_u8<R: Into<u8>>(&mut self, reg: R) -> Result<u8, Self::BusError>;
    fn write_u8<R: Into<u8>>(&mut self, reg: R, value: u8) -> Result<(), Self::BusError>;
    fn read_u16le<R: Into<u8>>(&mut self, reg: R) -> Result<u16, Self::BusError>;
    fn write_u16le<R: Into<u8>>(&mut self, reg: R, value: u16) -> Result<(), Self::BusError>;
}

/// I2C register access: writes are `[register, data...]` in one transaction,
/// reads write the register address and read back without an intervening
/// stop condition.
pub struct I2cRegisters<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cRegisters<I2C> {
    /// `address` is the 7-bit device address.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }
}

impl<I2C: I2c> RegisterBus for I2cRegisters<I2C> {
    type BusError = I2C::Error;

    fn read_u8<R: Into<u8>>(&mut self, reg: R) -> Result<u8, Self::BusError> {
        let mut buf = [0x00];
        self.i2c.write_read(self.address, &[reg.into()], &mut buf)?;
        Ok(buf[0])
    }

    fn write_u8<R: Into<u8>>(&mut self, reg: R, value: u8) -> Result<(), Self::BusError> {
        self.i2c.write(self.address, &[reg.into(), value])
    }

    fn read_u16le<R: Into<u8>>(&mut self, reg: R) -> Result<u16, Self::BusError> {
        let mut buf = [0x00; 2];
        self.i2c.write_read(self.address, &[reg.into()], &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn write_u16le<R: Into<u8>>(&mut self, reg: R, value: u16) -> Result<(), Self::BusError> {
        let [lo, hi] = value.to_le_bytes();
        self.i2c.write(self.address, &[reg.into(), lo, hi])
    }
}

/// SPI register access for the MCP23Sxx chips.
///
/// Every exchange leads with a command byte encoding the device address and
/// the transfer direction, then the register address.  Reads are full
/// duplex: don't-care bytes pad the outgoing frame and the response carries
/// the register data at the same offsets (the echo of the command and
/// address bytes is discarded).
///
/// Chip-select and clock configuration live in the [`SpiDevice`]
/// implementation, which scopes each call as one bus transaction.
pub struct SpiRegisters<SPI> {
    spi: SPI,
    cmd_write: u8,
    cmd_read: u8,
}

impl<SPI> SpiRegisters<SPI> {
    /// `address` is the same 7-bit address the I2C variants use; the
    /// hardware address pins must match for the command byte to be
    /// accepted.
    pub fn new(spi: SPI, address: u8) -> Self {
        Self {
            spi,
            cmd_write: spi_write_command(address),
            cmd_read: spi_read_command(address),
        }
    }
}

impl<SPI: SpiDevice> RegisterBus for SpiRegisters<SPI> {
    type BusError = SPI::Error;

    fn read_u8<R: Into<u8>>(&mut self, reg: R) -> Result<u8, Self::BusError> {
        let mut response = [0x00; 3];
        self.spi
            .transfer(&mut response, &[self.cmd_read, reg.into(), 0x00])?;
        Ok(response[2])
    }

    fn write_u8<R: Into<u8>>(&mut self, reg: R, value: u8) -> Result<(), Self::BusError> {
        self.spi.write(&[self.cmd_write, reg.into(), value])
    }

    fn read_u16le<R: Into<u8>>(&mut self, reg: R) -> Result<u16, Self::BusError> {
        let mut response = [0x00; 4];
        self.spi
            .transfer(&mut response, &[self.cmd_read, reg.into(), 0x00, 0x00])?;
        Ok(u16::from_le_bytes([response[2], response[3]]))
    }

    fn write_u16le<R: Into<u8>>(&mut self, reg: R, value: u16) -> Result<(), Self::BusError> {
        let [lo, hi] = value.to_le_bytes();
        self.spi.write(&[self.cmd_write, reg.into(), lo, hi])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::{i2c as mock_i2c, spi as mock_spi};

    #[test]
    fn spi_command_bytes() {
        assert_eq!(spi_write_command(0x20), 0x40);
        assert_eq!(spi_read_command(0x20), 0x41);
        assert_eq!(spi_write_command(0x22), 0x44);
        assert_eq!(spi_read_command(0x22), 0x45);
        assert_eq!(spi_write_command(0x27), 0x4e);
        assert_eq!(spi_read_command(0x27), 0x4f);
        for address in 0x20..=0x27u8 {
            assert_eq!(spi_read_command(address), spi_write_command(address) | 0x01);
        }
    }

    #[test]
    fn i2c_u16_byte_order() {
        let expectations = [
            mock_i2c::Transaction::write(0x20, vec![0x12, 0xcd, 0xab]),
            mock_i2c::Transaction::write_read(0x20, vec![0x12], vec![0xcd, 0xab]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut regs = I2cRegisters::new(bus.clone(), 0x20);
        regs.write_u16le(0x12u8, 0xabcd).unwrap();
        assert_eq!(regs.read_u16le(0x12u8).unwrap(), 0xabcd);

        bus.done();
    }

    #[test]
    fn spi_u16_byte_order() {
        let expectations = [
            mock_spi::Transaction::transaction_start(),
            mock_spi::Transaction::write_vec(vec![0x44, 0x12, 0xcd, 0xab]),
            mock_spi::Transaction::transaction_end(),
            mock_spi::Transaction::transaction_start(),
            mock_spi::Transaction::transfer(
                vec![0x45, 0x12, 0x00, 0x00],
                vec![0x00, 0x00, 0xcd, 0xab],
            ),
            mock_spi::Transaction::transaction_end(),
        ];
        let mut bus = mock_spi::Mock::new(&expectations);

        let mut regs = SpiRegisters::new(bus.clone(), 0x22);
        regs.write_u16le(0x12u8, 0xabcd).unwrap();
        assert_eq!(regs.read_u16le(0x12u8).unwrap(), 0xabcd);

        bus.done();
    }
}
