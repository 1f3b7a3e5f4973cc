//! Support for the `PCA9554` "8-bit I2C-bus and SMBus I/O port with interrupt"
//!
//! Datasheet: https://www.nxp.com/docs/en/data-sheet/PCA9554_9554A.pdf
//!
//! Unlike the MCP chips, the PCA9554 splits its pin state across two
//! registers: reads return the INPUT register, writes go to the OUTPUT
//! register.  A read-modify-write of an output pin therefore reads the
//! levels actually present on the pins, not the last value written.
//!
//! The chip has no pull-up configuration register; `set_pull` on its pins
//! always fails with [`Error::UnsupportedConfiguration`].
//!
//! [`Error::UnsupportedConfiguration`]: crate::Error::UnsupportedConfiguration

use crate::bus::{I2cRegisters, RegisterBus};
use crate::{Error, Pin, PortMutex, PortRegisters};

/// Address used when all hardware address pins are tied high.
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// `PCA9554` "8-bit I2C-bus and SMBus I/O port with interrupt"
pub struct Pca9554<M>(M);

impl<I2C> Pca9554<core::cell::RefCell<Driver<I2cRegisters<I2C>>>>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Create a new PCA9554 driver and reset the chip to its defaults:
    /// all pins input, polarity inversion off.
    pub fn new(i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>> {
        Self::with_mutex(I2cRegisters::new(i2c, address), true)
    }
}

impl<B, M> Pca9554<M>
where
    B: RegisterBus,
    M: PortMutex<Port = Driver<B>>,
{
    /// Wrap `bus` in a custom mutex type.  Pass `reset = false` to keep
    /// whatever register state the chip currently has.
    pub fn with_mutex(bus: B, reset: bool) -> Result<Self, Error<B::BusError>> {
        let mut driver = Driver::new(bus);
        if reset {
            driver.reset()?;
        }
        Ok(Self(PortMutex::create(driver)))
    }

    /// Handle for pin `index` (0..=7).
    pub fn get_pin(&self, index: u8) -> Result<Pin<'_, M>, Error<B::BusError>> {
        if index >= <Driver<B> as PortRegisters>::PIN_COUNT {
            return Err(Error::InvalidPin(index));
        }
        Ok(Pin::new(index, &self.0))
    }

    pub fn split(&mut self) -> Parts<'_, B, M> {
        Parts {
            io0: Pin::new(0, &self.0),
            io1: Pin::new(1, &self.0),
            io2: Pin::new(2, &self.0),
            io3: Pin::new(3, &self.0),
            io4: Pin::new(4, &self.0),
            io5: Pin::new(5, &self.0),
            io6: Pin::new(6, &self.0),
            io7: Pin::new(7, &self.0),
        }
    }

    /// Re-write the power-on defaults.
    pub fn reset(&mut self) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.reset())
    }

    /// Logic levels on the pins (the INPUT register).
    pub fn gpio(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.gpio()).map(|v| v as u8)
    }

    /// Write the OUTPUT register.  The written bits only take effect on
    /// pins configured as outputs.
    pub fn set_gpio(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_gpio(value.into()))
    }

    /// The configuration register: bit 1 = input, 0 = output.
    pub fn iodir(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.iodir()).map(|v| v as u8)
    }

    pub fn set_iodir(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_iodir(value.into()))
    }

    /// The polarity inversion register: bit 1 = input reads inverted.
    pub fn ipol(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.ipol()).map(|v| v as u8)
    }

    pub fn set_ipol(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_ipol(value.into()))
    }
}

pub struct Parts<'a, B, M = core::cell::RefCell<Driver<B>>>
where
    B: RegisterBus,
    M: PortMutex<Port = Driver<B>>,
{
    pub io0: Pin<'a, M>,
    pub io1: Pin<'a, M>,
    pub io2: Pin<'a, M>,
    pub io3: Pin<'a, M>,
    pub io4: Pin<'a, M>,
    pub io5: Pin<'a, M>,
    pub io6: Pin<'a, M>,
    pub io7: Pin<'a, M>,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Regs {
    /// INPUT: logic levels on the pins (read-only)
    INPUT = 0x00,
    /// OUTPUT: output latch, only drives pins configured as outputs
    OUTPUT = 0x01,
    /// IPOL: input polarity: 0=register values match input pins; 1=opposite
    IPOL = 0x02,
    /// IODIR: input/output direction: 0=output; 1=input
    IODIR = 0x03,
}

impl From<Regs> for u8 {
    fn from(r: Regs) -> u8 {
        r as u8
    }
}

pub struct Driver<B> {
    bus: B,
}

impl<B: RegisterBus> Driver<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Write the power-on defaults: all pins input, input polarity not
    /// inverted.
    pub fn reset(&mut self) -> Result<(), Error<B::BusError>> {
        self.set_iodir(0x00ff)?;
        self.set_ipol(0x0000)
    }
}

impl<B: RegisterBus> PortRegisters for Driver<B> {
    type BusError = B::BusError;
    const PIN_COUNT: u8 = 8;

    fn gpio(&mut self) -> Result<u16, Error<B::BusError>> {
        let value = self.bus.read_u8(Regs::INPUT).map_err(Error::Bus)?;
        // Erratum: the command pointer must not stay parked at the INPUT
        // register or the interrupt output malfunctions.  A throwaway read
        // of the OUTPUT register moves it along.
        self.bus.read_u8(Regs::OUTPUT).map_err(Error::Bus)?;
        Ok(u16::from(value))
    }

    fn set_gpio(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::OUTPUT, value as u8).map_err(Error::Bus)
    }

    fn iodir(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u8(Regs::IODIR).map(u16::from).map_err(Error::Bus)
    }

    fn set_iodir(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::IODIR, value as u8).map_err(Error::Bus)
    }

    fn ipol(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u8(Regs::IPOL).map(u16::from).map_err(Error::Bus)
    }

    fn set_ipol(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::IPOL, value as u8).map_err(Error::Bus)
    }

    // No gppu override: the chip has no pull-up configuration register.
}

#[cfg(test)]
mod tests {
    use crate::{Error, Pull};
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    #[test]
    fn pca9554_reset_and_output() {
        let expectations = [
            // construction reset
            mock_i2c::Transaction::write(0x27, vec![0x03, 0xff]),
            mock_i2c::Transaction::write(0x27, vec![0x02, 0x00]),
            // io4 switch_to_output(true)
            mock_i2c::Transaction::write_read(0x27, vec![0x03], vec![0xff]),
            mock_i2c::Transaction::write(0x27, vec![0x03, 0xef]),
            mock_i2c::Transaction::write_read(0x27, vec![0x00], vec![0x00]),
            mock_i2c::Transaction::write_read(0x27, vec![0x01], vec![0x00]),
            mock_i2c::Transaction::write(0x27, vec![0x01, 0x10]),
            // value readback (INPUT read plus erratum dummy read)
            mock_i2c::Transaction::write_read(0x27, vec![0x00], vec![0x10]),
            mock_i2c::Transaction::write_read(0x27, vec![0x01], vec![0x10]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let pca = super::Pca9554::new(bus.clone(), 0x27).unwrap();

        let mut io4 = pca.get_pin(4).unwrap();
        io4.switch_to_output(true).unwrap();
        assert!(io4.value().unwrap());

        bus.done();
    }

    #[test]
    fn pca9554_pin_bounds() {
        let mut bus = mock_i2c::Mock::new(&[]);

        let pca = super::Pca9554::<core::cell::RefCell<_>>::with_mutex(
            crate::I2cRegisters::new(bus.clone(), 0x27),
            false,
        )
        .unwrap();

        for index in 0..8 {
            assert!(pca.get_pin(index).is_ok());
        }
        assert!(matches!(pca.get_pin(8), Err(Error::InvalidPin(8))));
        assert!(matches!(pca.get_pin(255), Err(Error::InvalidPin(255))));

        bus.done();
    }

    #[test]
    fn pca9554_unsupported_pulls() {
        let mut bus = mock_i2c::Mock::new(&[]);

        let pca = super::Pca9554::<core::cell::RefCell<_>>::with_mutex(
            crate::I2cRegisters::new(bus.clone(), 0x27),
            false,
        )
        .unwrap();

        // every pull request fails without touching the bus
        let mut io0 = pca.get_pin(0).unwrap();
        assert!(matches!(
            io0.set_pull(Some(Pull::Up)),
            Err(Error::UnsupportedConfiguration)
        ));
        assert!(matches!(
            io0.set_pull(Some(Pull::Down)),
            Err(Error::UnsupportedConfiguration)
        ));
        assert!(matches!(
            io0.set_pull(None),
            Err(Error::UnsupportedConfiguration)
        ));

        bus.done();
    }

    #[test]
    fn pca9554_polarity() {
        let expectations = [
            mock_i2c::Transaction::write_read(0x27, vec![0x02], vec![0x00]),
            mock_i2c::Transaction::write(0x27, vec![0x02, 0x01]),
            mock_i2c::Transaction::write_read(0x27, vec![0x02], vec![0x01]),
            mock_i2c::Transaction::write_read(0x27, vec![0x02], vec![0x01]),
            mock_i2c::Transaction::write(0x27, vec![0x02, 0x00]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let pca = super::Pca9554::<core::cell::RefCell<_>>::with_mutex(
            crate::I2cRegisters::new(bus.clone(), 0x27),
            false,
        )
        .unwrap();

        let mut io0 = pca.get_pin(0).unwrap();
        io0.set_polarity(true).unwrap();
        assert!(io0.polarity().unwrap());
        io0.set_polarity(false).unwrap();

        bus.done();
    }
}
