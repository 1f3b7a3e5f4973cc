//! Support for the `MCP23008` and `MCP23S08` "8-Bit I/O Expander with Serial Interface"
//!
//! Datasheet: https://ww1.microchip.com/downloads/en/DeviceDoc/MCP23008-MCP23S08-Data-Sheet-20001919F.pdf
//!
//! The MCP23008 speaks I2C, the MCP23S08 is the same register map behind a
//! SPI interface.  Both default to address 0x20, configurable through the
//! hardware address pins.
//!
//! Unlike its 16-pin siblings, the polarity inversion register is not part
//! of this driver's public surface; a reset still clears it so inputs read
//! uninverted.

use crate::bus::{I2cRegisters, RegisterBus, SpiRegisters};
use crate::{Error, Pin, PortMutex, PortRegisters};

/// Address used when all hardware address pins are tied low.
pub const DEFAULT_ADDRESS: u8 = 0x20;

/// `MCP23008`/`MCP23S08` "8-Bit I/O Expander with Serial Interface"
pub struct Mcp23x08<M>(M);

impl<I2C> Mcp23x08<core::cell::RefCell<Driver<I2cRegisters<I2C>>>>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Create a new MCP23008 driver and reset the chip to its defaults:
    /// all pins input, pull-ups off.
    pub fn new_mcp23008(i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>> {
        Self::with_mutex(I2cRegisters::new(i2c, address), true)
    }
}

impl<SPI> Mcp23x08<core::cell::RefCell<Driver<SpiRegisters<SPI>>>>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    /// Create a new MCP23S08 driver and reset the chip to its defaults.
    ///
    /// Chip-select and clock rate are owned by the [`SpiDevice`]
    /// implementation; `address` must match the hardware address pins.
    ///
    /// [`SpiDevice`]: embedded_hal::spi::SpiDevice
    pub fn new_mcp23s08(spi: SPI, address: u8) -> Result<Self, Error<SPI::Error>> {
        Self::with_mutex(SpiRegisters::new(spi, address), true)
    }
}

impl<B, M> Mcp23x08<M>
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
            gp0: Pin::new(0, &self.0),
            gp1: Pin::new(1, &self.0),
            gp2: Pin::new(2, &self.0),
            gp3: Pin::new(3, &self.0),
            gp4: Pin::new(4, &self.0),
            gp5: Pin::new(5, &self.0),
            gp6: Pin::new(6, &self.0),
            gp7: Pin::new(7, &self.0),
        }
    }

    /// Re-write the power-on defaults.
    pub fn reset(&mut self) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.reset())
    }

    /// The GPIO register, one bit per pin logic level.
    pub fn gpio(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.gpio()).map(|v| v as u8)
    }

    pub fn set_gpio(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_gpio(value.into()))
    }

    /// The IODIR register: bit 1 = input, 0 = output.
    pub fn iodir(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.iodir()).map(|v| v as u8)
    }

    pub fn set_iodir(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_iodir(value.into()))
    }

    /// The GPPU pull-up enable register.
    pub fn gppu(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.gppu()).map(|v| v as u8)
    }

    pub fn set_gppu(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_gppu(value.into()))
    }
}

pub struct Parts<'a, B, M = core::cell::RefCell<Driver<B>>>
where
    B: RegisterBus,
    M: PortMutex<Port = Driver<B>>,
{
    pub gp0: Pin<'a, M>,
    pub gp1: Pin<'a, M>,
    pub gp2: Pin<'a, M>,
    pub gp3: Pin<'a, M>,
    pub gp4: Pin<'a, M>,
    pub gp5: Pin<'a, M>,
    pub gp6: Pin<'a, M>,
    pub gp7: Pin<'a, M>,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Reset value is 0x00 for all registers except IODIR, which is 0xFF
/// (all pins inputs).
enum Regs {
    /// IODIR: input/output direction: 0=output; 1=input
    IODIR = 0x00,
    /// IPOL: input polarity: 0=register values match input pins; 1=opposite
    IPOL = 0x01,
    /// GPINTEN: interrupt-on-change: 0=disable; 1=enable
    GPINTEN = 0x02,
    /// DEFVAL: default values for interrupt-on-change
    DEFVAL = 0x03,
    /// INTCON: interrupt-on-change config
    INTCON = 0x04,
    /// IOCON: configuration register
    IOCON = 0x05,
    /// GPPU: weak internal pull-ups (for pins configured as inputs)
    GPPU = 0x06,
    /// INTF: interrupt flags
    INTF = 0x07,
    /// INTCAP: pin values captured at interrupt time
    INTCAP = 0x08,
    /// GPIO: reflects logic level on pins
    GPIO = 0x09,
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

    /// Write the power-on defaults: all pins input, pull-ups off, input
    /// polarity not inverted.
    pub fn reset(&mut self) -> Result<(), Error<B::BusError>> {
        self.set_iodir(0x00ff)?;
        self.set_gppu(0x0000)?;
        // IPOL has no named accessor on this chip but is still cleared so
        // inputs never read inverted after a reset.
        self.bus.write_u8(Regs::IPOL, 0x00).map_err(Error::Bus)
    }
}

impl<B: RegisterBus> PortRegisters for Driver<B> {
    type BusError = B::BusError;
    const PIN_COUNT: u8 = 8;

    fn gpio(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u8(Regs::GPIO).map(u16::from).map_err(Error::Bus)
    }

    fn set_gpio(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::GPIO, value as u8).map_err(Error::Bus)
    }

    fn iodir(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u8(Regs::IODIR).map(u16::from).map_err(Error::Bus)
    }

    fn set_iodir(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::IODIR, value as u8).map_err(Error::Bus)
    }

    fn gppu(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u8(Regs::GPPU).map(u16::from).map_err(Error::Bus)
    }

    fn set_gppu(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::GPPU, value as u8).map_err(Error::Bus)
    }

    // No ipol override: polarity inversion is not exposed on this chip.
}
