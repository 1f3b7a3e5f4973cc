//! Support for the `MCP23017` and `MCP23S17` "16-Bit I/O Expander with Serial Interface"
//!
//! Datasheet: https://ww1.microchip.com/downloads/en/devicedoc/20001952c.pdf
//!
//! The MCP23x17 offers two eight-bit GPIO ports.  In 16-bit register values
//! the low byte corresponds to port A (pins 0..7) and the high byte to port
//! B (pins 8..15).  The `..a`/`..b` accessors address one port half with a
//! single-byte transaction.
//!
//! The chips are driven in BANK=0 register layout (the reset state); the
//! driver forces the bank-mode bit off on every IOCON write, so the
//! sequential A/B addresses used for 16-bit accesses stay valid.

use crate::bus::{I2cRegisters, RegisterBus, SpiRegisters};
use crate::{Error, Pin, PortMutex, PortRegisters};

/// Address used when all hardware address pins are tied low.
pub const DEFAULT_ADDRESS: u8 = 0x20;

/// `MCP23017`/`MCP23S17` "16-Bit I/O Expander with Serial Interface"
pub struct Mcp23x17<M>(M);

impl<I2C> Mcp23x17<core::cell::RefCell<Driver<I2cRegisters<I2C>>>>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Create a new MCP23017 driver and reset the chip to its defaults:
    /// all pins input, pull-ups and polarity inversion off, interrupt
    /// pins open-drain.
    pub fn new_mcp23017(i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>> {
        Self::with_mutex(I2cRegisters::new(i2c, address), true)
    }
}

impl<SPI> Mcp23x17<core::cell::RefCell<Driver<SpiRegisters<SPI>>>>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    /// Create a new MCP23S17 driver and reset the chip to its defaults.
    ///
    /// Chip-select and clock rate are owned by the [`SpiDevice`]
    /// implementation; `address` must match the hardware address pins.
    ///
    /// [`SpiDevice`]: embedded_hal::spi::SpiDevice
    pub fn new_mcp23s17(spi: SPI, address: u8) -> Result<Self, Error<SPI::Error>> {
        Self::with_mutex(SpiRegisters::new(spi, address), true)
    }
}

impl<B, M> Mcp23x17<M>
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

    /// Handle for pin `index` (0..=15; 8..=15 is port B).
    pub fn get_pin(&self, index: u8) -> Result<Pin<'_, M>, Error<B::BusError>> {
        if index >= <Driver<B> as PortRegisters>::PIN_COUNT {
            return Err(Error::InvalidPin(index));
        }
        Ok(Pin::new(index, &self.0))
    }

    pub fn split(&mut self) -> Parts<'_, B, M> {
        Parts {
            gpa0: Pin::new(0, &self.0),
            gpa1: Pin::new(1, &self.0),
            gpa2: Pin::new(2, &self.0),
            gpa3: Pin::new(3, &self.0),
            gpa4: Pin::new(4, &self.0),
            gpa5: Pin::new(5, &self.0),
            gpa6: Pin::new(6, &self.0),
            gpa7: Pin::new(7, &self.0),
            gpb0: Pin::new(8, &self.0),
            gpb1: Pin::new(9, &self.0),
            gpb2: Pin::new(10, &self.0),
            gpb3: Pin::new(11, &self.0),
            gpb4: Pin::new(12, &self.0),
            gpb5: Pin::new(13, &self.0),
            gpb6: Pin::new(14, &self.0),
            gpb7: Pin::new(15, &self.0),
        }
    }

    /// Re-write the power-on defaults.
    pub fn reset(&mut self) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.reset())
    }

    /// The full 16-bit GPIO register, one bit per pin logic level.
    pub fn gpio(&mut self) -> Result<u16, Error<B::BusError>> {
        self.0.lock(|drv| drv.gpio())
    }

    pub fn set_gpio(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_gpio(value))
    }

    pub fn gpioa(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.gpioa())
    }

    pub fn set_gpioa(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_gpioa(value))
    }

    pub fn gpiob(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.gpiob())
    }

    pub fn set_gpiob(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_gpiob(value))
    }

    /// The full 16-bit IODIR register: bit 1 = input, 0 = output.
    pub fn iodir(&mut self) -> Result<u16, Error<B::BusError>> {
        self.0.lock(|drv| drv.iodir())
    }

    pub fn set_iodir(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_iodir(value))
    }

    pub fn iodira(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.iodira())
    }

    pub fn set_iodira(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_iodira(value))
    }

    pub fn iodirb(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.iodirb())
    }

    pub fn set_iodirb(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_iodirb(value))
    }

    /// The full 16-bit GPPU pull-up enable register.
    pub fn gppu(&mut self) -> Result<u16, Error<B::BusError>> {
        self.0.lock(|drv| drv.gppu())
    }

    pub fn set_gppu(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_gppu(value))
    }

    pub fn gppua(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.gppua())
    }

    pub fn set_gppua(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_gppua(value))
    }

    pub fn gppub(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.gppub())
    }

    pub fn set_gppub(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_gppub(value))
    }

    /// The full 16-bit IPOL input polarity register: bit 1 = inverted.
    pub fn ipol(&mut self) -> Result<u16, Error<B::BusError>> {
        self.0.lock(|drv| drv.ipol())
    }

    pub fn set_ipol(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_ipol(value))
    }

    pub fn ipola(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.ipola())
    }

    pub fn set_ipola(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_ipola(value))
    }

    pub fn ipolb(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.ipolb())
    }

    pub fn set_ipolb(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_ipolb(value))
    }

    /// The GPINTEN register: a set bit enables interrupt-on-change for the
    /// corresponding pin.  DEFVAL and INTCON must also be configured for
    /// pins enabled here.
    pub fn interrupt_enable(&mut self) -> Result<u16, Error<B::BusError>> {
        self.0.lock(|drv| drv.interrupt_enable())
    }

    pub fn set_interrupt_enable(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_interrupt_enable(value))
    }

    /// The INTCON register: a set bit compares the pin against its DEFVAL
    /// bit, a clear bit compares against the pin's previous value.
    pub fn interrupt_configuration(&mut self) -> Result<u16, Error<B::BusError>> {
        self.0.lock(|drv| drv.interrupt_configuration())
    }

    pub fn set_interrupt_configuration(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_interrupt_configuration(value))
    }

    /// The DEFVAL register: comparison values for interrupt-on-change.
    pub fn default_value(&mut self) -> Result<u16, Error<B::BusError>> {
        self.0.lock(|drv| drv.default_value())
    }

    pub fn set_default_value(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_default_value(value))
    }

    /// The IOCON configuration register.  Bit 1 is interrupt polarity, bit
    /// 2 selects open-drain interrupt pins, bit 6 mirrors the two interrupt
    /// pins.  Bit 7 (bank mode) is always written as 0; a set bit in
    /// `value` is silently dropped.
    pub fn io_control(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.io_control())
    }

    pub fn set_io_control(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.set_io_control(value))
    }

    /// The INTF register (read-only): a set bit means the corresponding
    /// pin caused an interrupt.
    pub fn int_flag(&mut self) -> Result<u16, Error<B::BusError>> {
        self.0.lock(|drv| drv.int_flag())
    }

    pub fn int_flaga(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.int_flaga())
    }

    pub fn int_flagb(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.int_flagb())
    }

    /// The INTCAP register (read-only): pin values latched at interrupt
    /// time.  Reading it clears the pending interrupt.
    pub fn int_cap(&mut self) -> Result<u16, Error<B::BusError>> {
        self.0.lock(|drv| drv.int_cap())
    }

    pub fn int_capa(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.int_capa())
    }

    pub fn int_capb(&mut self) -> Result<u8, Error<B::BusError>> {
        self.0.lock(|drv| drv.int_capb())
    }

    /// Clear pending interrupts on both ports by reading INTCAP.
    pub fn clear_ints(&mut self) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.int_cap()).map(|_| ())
    }

    /// Clear pending port A interrupts.
    pub fn clear_inta(&mut self) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.int_capa()).map(|_| ())
    }

    /// Clear pending port B interrupts.
    pub fn clear_intb(&mut self) -> Result<(), Error<B::BusError>> {
        self.0.lock(|drv| drv.int_capb()).map(|_| ())
    }
}

pub struct Parts<'a, B, M = core::cell::RefCell<Driver<B>>>
where
    B: RegisterBus,
    M: PortMutex<Port = Driver<B>>,
{
    pub gpa0: Pin<'a, M>,
    pub gpa1: Pin<'a, M>,
    pub gpa2: Pin<'a, M>,
    pub gpa3: Pin<'a, M>,
    pub gpa4: Pin<'a, M>,
    pub gpa5: Pin<'a, M>,
    pub gpa6: Pin<'a, M>,
    pub gpa7: Pin<'a, M>,
    pub gpb0: Pin<'a, M>,
    pub gpb1: Pin<'a, M>,
    pub gpb2: Pin<'a, M>,
    pub gpb3: Pin<'a, M>,
    pub gpb4: Pin<'a, M>,
    pub gpb5: Pin<'a, M>,
    pub gpb6: Pin<'a, M>,
    pub gpb7: Pin<'a, M>,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// N.B.: These values are for BANK=0, which is the reset state of the chip
/// (and which this driver enforces on every IOCON write).
///
/// For all registers, the reset value is 0x00, except for IODIR{A,B} which
/// are 0xFF (making all pins inputs) at reset.  16-bit accesses start at
/// the A register and rely on the sequential B address.
enum Regs {
    /// IODIR: input/output direction: 0=output; 1=input
    IODIRA = 0x00,
    IODIRB = 0x01,
    /// IPOL: input polarity: 0=register values match input pins; 1=opposite
    IPOLA = 0x02,
    IPOLB = 0x03,
    /// GPINTEN: interrupt-on-change: 0=disable; 1=enable
    GPINTENA = 0x04,
    GPINTENB = 0x05,
    /// DEFVAL: default values for interrupt-on-change
    DEFVALA = 0x06,
    DEFVALB = 0x07,
    /// INTCON: interrupt-on-change config: 0=compare to previous pin value;
    ///   1=compare to corresponding bit in DEFVAL
    INTCONA = 0x08,
    INTCONB = 0x09,
    /// IOCON: configuration register (shared between the ports)
    /// - Bit 7: BANK (kept 0 by this driver)
    /// - Bit 6: MIRROR: logically OR the INTA/INTB pins
    /// - Bit 5: SEQOP: disables address-pointer auto-increment
    /// - Bit 4: DISSLW: disables slew rate control on SDA
    /// - Bit 3: HAEN: hardware address enable (MCP23S17 only)
    /// - Bit 2: ODR: interrupt pins are open-drain (overrides INTPOL)
    /// - Bit 1: INTPOL: interrupt pin is 0=active-low or 1=active-high
    /// - Bit 0: unused
    IOCON = 0x0a,
    /// GPPU: weak internal pull-ups (for pins configured as inputs)
    GPPUA = 0x0c,
    GPPUB = 0x0d,
    /// INTF: interrupt flags: 1=corresponding pin caused interrupt
    INTFA = 0x0e,
    INTFB = 0x0f,
    /// INTCAP: pin values captured at interrupt time; reading clears the
    /// pending interrupt
    INTCAPA = 0x10,
    INTCAPB = 0x11,
    /// GPIO: reflects logic level on pins
    GPIOA = 0x12,
    GPIOB = 0x13,
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

    /// Write the power-on defaults: all pins input, pull-ups off, no
    /// polarity inversion, interrupt pins configured as open-drain.
    pub fn reset(&mut self) -> Result<(), Error<B::BusError>> {
        self.set_iodir(0xffff)?;
        self.set_gppu(0x0000)?;
        self.set_io_control(0x04)?;
        self.set_ipol(0x0000)
    }

    pub fn gpioa(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::GPIOA).map_err(Error::Bus)
    }

    pub fn set_gpioa(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::GPIOA, value).map_err(Error::Bus)
    }

    pub fn gpiob(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::GPIOB).map_err(Error::Bus)
    }

    pub fn set_gpiob(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::GPIOB, value).map_err(Error::Bus)
    }

    pub fn iodira(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::IODIRA).map_err(Error::Bus)
    }

    pub fn set_iodira(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::IODIRA, value).map_err(Error::Bus)
    }

    pub fn iodirb(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::IODIRB).map_err(Error::Bus)
    }

    pub fn set_iodirb(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::IODIRB, value).map_err(Error::Bus)
    }

    pub fn gppua(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::GPPUA).map_err(Error::Bus)
    }

    pub fn set_gppua(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::GPPUA, value).map_err(Error::Bus)
    }

    pub fn gppub(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::GPPUB).map_err(Error::Bus)
    }

    pub fn set_gppub(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::GPPUB, value).map_err(Error::Bus)
    }

    pub fn ipola(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::IPOLA).map_err(Error::Bus)
    }

    pub fn set_ipola(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::IPOLA, value).map_err(Error::Bus)
    }

    pub fn ipolb(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::IPOLB).map_err(Error::Bus)
    }

    pub fn set_ipolb(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::IPOLB, value).map_err(Error::Bus)
    }

    pub fn interrupt_enable(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u16le(Regs::GPINTENA).map_err(Error::Bus)
    }

    pub fn set_interrupt_enable(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u16le(Regs::GPINTENA, value).map_err(Error::Bus)
    }

    pub fn interrupt_configuration(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u16le(Regs::INTCONA).map_err(Error::Bus)
    }

    pub fn set_interrupt_configuration(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u16le(Regs::INTCONA, value).map_err(Error::Bus)
    }

    pub fn default_value(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u16le(Regs::DEFVALA).map_err(Error::Bus)
    }

    pub fn set_default_value(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u16le(Regs::DEFVALA, value).map_err(Error::Bus)
    }

    pub fn io_control(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::IOCON).map_err(Error::Bus)
    }

    /// Bit 7 (BANK) is always cleared before writing; the driver relies on
    /// the sequential BANK=0 register layout.
    pub fn set_io_control(&mut self, value: u8) -> Result<(), Error<B::BusError>> {
        self.bus.write_u8(Regs::IOCON, value & !0x80).map_err(Error::Bus)
    }

    pub fn int_flag(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u16le(Regs::INTFA).map_err(Error::Bus)
    }

    pub fn int_flaga(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::INTFA).map_err(Error::Bus)
    }

    pub fn int_flagb(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::INTFB).map_err(Error::Bus)
    }

    pub fn int_cap(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u16le(Regs::INTCAPA).map_err(Error::Bus)
    }

    pub fn int_capa(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::INTCAPA).map_err(Error::Bus)
    }

    pub fn int_capb(&mut self) -> Result<u8, Error<B::BusError>> {
        self.bus.read_u8(Regs::INTCAPB).map_err(Error::Bus)
    }
}

impl<B: RegisterBus> PortRegisters for Driver<B> {
    type BusError = B::BusError;
    const PIN_COUNT: u8 = 16;

    fn gpio(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u16le(Regs::GPIOA).map_err(Error::Bus)
    }

    fn set_gpio(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u16le(Regs::GPIOA, value).map_err(Error::Bus)
    }

    fn iodir(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u16le(Regs::IODIRA).map_err(Error::Bus)
    }

    fn set_iodir(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u16le(Regs::IODIRA, value).map_err(Error::Bus)
    }

    fn gppu(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u16le(Regs::GPPUA).map_err(Error::Bus)
    }

    fn set_gppu(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u16le(Regs::GPPUA, value).map_err(Error::Bus)
    }

    fn ipol(&mut self) -> Result<u16, Error<B::BusError>> {
        self.bus.read_u16le(Regs::IPOLA).map_err(Error::Bus)
    }

    fn set_ipol(&mut self, value: u16) -> Result<(), Error<B::BusError>> {
        self.bus.write_u16le(Regs::IPOLA, value).map_err(Error::Bus)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Direction, Error};
    use embedded_hal_mock::eh1::{i2c as mock_i2c, spi as mock_spi};

    #[test]
    fn mcp23017_reset_and_pin_output() {
        let expectations = [
            // construction reset
            mock_i2c::Transaction::write(0x20, vec![0x00, 0xff, 0xff]),
            mock_i2c::Transaction::write(0x20, vec![0x0c, 0x00, 0x00]),
            mock_i2c::Transaction::write(0x20, vec![0x0a, 0x04]),
            mock_i2c::Transaction::write(0x20, vec![0x02, 0x00, 0x00]),
            // readback after reset
            mock_i2c::Transaction::write_read(0x20, vec![0x00], vec![0xff, 0xff]),
            mock_i2c::Transaction::write_read(0x20, vec![0x0c], vec![0x00, 0x00]),
            // gpa3 switch_to_output(true)
            mock_i2c::Transaction::write_read(0x20, vec![0x00], vec![0xff, 0xff]),
            mock_i2c::Transaction::write(0x20, vec![0x00, 0xf7, 0xff]),
            mock_i2c::Transaction::write_read(0x20, vec![0x12], vec![0x00, 0x00]),
            mock_i2c::Transaction::write(0x20, vec![0x12, 0x08, 0x00]),
            // value and iodir readback
            mock_i2c::Transaction::write_read(0x20, vec![0x12], vec![0x08, 0x00]),
            mock_i2c::Transaction::write_read(0x20, vec![0x00], vec![0xf7, 0xff]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut mcp = super::Mcp23x17::new_mcp23017(bus.clone(), 0x20).unwrap();

        assert_eq!(mcp.iodir().unwrap(), 0xffff);
        assert_eq!(mcp.gppu().unwrap(), 0x0000);

        let mut gpa3 = mcp.get_pin(3).unwrap();
        gpa3.switch_to_output(true).unwrap();
        assert!(gpa3.value().unwrap());
        assert_eq!(mcp.iodir().unwrap(), 0xfff7);

        assert!(matches!(mcp.get_pin(16), Err(Error::InvalidPin(16))));

        bus.done();
    }

    #[test]
    fn mcp23017_port_b_pin() {
        use embedded_hal::digital::OutputPin;

        let expectations = [
            // gpb4 (pin 12) to output
            mock_i2c::Transaction::write_read(0x20, vec![0x00], vec![0xff, 0xff]),
            mock_i2c::Transaction::write(0x20, vec![0x00, 0xff, 0xef]),
            // set_value(true)
            mock_i2c::Transaction::write_read(0x20, vec![0x12], vec![0x00, 0x00]),
            mock_i2c::Transaction::write(0x20, vec![0x12, 0x00, 0x10]),
            // OutputPin::set_low
            mock_i2c::Transaction::write_read(0x20, vec![0x12], vec![0x00, 0x10]),
            mock_i2c::Transaction::write(0x20, vec![0x12, 0x00, 0x00]),
            // gpb1 (pin 9) polarity inversion
            mock_i2c::Transaction::write_read(0x20, vec![0x02], vec![0x00, 0x00]),
            mock_i2c::Transaction::write(0x20, vec![0x02, 0x00, 0x02]),
            mock_i2c::Transaction::write_read(0x20, vec![0x02], vec![0x00, 0x02]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mcp = super::Mcp23x17::<core::cell::RefCell<_>>::with_mutex(
            crate::I2cRegisters::new(bus.clone(), 0x20),
            false,
        )
        .unwrap();

        let mut gpb4 = mcp.get_pin(12).unwrap();
        gpb4.set_direction(Direction::Output).unwrap();
        gpb4.set_value(true).unwrap();
        gpb4.set_low().unwrap();

        let mut gpb1 = mcp.get_pin(9).unwrap();
        gpb1.set_polarity(true).unwrap();
        assert!(gpb1.polarity().unwrap());

        bus.done();
    }

    #[test]
    fn mcp23017_io_control_and_interrupts() {
        let expectations = [
            // bank-mode bit is dropped on write
            mock_i2c::Transaction::write(0x20, vec![0x0a, 0x7f]),
            mock_i2c::Transaction::write_read(0x20, vec![0x0a], vec![0x7f]),
            // interrupt configuration
            mock_i2c::Transaction::write(0x20, vec![0x04, 0x01, 0x80]),
            mock_i2c::Transaction::write_read(0x20, vec![0x04], vec![0x01, 0x80]),
            mock_i2c::Transaction::write(0x20, vec![0x08, 0x01, 0x00]),
            mock_i2c::Transaction::write(0x20, vec![0x06, 0x00, 0x01]),
            // interrupt status
            mock_i2c::Transaction::write_read(0x20, vec![0x0e], vec![0x01, 0x80]),
            mock_i2c::Transaction::write_read(0x20, vec![0x0e], vec![0x01]),
            mock_i2c::Transaction::write_read(0x20, vec![0x0f], vec![0x80]),
            mock_i2c::Transaction::write_read(0x20, vec![0x10], vec![0x01, 0x00]),
            // clearing reads INTCAP and discards the value
            mock_i2c::Transaction::write_read(0x20, vec![0x10], vec![0x00, 0x00]),
            mock_i2c::Transaction::write_read(0x20, vec![0x10], vec![0x00]),
            mock_i2c::Transaction::write_read(0x20, vec![0x11], vec![0x00]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut mcp = super::Mcp23x17::<core::cell::RefCell<_>>::with_mutex(
            crate::I2cRegisters::new(bus.clone(), 0x20),
            false,
        )
        .unwrap();

        mcp.set_io_control(0xff).unwrap();
        assert_eq!(mcp.io_control().unwrap(), 0x7f);

        mcp.set_interrupt_enable(0x8001).unwrap();
        assert_eq!(mcp.interrupt_enable().unwrap(), 0x8001);
        mcp.set_interrupt_configuration(0x0001).unwrap();
        mcp.set_default_value(0x0100).unwrap();

        assert_eq!(mcp.int_flag().unwrap(), 0x8001);
        assert_eq!(mcp.int_flaga().unwrap(), 0x01);
        assert_eq!(mcp.int_flagb().unwrap(), 0x80);
        assert_eq!(mcp.int_cap().unwrap(), 0x0001);

        mcp.clear_ints().unwrap();
        mcp.clear_inta().unwrap();
        mcp.clear_intb().unwrap();

        bus.done();
    }

    #[test]
    fn mcp23017_port_split_accessors() {
        let expectations = [
            mock_i2c::Transaction::write_read(0x20, vec![0x12], vec![0xaa]),
            mock_i2c::Transaction::write(0x20, vec![0x13, 0x55]),
            mock_i2c::Transaction::write_read(0x20, vec![0x00], vec![0x0f]),
            mock_i2c::Transaction::write(0x20, vec![0x01, 0xf0]),
            mock_i2c::Transaction::write_read(0x20, vec![0x0c], vec![0x01]),
            mock_i2c::Transaction::write(0x20, vec![0x0d, 0x80]),
            mock_i2c::Transaction::write_read(0x20, vec![0x02], vec![0x00]),
            mock_i2c::Transaction::write(0x20, vec![0x03, 0x01]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut mcp = super::Mcp23x17::<core::cell::RefCell<_>>::with_mutex(
            crate::I2cRegisters::new(bus.clone(), 0x20),
            false,
        )
        .unwrap();

        assert_eq!(mcp.gpioa().unwrap(), 0xaa);
        mcp.set_gpiob(0x55).unwrap();
        assert_eq!(mcp.iodira().unwrap(), 0x0f);
        mcp.set_iodirb(0xf0).unwrap();
        assert_eq!(mcp.gppua().unwrap(), 0x01);
        mcp.set_gppub(0x80).unwrap();
        assert_eq!(mcp.ipola().unwrap(), 0x00);
        mcp.set_ipolb(0x01).unwrap();

        bus.done();
    }

    #[test]
    fn mcp23s17() {
        let expectations = [
            // construction reset
            mock_spi::Transaction::transaction_start(),
            mock_spi::Transaction::write_vec(vec![0x44, 0x00, 0xff, 0xff]),
            mock_spi::Transaction::transaction_end(),
            mock_spi::Transaction::transaction_start(),
            mock_spi::Transaction::write_vec(vec![0x44, 0x0c, 0x00, 0x00]),
            mock_spi::Transaction::transaction_end(),
            mock_spi::Transaction::transaction_start(),
            mock_spi::Transaction::write_vec(vec![0x44, 0x0a, 0x04]),
            mock_spi::Transaction::transaction_end(),
            mock_spi::Transaction::transaction_start(),
            mock_spi::Transaction::write_vec(vec![0x44, 0x02, 0x00, 0x00]),
            mock_spi::Transaction::transaction_end(),
            // gpio read and write
            mock_spi::Transaction::transaction_start(),
            mock_spi::Transaction::transfer(
                vec![0x45, 0x12, 0x00, 0x00],
                vec![0x00, 0x00, 0x34, 0x12],
            ),
            mock_spi::Transaction::transaction_end(),
            mock_spi::Transaction::transaction_start(),
            mock_spi::Transaction::write_vec(vec![0x44, 0x12, 0xef, 0xbe]),
            mock_spi::Transaction::transaction_end(),
            // gpb7 (pin 15) back to input
            mock_spi::Transaction::transaction_start(),
            mock_spi::Transaction::transfer(
                vec![0x45, 0x00, 0x00, 0x00],
                vec![0x00, 0x00, 0x00, 0x00],
            ),
            mock_spi::Transaction::transaction_end(),
            mock_spi::Transaction::transaction_start(),
            mock_spi::Transaction::write_vec(vec![0x44, 0x00, 0x00, 0x80]),
            mock_spi::Transaction::transaction_end(),
        ];
        let mut bus = mock_spi::Mock::new(&expectations);

        let mut mcp = super::Mcp23x17::new_mcp23s17(bus.clone(), 0x22).unwrap();

        assert_eq!(mcp.gpio().unwrap(), 0x1234);
        mcp.set_gpio(0xbeef).unwrap();

        let mut gpb7 = mcp.get_pin(15).unwrap();
        gpb7.set_direction(Direction::Input).unwrap();

        bus.done();
    }
}
