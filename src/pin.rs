use crate::common::{clear_bit, get_bit, set_bit};
use crate::{Direction, Error, PortMutex, PortRegisters, Pull};
use embedded_hal::digital;

/// A single pin of a port expander.
///
/// `Pin` is not constructed directly; obtain one from the chip driver via
/// its `get_pin()` or `split()` method.  The handle keeps no state of its
/// own: every operation reads or writes the full owning register on the
/// driver, so it is always in sync with the hardware.
///
/// Setters perform two bus transactions (read register, write register
/// back).  The driver's mutex serializes them against other pin handles of
/// the same chip, but a concurrent writer on the bus itself (another bus
/// master) can still race the read-modify-write.
pub struct Pin<'a, M> {
    index: u8,
    driver: &'a M,
}

impl<'a, M, D> Pin<'a, M>
where
    D: PortRegisters,
    M: PortMutex<Port = D>,
{
    pub(crate) fn new(index: u8, driver: &'a M) -> Self {
        assert!(index < D::PIN_COUNT);
        Self { index, driver }
    }

    /// Pin number on the chip.
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn direction(&self) -> Result<Direction, Error<D::BusError>> {
        let iodir = self.driver.lock(|drv| drv.iodir())?;
        if get_bit(iodir, self.index) {
            Ok(Direction::Input)
        } else {
            Ok(Direction::Output)
        }
    }

    pub fn set_direction(&mut self, direction: Direction) -> Result<(), Error<D::BusError>> {
        self.driver.lock(|drv| {
            let iodir = drv.iodir()?;
            let iodir = match direction {
                Direction::Input => set_bit(iodir, self.index),
                Direction::Output => clear_bit(iodir, self.index),
            };
            drv.set_iodir(iodir)
        })
    }

    /// Logic level of the pin.
    pub fn value(&self) -> Result<bool, Error<D::BusError>> {
        let gpio = self.driver.lock(|drv| drv.gpio())?;
        Ok(get_bit(gpio, self.index))
    }

    /// Drive the pin high or low.
    ///
    /// If the pin is configured as an input, the written bit has no
    /// electrical effect; the chip ignores it and no error is reported.
    pub fn set_value(&mut self, value: bool) -> Result<(), Error<D::BusError>> {
        self.driver.lock(|drv| {
            let gpio = drv.gpio()?;
            let gpio = if value {
                set_bit(gpio, self.index)
            } else {
                clear_bit(gpio, self.index)
            };
            drv.set_gpio(gpio)
        })
    }

    pub fn pull(&self) -> Result<Option<Pull>, Error<D::BusError>> {
        let gppu = self.driver.lock(|drv| drv.gppu())?;
        if get_bit(gppu, self.index) {
            Ok(Some(Pull::Up))
        } else {
            Ok(None)
        }
    }

    /// Enable or disable the internal pull-up resistor.
    ///
    /// Pull-downs do not exist anywhere in this chip family and are
    /// rejected with [`Error::UnsupportedConfiguration`], as is any pull
    /// access on a chip without a pull-up register.
    pub fn set_pull(&mut self, pull: Option<Pull>) -> Result<(), Error<D::BusError>> {
        if pull == Some(Pull::Down) {
            return Err(Error::UnsupportedConfiguration);
        }
        self.driver.lock(|drv| {
            let gppu = drv.gppu()?;
            let gppu = match pull {
                Some(Pull::Up) => set_bit(gppu, self.index),
                _ => clear_bit(gppu, self.index),
            };
            drv.set_gppu(gppu)
        })
    }

    /// Whether the input polarity of this pin is inverted.
    ///
    /// Chips without a polarity register read as not inverted.
    pub fn polarity(&self) -> Result<bool, Error<D::BusError>> {
        match self.driver.lock(|drv| drv.ipol()) {
            Ok(ipol) => Ok(get_bit(ipol, self.index)),
            Err(Error::UnsupportedConfiguration) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Enable or disable input polarity inversion.
    ///
    /// Enabling inversion on a chip without a polarity register fails with
    /// [`Error::UnsupportedConfiguration`]; disabling it there is a no-op.
    pub fn set_polarity(&mut self, invert: bool) -> Result<(), Error<D::BusError>> {
        let result = self.driver.lock(|drv| {
            let ipol = drv.ipol()?;
            let ipol = if invert {
                set_bit(ipol, self.index)
            } else {
                clear_bit(ipol, self.index)
            };
            drv.set_ipol(ipol)
        });
        match result {
            Err(Error::UnsupportedConfiguration) if !invert => Ok(()),
            other => other,
        }
    }

    /// Make the pin an output, driving it to `value` right away.
    pub fn switch_to_output(&mut self, value: bool) -> Result<(), Error<D::BusError>> {
        self.set_direction(Direction::Output)?;
        self.set_value(value)
    }

    /// Make the pin an input with the given pull-up and polarity state.
    pub fn switch_to_input(
        &mut self,
        pull: Option<Pull>,
        invert_polarity: bool,
    ) -> Result<(), Error<D::BusError>> {
        self.set_direction(Direction::Input)?;
        self.set_pull(pull)?;
        self.set_polarity(invert_polarity)
    }
}

impl<'a, M, D> digital::ErrorType for Pin<'a, M>
where
    D: PortRegisters,
    D::BusError: core::fmt::Debug,
    M: PortMutex<Port = D>,
{
    type Error = Error<D::BusError>;
}

impl<'a, M, D> digital::InputPin for Pin<'a, M>
where
    D: PortRegisters,
    D::BusError: core::fmt::Debug,
    M: PortMutex<Port = D>,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Pin::value(self)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Pin::value(self).map(|v| !v)
    }
}

impl<'a, M, D> digital::OutputPin for Pin<'a, M>
where
    D: PortRegisters,
    D::BusError: core::fmt::Debug,
    M: PortMutex<Port = D>,
{
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_value(true)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_value(false)
    }
}
