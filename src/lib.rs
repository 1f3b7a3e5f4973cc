//! Register-level driver for a small family of I/O expanders: MCP23008 and
//! MCP23017 (I2C), MCP23S08 and MCP23S17 (SPI), and the PCA9554.
//!
//! Each chip driver owns its bus handle and device address.  Individual pins
//! are accessed through [`Pin`] handles obtained via `get_pin()` or
//! `split()`; every pin operation is a live read-modify-write of the owning
//! register, nothing is cached between calls.
//!
//! The driver sits inside a [`PortMutex`] so that multiple pin handles can
//! coexist while at most one register operation per driver is in flight at a
//! time.  The default mutex is [`core::cell::RefCell`] for single-context
//! use; the `std` and `critical-section` features add implementations for
//! other environments.
#![cfg_attr(not(test), no_std)]

#[cfg(feature = "std")]
extern crate std;

mod bus;
mod common;
pub mod dev;
mod mutex;
mod pin;

pub use bus::{I2cRegisters, RegisterBus, SpiRegisters};
pub use common::{Direction, Error, PortRegisters, Pull};
pub use mutex::PortMutex;
pub use pin::Pin;

pub use dev::mcp23x08::Mcp23x08;
pub use dev::mcp23x17::Mcp23x17;
pub use dev::pca9554::Pca9554;
