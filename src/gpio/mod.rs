//! # GPIO module
//!
//! The implementation of this GPIO module follows the structure of the
//! [ATSAMD HAL implementation](https://docs.rs/atsamd-hal/0.13.0/atsamd_hal/gpio/v2/index.html),
//! reduced to what a single-cycle IO output needs.
//!
//! This API provides two different submodules, [`pins`] and [`dynpins`],
//! representing two different ways to handle GPIO pins. The default, [`pins`],
//! tracks the mode of each pin at compile-time. The alternative, [`dynpins`],
//! is a type-erased, value-level API that tracks the mode at run-time and is
//! handy when a pin has to be moved into a task context.
//!
//! Pins are handed out by [`Pins`], which owns the IO_BANK0, PADS_BANK0 and
//! SIO register blocks. Every pin can be taken exactly once, so there is a
//! single owner for the configuration registers of each pin.
//!
//! Changing the mode of a pin consumes it, which makes configuration an
//! exclusive operation. Setting the output level only needs `&self`: it is a
//! single store to one of the SIO mask registers and never disturbs any other
//! pin.
//!
//! ## Examples
//!
//! - Blinky example: `demos/blinky.rs`
use crate::pac::io_bank0::{FUNCSEL_NULL, FUNCSEL_SIO, NUM_GPIOS};

pub mod dynpins;
pub use dynpins::*;

pub mod pins;
pub use pins::*;

mod reg;

//==================================================================================================
//  Errors and Definitions
//==================================================================================================

/// GPIO error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number is not implemented by the user bank
    InvalidPin,
    /// The pin was already handed out by [`Pins::pin`]
    AlreadyTaken,
    /// The pin did not have the correct mode for the requested operation.
    /// [`DynPin`]s are not tracked and verified at compile-time, so run-time
    /// operations are fallible.
    InvalidPinType,
}

/// Checked index of a user bank GPIO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(u8);

impl PinId {
    /// Returns [`PinError::InvalidPin`] if `num` is not below [`NUM_GPIOS`]
    pub const fn new(num: u8) -> Result<Self, PinError> {
        if (num as usize) < NUM_GPIOS {
            Ok(Self(num))
        } else {
            Err(PinError::InvalidPin)
        }
    }

    #[inline(always)]
    pub const fn num(self) -> u8 {
        self.0
    }

    /// Bit of this pin in the SIO registers
    #[inline(always)]
    pub const fn mask(self) -> u32 {
        1 << self.0
    }
}

/// Values of the GPIOx_CTRL.FUNCSEL field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FunctionSelect {
    Spi = 1,
    Uart = 2,
    I2c = 3,
    Pwm = 4,
    Sio = FUNCSEL_SIO as isize,
    Pio0 = 6,
    Pio1 = 7,
    Clock = 8,
    Usb = 9,
    Null = FUNCSEL_NULL as isize,
}

impl FunctionSelect {
    /// Decode the FUNCSEL field. Codes without a function map to `None`.
    pub fn from_bits(bits: u32) -> Option<Self> {
        use FunctionSelect::*;
        Some(match bits {
            1 => Spi,
            2 => Uart,
            3 => I2c,
            4 => Pwm,
            FUNCSEL_SIO => Sio,
            6 => Pio0,
            7 => Pio1,
            8 => Clock,
            9 => Usb,
            FUNCSEL_NULL => Null,
            _ => return None,
        })
    }
}

/// Configuration of one pin as currently held by the hardware
///
/// This is a snapshot read through the register blocks, nothing is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// Raw FUNCSEL code
    pub funcsel: u32,
    /// Pad input enable
    pub input_enable: bool,
    /// Pad output disable
    pub output_disable: bool,
    /// SIO output enable
    pub output_enable: bool,
    /// Level driven by SIO when the output is enabled
    pub output_level: bool,
}

impl PinConfig {
    pub fn function(&self) -> Option<FunctionSelect> {
        FunctionSelect::from_bits(self.funcsel)
    }
}
