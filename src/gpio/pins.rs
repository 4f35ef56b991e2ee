//! # Type-level module for GPIO pins
//!
//! This module provides a type-level API for GPIO pins. It uses the type system
//! to track the mode of pins at compile-time. A [`Pin`] only carries its
//! [`PinId`] and the addresses of the register blocks. Real code is generated
//! as a side effect of mode transformations, and the resulting assembly is
//! nearly identical to the equivalent, hand-written C.
//!
//! Type-level [`Pin`]s are parameterized by a [`PinMode`]. The available modes
//! are [`Reset`], [`Disabled`], [`SioInput`] and [`SioOutput`]. [`Pins`]
//! hands out every pin in [`Reset`], which matches the hardware state after
//! reset, so no register is written until the pin is converted.
//!
//! It is not possible for users to create new instances of a [`Pin`]. The
//! [`Pins`] struct takes ownership of the register blocks and hands out each
//! pin once.
//!
//! ```ignore
//! let dp = pac::Peripherals::take().unwrap();
//! let mut pins = Pins::new(dp.IO_BANK0, dp.PADS_BANK0, dp.SIO);
//! let led = pins.pin(board::LED_PIN)?.into_sio_output();
//! led.set_level(true);
//! ```
//!
//! # Embedded HAL traits
//!
//! [`Pin<SioOutput>`] implements [`OutputPin`], [`StatefulOutputPin`] and
//! [`ToggleableOutputPin`], [`Pin<SioInput>`] implements [`InputPin`], all
//! with `Error = Infallible`.
use super::dynpins::DynPinMode;
use super::reg::{Banks, RegisterInterface};
use super::{PinConfig, PinError, PinId};
use crate::pac::{IO_BANK0, PADS_BANK0, SIO};
use crate::Sealed;
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};

//==================================================================================================
//  Pin modes
//==================================================================================================

/// Type-level `enum` representing pin modes
///
/// The valid options are [`Reset`], [`Disabled`], [`SioInput`] and
/// [`SioOutput`].
pub trait PinMode: Sealed {
    /// Corresponding [`DynPinMode`]
    const DYN: DynPinMode;
}

/// Type-level variant of [`PinMode`] for a pin as it comes out of reset
///
/// No function is selected, but the pad input buffer is enabled and the
/// output is not disabled.
pub enum Reset {}

/// Type-level variant of [`PinMode`] for a pin disconnected from every
/// peripheral, with an isolated pad
pub enum Disabled {}

/// Type-level variant of [`PinMode`] for an SIO input
pub enum SioInput {}

/// Type-level variant of [`PinMode`] for an SIO push-pull output
pub enum SioOutput {}

impl Sealed for Reset {}
impl Sealed for Disabled {}
impl Sealed for SioInput {}
impl Sealed for SioOutput {}

impl PinMode for Reset {
    const DYN: DynPinMode = DynPinMode::Reset;
}
impl PinMode for Disabled {
    const DYN: DynPinMode = DynPinMode::Disabled;
}
impl PinMode for SioInput {
    const DYN: DynPinMode = DynPinMode::SioInput;
}
impl PinMode for SioOutput {
    const DYN: DynPinMode = DynPinMode::SioOutput;
}

//==================================================================================================
//  Registers
//==================================================================================================

/// Provide a safe register interface for [`Pin`]s
pub(super) struct Registers {
    pub(super) id: PinId,
    pub(super) banks: Banks,
}

// [`Registers`] takes ownership of the [`PinId`], and [`Pins`] guarantees
// that each pin is a singleton, so this implementation is safe.
unsafe impl RegisterInterface for Registers {
    #[inline]
    fn id(&self) -> PinId {
        self.id
    }

    #[inline]
    fn banks(&self) -> &Banks {
        &self.banks
    }
}

//==================================================================================================
//  Pin
//==================================================================================================

/// A type-level GPIO pin, parameterized by a [`PinMode`]
pub struct Pin<M: PinMode> {
    pub(super) regs: Registers,
    mode: PhantomData<M>,
}

// A pin is reachable from one owner only. The `&self` methods are single loads
// or single stores to mask registers, so sharing a pin between contexts cannot
// corrupt any register.
unsafe impl<M: PinMode> Send for Pin<M> {}
unsafe impl<M: PinMode> Sync for Pin<M> {}

impl<M: PinMode> Pin<M> {
    /// Create a new [`Pin`]
    ///
    /// # Safety
    ///
    /// Each [`Pin`] must be a singleton. For a given [`PinId`], there must be
    /// at most one corresponding [`Pin`] or [`DynPin`](super::DynPin) in
    /// existence at any given time. Violating this requirement is `unsafe`.
    #[inline]
    pub(super) unsafe fn new(id: PinId, banks: Banks) -> Pin<M> {
        Pin {
            regs: Registers { id, banks },
            mode: PhantomData,
        }
    }

    #[inline]
    pub fn id(&self) -> PinId {
        self.regs.id
    }

    /// Convert the pin to the requested [`PinMode`]
    #[inline]
    pub fn into_mode<N: PinMode>(mut self) -> Pin<N> {
        // Only modify registers if we are actually changing pin mode
        if N::DYN != M::DYN {
            self.regs.change_mode(N::DYN);
        }
        // Safety: `self` is consumed, so the singleton moves to the new pin
        unsafe { Pin::new(self.regs.id, self.regs.banks) }
    }

    /// Configure the pin for single-cycle IO digital output
    ///
    /// Sets the pad input enable and clears the pad output disable, selects
    /// the SIO function (every other control field of the pin is zeroed),
    /// then drives the output low and enables the output driver.
    #[inline]
    pub fn into_sio_output(self) -> Pin<SioOutput> {
        self.into_mode()
    }

    /// Configure the pin as single-cycle IO input
    #[inline]
    pub fn into_sio_input(self) -> Pin<SioInput> {
        self.into_mode()
    }

    /// Disconnect the pin from all peripherals and isolate the pad
    #[inline]
    pub fn into_disabled(self) -> Pin<Disabled> {
        self.into_mode()
    }

    /// Current hardware configuration of the pin
    #[inline]
    pub fn config(&self) -> PinConfig {
        self.regs.config()
    }
}

impl Pin<SioOutput> {
    /// Drive the pin high (`true`) or low (`false`)
    ///
    /// This is a single store to GPIO_OUT_SET or GPIO_OUT_CLR, so it is atomic
    /// and leaves every other pin untouched.
    #[inline]
    pub fn set_level(&self, high: bool) {
        self.regs.write_pin(high);
    }

    /// Invert the driven level through GPIO_OUT_XOR
    #[inline]
    pub fn toggle_level(&self) {
        self.regs.toggle();
    }

    /// Level currently driven by SIO
    #[inline]
    pub fn level(&self) -> bool {
        self.regs.read_out()
    }
}

impl Pin<SioInput> {
    /// Level currently present at the pad
    #[inline]
    pub fn level(&self) -> bool {
        self.regs.read_pin()
    }
}

//==================================================================================================
//  Pins
//==================================================================================================

/// Owner of the user bank GPIOs
///
/// Takes ownership of the register blocks and hands out every pin at most
/// once, which establishes a single owner per pin at startup.
pub struct Pins {
    io_bank0: IO_BANK0,
    pads_bank0: PADS_BANK0,
    sio: SIO,
    taken: u32,
}

impl Pins {
    pub fn new(io_bank0: IO_BANK0, pads_bank0: PADS_BANK0, sio: SIO) -> Self {
        Pins {
            io_bank0,
            pads_bank0,
            sio,
            taken: 0,
        }
    }

    /// Take the pin `id` out of the bank
    ///
    /// The pin is returned in the [`Reset`] type state without touching any
    /// register. Returns [`PinError::AlreadyTaken`] if the pin was handed out
    /// before.
    pub fn pin(&mut self, id: PinId) -> Result<Pin<Reset>, PinError> {
        if self.taken & id.mask() != 0 {
            return Err(PinError::AlreadyTaken);
        }
        self.taken |= id.mask();
        // Safety: the `taken` mask guarantees this is the only pin with `id`
        Ok(unsafe { Pin::new(id, self.banks()) })
    }

    /// Checked variant of [`Pins::pin`] taking a raw pin number
    pub fn pin_num(&mut self, num: u8) -> Result<Pin<Reset>, PinError> {
        self.pin(PinId::new(num)?)
    }

    /// Mask of the pins handed out so far
    #[inline]
    pub fn taken(&self) -> u32 {
        self.taken
    }

    /// Release the register blocks. Only possible once every pin has been
    /// handed back through [`Pins::restore`].
    pub fn free(self) -> Result<(IO_BANK0, PADS_BANK0, SIO), Self> {
        if self.taken != 0 {
            return Err(self);
        }
        Ok((self.io_bank0, self.pads_bank0, self.sio))
    }

    /// Hand a pin back to the bank
    pub fn restore<M: PinMode>(&mut self, pin: Pin<M>) {
        self.taken &= !pin.id().mask();
    }

    fn banks(&self) -> Banks {
        Banks {
            io: self.io_bank0.ptr(),
            pads: self.pads_bank0.ptr(),
            sio: self.sio.ptr(),
        }
    }
}

//==================================================================================================
//  Embedded HAL traits
//==================================================================================================

impl OutputPin for Pin<SioOutput> {
    type Error = Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.regs.write_pin(true);
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.regs.write_pin(false);
        Ok(())
    }
}

impl StatefulOutputPin for Pin<SioOutput> {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(self.regs.read_out())
    }

    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.regs.read_out())
    }
}

impl ToggleableOutputPin for Pin<SioOutput> {
    type Error = Infallible;

    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.regs.toggle();
        Ok(())
    }
}

impl InputPin for Pin<SioInput> {
    type Error = Infallible;

    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.regs.read_pin())
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.regs.read_pin())
    }
}
