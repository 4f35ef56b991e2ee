//! # Pins with a run-time mode
//!
//! [`Pin<M>`](super::Pin) carries its mode in the type, which is what startup
//! code wants. A task entry or a table of LEDs wants one type for every pin,
//! so [`DynPin`] stores the [`PinId`] and a [`DynPinMode`] as plain values and
//! checks the mode on every operation instead. Level changes on a pin that is
//! not an SIO output fail with [`PinError::InvalidPinType`].
//!
//! A [`DynPin`] only comes out of a [`Pin`](super::Pin) through
//! [`From`]/[`Into`], so the one-owner-per-pin rule of
//! [`Pins`](super::Pins) still holds.
//!
//! ```ignore
//! let pin: DynPin = pins.pin(board::LED_PIN)?.into();
//! let mut pin = pin;
//! pin.into_sio_output();
//! ```
//!
//! [`TryFrom`] turns it back into a typed pin if the mode matches.
use super::pins::{Pin, PinMode};
use super::reg::{Banks, RegisterInterface};
use super::{PinConfig, PinError, PinId};
use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};

//==================================================================================================
//  DynPinMode
//==================================================================================================

/// Value-level `enum` representing pin modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DynPinMode {
    Reset,
    Disabled,
    SioInput,
    SioOutput,
}

/// Value-level variant of [`DynPinMode`] for a pin as it comes out of reset
pub const DYN_RESET: DynPinMode = DynPinMode::Reset;
/// Value-level variant of [`DynPinMode`] for the disabled mode
pub const DYN_DISABLED: DynPinMode = DynPinMode::Disabled;
/// Value-level variant of [`DynPinMode`] for an SIO input
pub const DYN_SIO_INPUT: DynPinMode = DynPinMode::SioInput;
/// Value-level variant of [`DynPinMode`] for an SIO push-pull output
pub const DYN_SIO_OUTPUT: DynPinMode = DynPinMode::SioOutput;

//==================================================================================================
//  DynRegisters
//==================================================================================================

/// Provide a safe register interface for [`DynPin`]s
struct DynRegisters {
    id: PinId,
    banks: Banks,
}

// [`DynRegisters`] takes ownership of the [`PinId`], and [`DynPin`]s can only
// be created from type-level [`Pin`]s, which are singletons.
unsafe impl RegisterInterface for DynRegisters {
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
//  DynPin
//==================================================================================================

/// A value-level pin, parameterized by [`PinId`] and [`DynPinMode`]
///
/// This type acts as a type-erased version of [`Pin`]. Every pin is
/// represented by the same type, and pins are tracked and distinguished at
/// run-time.
pub struct DynPin {
    regs: DynRegisters,
    mode: DynPinMode,
}

// Same reasoning as for the type-level pins
unsafe impl Send for DynPin {}
unsafe impl Sync for DynPin {}

impl DynPin {
    /// Return a copy of the pin ID
    #[inline]
    pub fn id(&self) -> PinId {
        self.regs.id
    }

    /// Return a copy of the pin mode
    #[inline]
    pub fn mode(&self) -> DynPinMode {
        self.mode
    }

    /// Convert the pin to the requested [`DynPinMode`]
    #[inline]
    pub fn into_mode(&mut self, mode: DynPinMode) {
        if mode != self.mode {
            self.regs.change_mode(mode);
            self.mode = mode;
        }
    }

    #[inline]
    pub fn into_disabled(&mut self) {
        self.into_mode(DYN_DISABLED);
    }

    #[inline]
    pub fn into_sio_input(&mut self) {
        self.into_mode(DYN_SIO_INPUT);
    }

    #[inline]
    pub fn into_sio_output(&mut self) {
        self.into_mode(DYN_SIO_OUTPUT);
    }

    #[inline]
    pub fn config(&self) -> PinConfig {
        self.regs.config()
    }

    /// Drive the pin high (`true`) or low (`false`)
    #[inline]
    pub fn set_level(&self, high: bool) -> Result<(), PinError> {
        match self.mode {
            DYN_SIO_OUTPUT => {
                self.regs.write_pin(high);
                Ok(())
            }
            _ => Err(PinError::InvalidPinType),
        }
    }

    /// Invert the driven level
    #[inline]
    pub fn toggle_level(&self) -> Result<(), PinError> {
        match self.mode {
            DYN_SIO_OUTPUT => {
                self.regs.toggle();
                Ok(())
            }
            _ => Err(PinError::InvalidPinType),
        }
    }

    /// Level at the pad for an input, or the driven level for an output
    #[inline]
    pub fn level(&self) -> Result<bool, PinError> {
        match self.mode {
            DYN_SIO_INPUT => Ok(self.regs.read_pin()),
            DYN_SIO_OUTPUT => Ok(self.regs.read_out()),
            _ => Err(PinError::InvalidPinType),
        }
    }
}

//==================================================================================================
//  Convert between Pin and DynPin
//==================================================================================================

impl<M: PinMode> From<Pin<M>> for DynPin {
    /// Erase the type-level information in a [`Pin`] and return a value-level
    /// [`DynPin`]
    #[inline]
    fn from(pin: Pin<M>) -> Self {
        DynPin {
            regs: DynRegisters {
                id: pin.regs.id,
                banks: pin.regs.banks,
            },
            mode: M::DYN,
        }
    }
}

impl<M: PinMode> TryFrom<DynPin> for Pin<M> {
    type Error = PinError;

    /// Try to recreate a type-level [`Pin`] from a value-level [`DynPin`]
    ///
    /// There is no way for the compiler to know if the conversion will be
    /// successful at compile-time. We must verify the conversion at run-time
    /// or refuse to perform it.
    #[inline]
    fn try_from(pin: DynPin) -> Result<Self, PinError> {
        if pin.mode == M::DYN {
            // Safety: the `DynPin` is consumed, so the singleton moves back
            Ok(unsafe { Pin::new(pin.regs.id, pin.regs.banks) })
        } else {
            Err(PinError::InvalidPinType)
        }
    }
}

//==================================================================================================
// Embedded HAL traits
//==================================================================================================

impl OutputPin for DynPin {
    type Error = PinError;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_level(true)
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_level(false)
    }
}

impl StatefulOutputPin for DynPin {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        match self.mode {
            DYN_SIO_OUTPUT => Ok(self.regs.read_out()),
            _ => Err(PinError::InvalidPinType),
        }
    }

    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        self.is_set_high().map(|high| !high)
    }
}

impl ToggleableOutputPin for DynPin {
    type Error = PinError;

    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.toggle_level()
    }
}

impl InputPin for DynPin {
    type Error = PinError;

    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        match self.mode {
            DYN_SIO_INPUT => Ok(self.regs.read_pin()),
            _ => Err(PinError::InvalidPinType),
        }
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}
