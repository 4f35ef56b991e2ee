use super::dynpins::DynPinMode;
use super::{PinConfig, PinId};
use crate::pac::io_bank0::{self, CTRL_FUNCSEL_BITS, CTRL_FUNCSEL_LSB, FUNCSEL_NULL, FUNCSEL_SIO};
use crate::pac::pads_bank0::{self, GPIO_IE_BITS, GPIO_OD_BITS};
use crate::pac::sio;

//==================================================================================================
//  ModeFields
//==================================================================================================

/// Collect all fields needed to set the [`PinMode`](super::PinMode)
struct ModeFields {
    funcsel: u32,
    input_enable: bool,
    output_disable: bool,
    output_enable: bool,
}

impl From<DynPinMode> for ModeFields {
    #[inline]
    fn from(mode: DynPinMode) -> Self {
        match mode {
            DynPinMode::Reset => ModeFields {
                funcsel: FUNCSEL_NULL,
                input_enable: true,
                output_disable: false,
                output_enable: false,
            },
            DynPinMode::Disabled => ModeFields {
                funcsel: FUNCSEL_NULL,
                input_enable: false,
                output_disable: true,
                output_enable: false,
            },
            DynPinMode::SioInput => ModeFields {
                funcsel: FUNCSEL_SIO,
                input_enable: true,
                output_disable: false,
                output_enable: false,
            },
            DynPinMode::SioOutput => ModeFields {
                funcsel: FUNCSEL_SIO,
                input_enable: true,
                output_disable: false,
                output_enable: true,
            },
        }
    }
}

//==================================================================================================
// Register Interface
//==================================================================================================

/// The three register blocks a pin is configured and driven through
#[derive(Clone, Copy)]
pub(super) struct Banks {
    pub(super) io: *const io_bank0::RegisterBlock,
    pub(super) pads: *const pads_bank0::RegisterBlock,
    pub(super) sio: *const sio::RegisterBlock,
}

/// Provide a safe register interface for pin objects
///
/// The register handles are owned by [`Pins`](super::Pins), which is a single
/// object providing access to every pin register. Instead, we would like
/// independent objects for every pin, where each pin is only allowed to
/// control its own registers. Each pin object is a singleton, so exclusive
/// access to it also guarantees exclusive access to the per-pin slots in
/// IO_BANK0 and PADS_BANK0.
///
/// The shared SIO registers are only ever accessed through their `_set`,
/// `_clr` and `_xor` aliases with the mask of this pin, or read. Those accesses
/// are single bus transactions and only need `&self`. Anything that rewrites
/// the per-pin configuration requires `&mut self`.
///
/// # Safety
///
/// Users should only implement the [`id`] and [`banks`] functions. No default
/// function implementations should be overridden. The implementing type must
/// also have "control" over the corresponding pin ID, i.e. it must guarantee
/// that each pin ID is a singleton, and the [`Banks`] must stay valid for the
/// lifetime of the implementer.
///
/// [`id`]: Self::id
/// [`banks`]: Self::banks
pub(super) unsafe trait RegisterInterface {
    /// Provide a [`PinId`] identifying the set of registers controlled by
    /// this type.
    fn id(&self) -> PinId;

    fn banks(&self) -> &Banks;

    #[inline]
    fn io_bank0(&self) -> &io_bank0::RegisterBlock {
        unsafe { &*self.banks().io }
    }

    #[inline]
    fn pads_bank0(&self) -> &pads_bank0::RegisterBlock {
        unsafe { &*self.banks().pads }
    }

    #[inline]
    fn sio(&self) -> &sio::RegisterBlock {
        unsafe { &*self.banks().sio }
    }

    #[inline(always)]
    fn index(&self) -> usize {
        let num = self.id().num() as usize;
        debug_assert!(num < io_bank0::NUM_GPIOS);
        num
    }

    #[inline]
    fn mask_32(&self) -> u32 {
        self.id().mask()
    }

    /// Change the pin mode
    ///
    /// The steps are not atomic with respect to each other. They are safe
    /// because `&mut self` proves nobody else can reach this pin meanwhile.
    #[inline]
    fn change_mode(&mut self, mode: DynPinMode) {
        let ModeFields {
            funcsel,
            input_enable,
            output_disable,
            output_enable,
        } = mode.into();
        let num = self.index();
        let mask = self.mask_32();
        let (io, pads, sio) = (self.io_bank0(), self.pads_bank0(), self.sio());
        // Safety: Only the slots and bits of this pin ID are written
        unsafe {
            // Pad enables, keeping drive strength, pulls and slew untouched
            pads.gpio[num].modify(|r| {
                let mut r = r & !(GPIO_IE_BITS | GPIO_OD_BITS);
                if input_enable {
                    r |= GPIO_IE_BITS;
                }
                if output_disable {
                    r |= GPIO_OD_BITS;
                }
                r
            });
            // Zero all fields apart from FUNCSEL: overrides and interrupt
            // routing of a previous owner are dropped
            io.gpio[num]
                .ctrl
                .write((funcsel << CTRL_FUNCSEL_LSB) & CTRL_FUNCSEL_BITS);
            if output_enable {
                sio.gpio_out_clr.write(mask);
                sio.gpio_oe_set.write(mask);
            } else {
                sio.gpio_oe_clr.write(mask);
            }
        }
    }

    /// Read back the configuration of this pin from the hardware
    fn config(&self) -> PinConfig {
        let num = self.index();
        let mask = self.mask_32();
        let pad = self.pads_bank0().gpio[num].read();
        let ctrl = self.io_bank0().gpio[num].ctrl.read();
        PinConfig {
            funcsel: (ctrl & CTRL_FUNCSEL_BITS) >> CTRL_FUNCSEL_LSB,
            input_enable: pad & GPIO_IE_BITS != 0,
            output_disable: pad & GPIO_OD_BITS != 0,
            output_enable: self.sio().gpio_oe.read() & mask != 0,
            output_level: self.sio().gpio_out.read() & mask != 0,
        }
    }

    /// Read the logic level at the pad
    #[inline]
    fn read_pin(&self) -> bool {
        self.sio().gpio_in.read() & self.mask_32() != 0
    }

    /// Read the level SIO is driving
    #[inline]
    fn read_out(&self) -> bool {
        self.sio().gpio_out.read() & self.mask_32() != 0
    }

    /// Write the logic level of an output pin
    #[inline]
    fn write_pin(&self, bit: bool) {
        let sio = self.sio();
        let mask = self.mask_32();
        // Safety: GPIO_OUT_SET and GPIO_OUT_CLR are "mask" registers, and we
        // only write the bit for this pin ID
        unsafe {
            if bit {
                sio.gpio_out_set.write(mask);
            } else {
                sio.gpio_out_clr.write(mask);
            }
        }
    }

    /// Toggle the logic level of an output pin
    #[inline]
    fn toggle(&self) {
        // Safety: GPIO_OUT_XOR is a "mask" register, and we only write the bit
        // for this pin ID
        unsafe { self.sio().gpio_out_xor.write(self.mask_32()) };
    }
}
