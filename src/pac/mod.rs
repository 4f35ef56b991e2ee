//! # Register map
//!
//! Typed views onto the RP2040 register blocks used by this crate. Each block
//! is a `#[repr(C)]` `RegisterBlock` made of [`RO`](cell::RO),
//! [`WO`](cell::WO) and [`RW`](cell::RW) cells, with its offsets checked
//! against the datasheet at compile time.
//!
//! A block is reached through an owned handle such as [`SIO`] which
//! dereferences to the block. The handles for the real hardware are obtained
//! once through [`Peripherals::take`] and then moved into the drivers that own
//! them, the same way an svd2rust PAC hands them out.
//!
//! Each handle can also be created from an arbitrary pointer with
//! [`SIO::from_ptr`] and friends. This is how a simulated register backing
//! store replaces the hardware in the unit tests.
use core::cell::Cell;
use cortex_m::interrupt::{self, Mutex};
use paste::paste;

pub mod cell;
pub mod clocks;
pub mod io_bank0;
pub mod pads_bank0;
pub mod resets;
pub mod sio;
pub mod timer;
pub mod watchdog;
pub mod xosc;

static TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

/// Mark the peripherals as taken. `false` if they already were.
#[inline]
fn claim(taken: &Cell<bool>) -> bool {
    !taken.replace(true)
}

macro_rules! peripherals {
    ($($(#[$attr:meta])* $NAME:ident: $base:literal,)+) => {
        paste! {
            $(
                $(#[$attr])*
                #[allow(non_camel_case_types)]
                pub struct $NAME {
                    ptr: *const [<$NAME:lower>]::RegisterBlock,
                }

                // The handle is the only way to reach the block, and it is not `Clone`
                unsafe impl Send for $NAME {}

                impl $NAME {
                    /// Physical base address of the register block
                    pub const PTR: *const [<$NAME:lower>]::RegisterBlock = $base as usize as *const _;

                    /// Create a handle for the register block located at `ptr`
                    ///
                    /// # Safety
                    ///
                    /// `ptr` must point to a register block, real or simulated, which stays
                    /// valid for the rest of the program. No other handle to the same
                    /// block may exist at the same time.
                    #[inline]
                    pub const unsafe fn from_ptr(ptr: *const [<$NAME:lower>]::RegisterBlock) -> Self {
                        Self { ptr }
                    }

                    /// Address of the block this handle points to
                    #[inline(always)]
                    pub fn ptr(&self) -> *const [<$NAME:lower>]::RegisterBlock {
                        self.ptr
                    }
                }

                impl core::ops::Deref for $NAME {
                    type Target = [<$NAME:lower>]::RegisterBlock;

                    #[inline(always)]
                    fn deref(&self) -> &Self::Target {
                        // Safety: guaranteed by the `from_ptr` contract
                        unsafe { &*self.ptr }
                    }
                }
            )+

            /// All register blocks known to this crate
            #[allow(non_snake_case)]
            pub struct Peripherals {
                $(pub $NAME: $NAME,)+
            }

            impl Peripherals {
                /// Returns all the register blocks at their physical addresses *once*
                ///
                /// The check runs with interrupts masked, which is only possible on the
                /// target. Host code creates its handles with `from_ptr` instead.
                #[inline]
                pub fn take() -> Option<Self> {
                    interrupt::free(|cs| {
                        if claim(TAKEN.borrow(cs)) {
                            Some(unsafe { Self::steal() })
                        } else {
                            None
                        }
                    })
                }

                /// Unchecked version of [`Peripherals::take`]
                ///
                /// # Safety
                ///
                /// Each returned handle must be the only one for its block.
                #[inline]
                pub unsafe fn steal() -> Self {
                    Self {
                        $($NAME: $NAME::from_ptr($NAME::PTR),)+
                    }
                }
            }
        }
    };
}

peripherals! {
    /// Pin function controller
    IO_BANK0: 0x4001_4000,
    /// Pad controller
    PADS_BANK0: 0x4001_c000,
    /// Single-cycle IO controller
    SIO: 0xd000_0000,
    /// Free-running microsecond timer
    TIMER: 0x4005_4000,
    /// Subsystem reset controller
    RESETS: 0x4000_c000,
    /// Crystal oscillator
    XOSC: 0x4002_4000,
    /// Clock generators
    CLOCKS: 0x4000_8000,
    /// Watchdog and TIMER tick generator
    WATCHDOG: 0x4005_8000,
}
