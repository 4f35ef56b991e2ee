//! Register map, GPIO output driver and wrap-safe timing for the RP2040
//!
//! The crate contains everything a program needs to blink the LED of a
//! Raspberry Pi Pico, either from a single busy-wait loop or as a task of a
//! preemptive scheduler:
//!
//! - [`pac`]: typed register blocks and the peripheral singleton
//! - [`gpio`]: pin configuration and atomic level changes
//! - [`timer`]: the free-running microsecond counter
//! - [`delay`]: busy-wait and task delays
//! - [`rtos`]: the task host contract and the FreeRTOS binding
//! - [`blink`]: blink patterns and the blink loop
//! - [`clock`]: reset release, crystal start-up and the timer tick
#![cfg_attr(not(test), no_std)]

pub mod blink;
pub mod board;
pub mod clock;
pub mod delay;
pub mod gpio;
pub mod pac;
pub mod prelude;
pub mod rtos;
pub mod time;
pub mod timer;

#[cfg(test)]
mod sim;

mod private {
    /// Super trait used to mark traits with an exhaustive set of
    /// implementations
    pub trait Sealed {}
}

pub(crate) use private::Sealed;
