//! RESETS: subsystem reset control
use super::cell::{RO, RW};
use core::mem::{offset_of, size_of};

pub const RESET_IO_BANK0_BITS: u32 = 0x0000_0020;
pub const RESET_PADS_BANK0_BITS: u32 = 0x0000_0100;
pub const RESET_PIO0_BITS: u32 = 0x0000_0400;
pub const RESET_TIMER_BITS: u32 = 0x0020_0000;
/// Every implemented reset bit
pub const RESET_ALL_BITS: u32 = 0x01ff_ffff;

#[repr(C)]
pub struct RegisterBlock {
    /// 0x00 - a set bit holds the subsystem in reset
    pub reset: RW<u32>,
    /// 0x04
    pub wdsel: RW<u32>,
    /// 0x08 - a set bit means the subsystem has left reset
    pub reset_done: RO<u32>,
}

const _: () = {
    assert!(offset_of!(RegisterBlock, reset_done) == 0x08);
    assert!(size_of::<RegisterBlock>() == 0x0c);
};
