//! WATCHDOG: watchdog timer and the 1 us tick generator of the TIMER
use super::cell::RW;
use core::mem::{offset_of, size_of};

pub const TICK_CYCLES_LSB: u32 = 0;
/// `clk_ref` cycles per tick
pub const TICK_CYCLES_BITS: u32 = 0x0000_01ff;
pub const TICK_ENABLE_BITS: u32 = 0x0000_0200;
pub const TICK_RUNNING_BITS: u32 = 0x0000_0400;
/// Value after reset: enabled, but with a cycle count of zero
pub const TICK_RESET_VALUE: u32 = TICK_ENABLE_BITS;

#[repr(C)]
pub struct RegisterBlock {
    /// 0x00
    pub ctrl: RW<u32>,
    /// 0x04
    pub load: RW<u32>,
    /// 0x08
    pub reason: RW<u32>,
    /// 0x0c - 0x28 - kept across a watchdog reset
    pub scratch: [RW<u32>; 8],
    /// 0x2c
    pub tick: RW<u32>,
}

const _: () = {
    assert!(offset_of!(RegisterBlock, scratch) == 0x0c);
    assert!(offset_of!(RegisterBlock, tick) == 0x2c);
    assert!(size_of::<RegisterBlock>() == 0x30);
};
