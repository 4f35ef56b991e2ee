//! TIMER: 64-bit free-running microsecond counter with four alarms
use super::cell::{RO, RW, WO};
use core::mem::{offset_of, size_of};

pub const NUM_ALARMS: usize = 4;

#[repr(C)]
pub struct RegisterBlock {
    /// 0x00 - write the high word after `timelw` to load a new time
    pub timehw: WO<u32>,
    /// 0x04
    pub timelw: WO<u32>,
    /// 0x08 - latched high word, read after `timelr`
    pub timehr: RO<u32>,
    /// 0x0c - reading this latches `timehr`
    pub timelr: RO<u32>,
    /// 0x10 - 0x1c
    pub alarm: [RW<u32>; NUM_ALARMS],
    /// 0x20
    pub armed: RW<u32>,
    /// 0x24 - raw high word, no latching side effects
    pub timerawh: RO<u32>,
    /// 0x28 - raw low word, no latching side effects
    pub timerawl: RO<u32>,
    /// 0x2c
    pub dbgpause: RW<u32>,
    /// 0x30
    pub pause: RW<u32>,
    /// 0x34
    pub intr: RW<u32>,
    /// 0x38
    pub inte: RW<u32>,
    /// 0x3c
    pub intf: RW<u32>,
    /// 0x40
    pub ints: RO<u32>,
}

const _: () = {
    assert!(offset_of!(RegisterBlock, alarm) == 0x10);
    assert!(offset_of!(RegisterBlock, armed) == 0x20);
    assert!(offset_of!(RegisterBlock, timerawh) == 0x24);
    assert!(offset_of!(RegisterBlock, timerawl) == 0x28);
    assert!(offset_of!(RegisterBlock, ints) == 0x40);
    assert!(size_of::<RegisterBlock>() == 0x44);
};
