//! XOSC: crystal oscillator
use super::cell::RW;
use core::mem::{offset_of, size_of};

pub const CTRL_FREQ_RANGE_BITS: u32 = 0x0000_0fff;
pub const CTRL_FREQ_RANGE_VALUE_1_15MHZ: u32 = 0xaa0;
pub const CTRL_ENABLE_LSB: u32 = 12;
pub const CTRL_ENABLE_BITS: u32 = 0x00ff_f000;
pub const CTRL_ENABLE_VALUE_ENABLE: u32 = 0xfab;
pub const CTRL_ENABLE_VALUE_DISABLE: u32 = 0xd1e;
pub const STATUS_STABLE_BITS: u32 = 0x8000_0000;

#[repr(C)]
pub struct RegisterBlock {
    /// 0x00
    pub ctrl: RW<u32>,
    /// 0x04
    pub status: RW<u32>,
    /// 0x08
    pub dormant: RW<u32>,
    /// 0x0c - startup delay in units of 256 crystal cycles
    pub startup: RW<u32>,
    _reserved0: [u32; 3],
    /// 0x1c
    pub count: RW<u32>,
}

const _: () = {
    assert!(offset_of!(RegisterBlock, startup) == 0x0c);
    assert!(offset_of!(RegisterBlock, count) == 0x1c);
    assert!(size_of::<RegisterBlock>() == 0x20);
};
