//! SIO: single-cycle IO block
//!
//! The `_set`, `_clr` and `_xor` aliases are write-only mask registers. Writing
//! a mask only affects the addressed bits of the shared register, so two
//! contexts driving different pins never need to synchronize.
use super::cell::{RO, RW, WO};
use core::mem::{offset_of, size_of};

#[repr(C)]
pub struct RegisterBlock {
    /// 0x00 - index of the core performing the read
    pub cpuid: RO<u32>,
    /// 0x04
    pub gpio_in: RO<u32>,
    /// 0x08
    pub gpio_hi_in: RO<u32>,
    _reserved0: u32,
    /// 0x10
    pub gpio_out: RW<u32>,
    /// 0x14
    pub gpio_out_set: WO<u32>,
    /// 0x18
    pub gpio_out_clr: WO<u32>,
    /// 0x1c
    pub gpio_out_xor: WO<u32>,
    /// 0x20
    pub gpio_oe: RW<u32>,
    /// 0x24
    pub gpio_oe_set: WO<u32>,
    /// 0x28
    pub gpio_oe_clr: WO<u32>,
    /// 0x2c
    pub gpio_oe_xor: WO<u32>,
    /// 0x30
    pub gpio_hi_out: RW<u32>,
    /// 0x34
    pub gpio_hi_out_set: WO<u32>,
    /// 0x38
    pub gpio_hi_out_clr: WO<u32>,
    /// 0x3c
    pub gpio_hi_out_xor: WO<u32>,
    /// 0x40
    pub gpio_hi_oe: RW<u32>,
    /// 0x44
    pub gpio_hi_oe_set: WO<u32>,
    /// 0x48
    pub gpio_hi_oe_clr: WO<u32>,
    /// 0x4c
    pub gpio_hi_oe_xor: WO<u32>,
    /// 0x50
    pub fifo_st: RW<u32>,
    /// 0x54
    pub fifo_wr: WO<u32>,
    /// 0x58
    pub fifo_rd: RO<u32>,
    /// 0x5c
    pub spinlock_st: RO<u32>,
}

const _: () = {
    assert!(offset_of!(RegisterBlock, gpio_out) == 0x10);
    assert!(offset_of!(RegisterBlock, gpio_out_set) == 0x14);
    assert!(offset_of!(RegisterBlock, gpio_out_clr) == 0x18);
    assert!(offset_of!(RegisterBlock, gpio_out_xor) == 0x1c);
    assert!(offset_of!(RegisterBlock, gpio_oe) == 0x20);
    assert!(offset_of!(RegisterBlock, gpio_oe_set) == 0x24);
    assert!(offset_of!(RegisterBlock, gpio_oe_clr) == 0x28);
    assert!(offset_of!(RegisterBlock, gpio_hi_out) == 0x30);
    assert!(offset_of!(RegisterBlock, fifo_st) == 0x50);
    assert!(offset_of!(RegisterBlock, spinlock_st) == 0x5c);
    assert!(size_of::<RegisterBlock>() == 0x60);
};
