//! PADS_BANK0: electrical pad control for the user GPIO bank
use super::cell::RW;
use super::io_bank0::NUM_GPIOS;
use core::mem::{offset_of, size_of};

pub const GPIO_SLEWFAST_BITS: u32 = 0x0000_0001;
pub const GPIO_SCHMITT_BITS: u32 = 0x0000_0002;
pub const GPIO_PDE_BITS: u32 = 0x0000_0004;
pub const GPIO_PUE_BITS: u32 = 0x0000_0008;
pub const GPIO_DRIVE_BITS: u32 = 0x0000_0030;
/// Input enable
pub const GPIO_IE_BITS: u32 = 0x0000_0040;
/// Output disable. Has priority over the output enable from the peripherals.
pub const GPIO_OD_BITS: u32 = 0x0000_0080;

/// Value of every GPIOx pad register after reset
pub const GPIO_RESET_VALUE: u32 = 0x0000_0056;

#[repr(C)]
pub struct RegisterBlock {
    /// 0x00
    pub voltage_select: RW<u32>,
    /// 0x04 - 0x78
    pub gpio: [RW<u32>; NUM_GPIOS],
    /// 0x7c
    pub swclk: RW<u32>,
    /// 0x80
    pub swd: RW<u32>,
}

const _: () = {
    assert!(offset_of!(RegisterBlock, gpio) == 0x04);
    assert!(offset_of!(RegisterBlock, swclk) == 0x7c);
    assert!(offset_of!(RegisterBlock, swd) == 0x80);
    assert!(size_of::<RegisterBlock>() == 0x84);
};
