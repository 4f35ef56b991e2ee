//! CLOCKS: clock generators. Only the GPOUT generators and `clk_ref` are mapped.
use super::cell::{RO, RW};
use core::mem::{offset_of, size_of};

pub const CLK_REF_CTRL_SRC_LSB: u32 = 0;
pub const CLK_REF_CTRL_SRC_BITS: u32 = 0x0000_0003;
pub const CLK_REF_CTRL_SRC_VALUE_ROSC_CLKSRC_PH: u32 = 0x0;
pub const CLK_REF_CTRL_SRC_VALUE_CLKSRC_CLK_REF_AUX: u32 = 0x1;
pub const CLK_REF_CTRL_SRC_VALUE_XOSC_CLKSRC: u32 = 0x2;
pub const CLK_REF_DIV_INT_LSB: u32 = 8;
pub const CLK_REF_DIV_INT_BITS: u32 = 0x0000_0300;

#[repr(C)]
pub struct ClkGpout {
    pub ctrl: RW<u32>,
    pub div: RW<u32>,
    pub selected: RO<u32>,
}

#[repr(C)]
pub struct RegisterBlock {
    /// 0x00 - 0x2c
    pub clk_gpout: [ClkGpout; 4],
    /// 0x30
    pub clk_ref_ctrl: RW<u32>,
    /// 0x34
    pub clk_ref_div: RW<u32>,
    /// 0x38 - one-hot encoding of the source currently selected by the glitchless mux
    pub clk_ref_selected: RO<u32>,
}

const _: () = {
    assert!(offset_of!(RegisterBlock, clk_ref_ctrl) == 0x30);
    assert!(offset_of!(RegisterBlock, clk_ref_selected) == 0x38);
    assert!(size_of::<RegisterBlock>() == 0x3c);
};
