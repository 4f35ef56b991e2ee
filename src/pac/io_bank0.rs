//! IO_BANK0: function select and status for the user GPIO bank
use super::cell::{RO, RW};
use core::mem::{offset_of, size_of};

/// Number of GPIOs in the user bank
pub const NUM_GPIOS: usize = 30;

/// GPIOx_CTRL.FUNCSEL field
pub const CTRL_FUNCSEL_LSB: u32 = 0;
pub const CTRL_FUNCSEL_BITS: u32 = 0x0000_001f;

/// FUNCSEL value routing the pin to the single-cycle IO block
pub const FUNCSEL_SIO: u32 = 5;
/// FUNCSEL value disconnecting the pin from every peripheral (reset value)
pub const FUNCSEL_NULL: u32 = 0x1f;

/// Status and control pair of one GPIO
#[repr(C)]
pub struct Gpio {
    pub status: RO<u32>,
    pub ctrl: RW<u32>,
}

/// Interrupt enable, force and status for one processor or the dormant wake logic
#[repr(C)]
pub struct IrqCtrl {
    pub inte: [RW<u32>; 4],
    pub intf: [RW<u32>; 4],
    pub ints: [RO<u32>; 4],
}

#[repr(C)]
pub struct RegisterBlock {
    /// 0x000 - 0x0ec
    pub gpio: [Gpio; NUM_GPIOS],
    /// 0x0f0 - raw interrupts
    pub intr: [RW<u32>; 4],
    /// 0x100
    pub proc0_irq_ctrl: IrqCtrl,
    /// 0x130
    pub proc1_irq_ctrl: IrqCtrl,
    /// 0x160
    pub dormant_wake_irq_ctrl: IrqCtrl,
}

const _: () = {
    assert!(size_of::<Gpio>() == 0x8);
    assert!(offset_of!(RegisterBlock, intr) == 0xf0);
    assert!(offset_of!(RegisterBlock, proc0_irq_ctrl) == 0x100);
    assert!(offset_of!(RegisterBlock, proc1_irq_ctrl) == 0x130);
    assert!(offset_of!(RegisterBlock, dormant_wake_irq_ctrl) == 0x160);
    assert!(size_of::<RegisterBlock>() == 0x190);
};
