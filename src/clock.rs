//! Startup helpers for resets and the reference clock
//!
//! After boot most subsystems of the RP2040 are held in reset, and `clk_ref`
//! runs from the ring oscillator. [`start_subsystems`] releases the blocks a
//! program needs and [`switch_ref_to_xosc`] moves `clk_ref` to the crystal.
//!
//! The TIMER does not count `clk_ref` cycles directly. It advances once per
//! tick of the generator in the WATCHDOG block, which divides `clk_ref` by a
//! programmable cycle count. [`start_tick`] sets that count so the TIMER
//! counts microseconds.
use crate::pac::clocks::{
    CLK_REF_CTRL_SRC_BITS, CLK_REF_CTRL_SRC_LSB, CLK_REF_CTRL_SRC_VALUE_XOSC_CLKSRC,
    CLK_REF_DIV_INT_LSB,
};
use crate::pac::resets::{
    RESET_IO_BANK0_BITS, RESET_PADS_BANK0_BITS, RESET_PIO0_BITS, RESET_TIMER_BITS,
};
use crate::pac::xosc::{
    CTRL_ENABLE_BITS, CTRL_ENABLE_LSB, CTRL_ENABLE_VALUE_ENABLE, CTRL_FREQ_RANGE_BITS,
    CTRL_FREQ_RANGE_VALUE_1_15MHZ, STATUS_STABLE_BITS,
};
use crate::pac::watchdog::{TICK_CYCLES_BITS, TICK_CYCLES_LSB, TICK_ENABLE_BITS};
use crate::pac::{CLOCKS, RESETS, WATCHDOG, XOSC};
use crate::time::Hertz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// `clk_ref` can not be divided down to a 1 MHz tick
    InvalidTickSource,
}

/// Subsystems a blink program uses
pub const BLINK_SUBSYSTEMS: u32 =
    RESET_TIMER_BITS | RESET_PIO0_BITS | RESET_PADS_BANK0_BITS | RESET_IO_BANK0_BITS;

/// Release the subsystems in `mask` from reset and wait until they are out
///
/// Subsystems outside of `mask` keep their reset state.
pub fn start_subsystems(resets: &mut RESETS, mask: u32) {
    // Safety: only clears reset bits
    unsafe { resets.reset.modify(|r| r & !mask) };
    while resets.reset_done.read() & mask != mask {
        core::hint::spin_loop();
    }
}

/// XOSC startup delay in units of 256 crystal cycles, for about 1 ms
pub const fn xosc_startup_delay(crystal: Hertz) -> u32 {
    (crystal.0 / 1_000).div_ceil(256)
}

/// Start the crystal oscillator and make it the source of `clk_ref`, undivided
///
/// Blocks until the oscillator reports a stable output.
pub fn switch_ref_to_xosc(xosc: &mut XOSC, clocks: &mut CLOCKS, crystal: Hertz) {
    // Safety: frequency range, startup delay and enable use documented values
    unsafe {
        xosc.ctrl
            .modify(|r| (r & !CTRL_FREQ_RANGE_BITS) | CTRL_FREQ_RANGE_VALUE_1_15MHZ);
        xosc.startup.write(xosc_startup_delay(crystal));
        xosc.ctrl.modify(|r| {
            (r & !CTRL_ENABLE_BITS) | (CTRL_ENABLE_VALUE_ENABLE << CTRL_ENABLE_LSB)
        });
    }
    while xosc.status.read() & STATUS_STABLE_BITS == 0 {
        core::hint::spin_loop();
    }
    // Safety: the crystal is running, so it is a valid glitchless source
    unsafe {
        clocks.clk_ref_ctrl.modify(|r| {
            (r & !CLK_REF_CTRL_SRC_BITS)
                | (CLK_REF_CTRL_SRC_VALUE_XOSC_CLKSRC << CLK_REF_CTRL_SRC_LSB)
        });
        clocks.clk_ref_div.write(1 << CLK_REF_DIV_INT_LSB);
    }
}

/// `clk_ref` cycles per microsecond tick
///
/// `None` if `clk_ref` is not a whole number of MHz the tick generator can
/// divide down to 1 MHz.
pub const fn tick_cycles(clk_ref: Hertz) -> Option<u32> {
    let cycles = clk_ref.0 / 1_000_000;
    if clk_ref.0 % 1_000_000 != 0 || cycles == 0 || cycles > TICK_CYCLES_BITS {
        None
    } else {
        Some(cycles)
    }
}

/// Make the TIMER count microseconds, given the frequency of `clk_ref`
///
/// Call after [`switch_ref_to_xosc`]. Returns
/// [`ClockError::InvalidTickSource`] without touching the WATCHDOG if
/// [`tick_cycles`] rejects the frequency.
pub fn start_tick(watchdog: &mut WATCHDOG, clk_ref: Hertz) -> Result<(), ClockError> {
    let cycles = tick_cycles(clk_ref).ok_or(ClockError::InvalidTickSource)?;
    // Safety: `cycles` fits the CYCLES field
    unsafe {
        watchdog
            .tick
            .write(TICK_ENABLE_BITS | (cycles << TICK_CYCLES_LSB));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pac::resets::{RESET_ALL_BITS, RESET_IO_BANK0_BITS};
    use crate::pac::watchdog::TICK_RESET_VALUE;
    use crate::sim::SimChip;
    use crate::time::U32Ext;

    #[test]
    fn start_subsystems_only_clears_requested_bits() {
        let chip = SimChip::new();
        let mut dp = chip.peripherals();
        start_subsystems(&mut dp.RESETS, BLINK_SUBSYSTEMS);
        assert_eq!(chip.resets.reset.read(), RESET_ALL_BITS & !BLINK_SUBSYSTEMS);
        chip.settle();
        assert_eq!(
            chip.resets.reset_done.read() & BLINK_SUBSYSTEMS,
            BLINK_SUBSYSTEMS
        );
        start_subsystems(&mut dp.RESETS, RESET_IO_BANK0_BITS);
        assert_eq!(chip.resets.reset.read(), RESET_ALL_BITS & !BLINK_SUBSYSTEMS);
    }

    #[test]
    fn startup_delay_for_pico_crystal() {
        assert_eq!(xosc_startup_delay(12.mhz().into()), 47);
    }

    #[test]
    fn ref_clock_moves_to_crystal() {
        let chip = SimChip::new();
        let mut dp = chip.peripherals();
        unsafe { chip.clocks.clk_ref_ctrl.write(0x60) };
        switch_ref_to_xosc(&mut dp.XOSC, &mut dp.CLOCKS, 12.mhz().into());

        let ctrl = chip.xosc.ctrl.read();
        assert_eq!(ctrl & CTRL_FREQ_RANGE_BITS, CTRL_FREQ_RANGE_VALUE_1_15MHZ);
        assert_eq!(
            (ctrl & CTRL_ENABLE_BITS) >> CTRL_ENABLE_LSB,
            CTRL_ENABLE_VALUE_ENABLE
        );
        assert_eq!(chip.xosc.startup.read(), 47);
        assert_eq!(chip.clocks.clk_ref_ctrl.read(), 0x60 | 2);
        assert_eq!(chip.clocks.clk_ref_div.read(), 0x100);
    }

    #[test]
    fn tick_divides_crystal_down_to_one_mhz() {
        let chip = SimChip::new();
        let mut dp = chip.peripherals();
        assert_eq!(chip.watchdog.tick.read(), TICK_RESET_VALUE);
        assert_eq!(start_tick(&mut dp.WATCHDOG, 12.mhz().into()), Ok(()));
        assert_eq!(chip.watchdog.tick.read(), TICK_ENABLE_BITS | 12);
    }

    #[test]
    fn tick_rejects_unusable_frequencies() {
        assert_eq!(tick_cycles(48.mhz().into()), Some(48));
        assert_eq!(tick_cycles(Hertz(12_500_000)), None);
        assert_eq!(tick_cycles(Hertz(500_000)), None);
        assert_eq!(tick_cycles(Hertz(512_000_000)), None);

        let chip = SimChip::new();
        let mut dp = chip.peripherals();
        assert_eq!(
            start_tick(&mut dp.WATCHDOG, Hertz(32_768)),
            Err(ClockError::InvalidTickSource)
        );
        assert_eq!(chip.watchdog.tick.read(), TICK_RESET_VALUE);
    }
}
