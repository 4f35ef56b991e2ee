//! Dimming blinky using only the register map
//!
//! Fades the LED of a Raspberry Pi Pico in and out with a software PWM. Every
//! register access is spelled out, no driver of the crate is involved.
#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;
use rp2040_blink_hal::blink::{DIM_LEVELS, DIM_PERIOD_MS, DIM_REPEAT};
use rp2040_blink_hal::pac::{self, io_bank0, pads_bank0, resets, watchdog, xosc};

const LED: usize = 25;
const LED_MASK: u32 = 1 << LED;

fn sleep_ms(timer: &pac::TIMER, ms: u32) {
    let start = timer.timerawl.read();
    while timer.timerawl.read().wrapping_sub(start) < ms * 1_000 {}
}

#[link_section = ".boot2"]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();
    let mask = resets::RESET_TIMER_BITS
        | resets::RESET_PIO0_BITS
        | resets::RESET_PADS_BANK0_BITS
        | resets::RESET_IO_BANK0_BITS;
    unsafe {
        dp.RESETS.reset.modify(|r| r & !mask);
        while dp.RESETS.reset_done.read() & mask != mask {}

        dp.XOSC.ctrl.modify(|r| {
            (r & !xosc::CTRL_ENABLE_BITS)
                | (xosc::CTRL_ENABLE_VALUE_ENABLE << xosc::CTRL_ENABLE_LSB)
        });
        while dp.XOSC.status.read() & xosc::STATUS_STABLE_BITS == 0 {}
        dp.CLOCKS.clk_ref_ctrl.modify(|r| {
            (r & !pac::clocks::CLK_REF_CTRL_SRC_BITS)
                | pac::clocks::CLK_REF_CTRL_SRC_VALUE_XOSC_CLKSRC
        });
        dp.CLOCKS
            .clk_ref_div
            .write(1 << pac::clocks::CLK_REF_DIV_INT_LSB);
        // 12 MHz crystal, 12 cycles per microsecond
        dp.WATCHDOG.tick.write(watchdog::TICK_ENABLE_BITS | 12);

        dp.PADS_BANK0.gpio[LED].modify(|r| {
            (r & !(pads_bank0::GPIO_IE_BITS | pads_bank0::GPIO_OD_BITS)) | pads_bank0::GPIO_IE_BITS
        });
        dp.IO_BANK0.gpio[LED]
            .ctrl
            .write(io_bank0::FUNCSEL_SIO << io_bank0::CTRL_FUNCSEL_LSB);
        dp.SIO.gpio_out_clr.write(LED_MASK);
        dp.SIO.gpio_oe_set.write(LED_MASK);
    }

    loop {
        for level in DIM_LEVELS {
            for _ in 0..DIM_REPEAT {
                unsafe { dp.SIO.gpio_out_set.write(LED_MASK) };
                sleep_ms(&dp.TIMER, level);
                unsafe { dp.SIO.gpio_out_clr.write(LED_MASK) };
                sleep_ms(&dp.TIMER, DIM_PERIOD_MS - level);
            }
        }
    }
}
