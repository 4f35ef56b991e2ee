//! Busy-wait blinky
//!
//! Blinks the LED of a Raspberry Pi Pico at 2 Hz from a single loop, timed by
//! the free-running microsecond counter.
#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_rtt_target as _;
use rp2040_blink_hal::{
    blink::{Blinker, FixedPattern},
    board,
    clock::{self, BLINK_SUBSYSTEMS},
    delay::BusyDelay,
    gpio::Pins,
    pac,
    timer::Timer,
};
use rtt_target::{rprintln, rtt_init_print};

#[link_section = ".boot2"]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

#[entry]
fn main() -> ! {
    rtt_init_print!();
    rprintln!("-- RP2040 busy-wait blinky --");
    let mut dp = pac::Peripherals::take().unwrap();
    clock::start_subsystems(&mut dp.RESETS, BLINK_SUBSYSTEMS);
    clock::switch_ref_to_xosc(&mut dp.XOSC, &mut dp.CLOCKS, board::XOSC_CRYSTAL_FREQ);
    clock::start_tick(&mut dp.WATCHDOG, board::XOSC_CRYSTAL_FREQ).unwrap();

    let mut pins = Pins::new(dp.IO_BANK0, dp.PADS_BANK0, dp.SIO);
    let led = pins.pin(board::LED_PIN).unwrap().into_sio_output();
    let timer = Timer::new(dp.TIMER);
    rprintln!("LED on GPIO{}, timer at {} us", board::LED_PIN.num(), timer.now_u64());

    let blinker = Blinker::new(
        led,
        BusyDelay::new(timer),
        FixedPattern::square(board::BLINK_HALF_PERIOD),
    );
    match blinker.run() {
        Ok(never) => match never {},
        Err(never) => match never {},
    }
}
