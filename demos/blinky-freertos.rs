//! FreeRTOS blinky
//!
//! Blinks the LED of a Raspberry Pi Pico at 2 Hz from a FreeRTOS task. The
//! task sleeps through the kernel between level changes, so the idle task runs
//! for almost the whole time.
//!
//! Needs a FreeRTOS kernel for the RP2040 built as `libfreertos.a` on the
//! linker search path, with a 1 kHz tick.
#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_rtt_target as _;
use rp2040_blink_hal::{
    blink::{Blinker, FixedPattern},
    board,
    clock::{self, BLINK_SUBSYSTEMS},
    delay::TaskDelay,
    gpio::{DynPin, Pins},
    pac,
    rtos::{freertos, freertos::FreeRtos, TaskHost, TaskParameters},
};
use rtt_target::{rprintln, rtt_init_print};

#[link_section = ".boot2"]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

#[entry]
fn main() -> ! {
    rtt_init_print!();
    rprintln!("-- RP2040 FreeRTOS blinky --");
    freertos::verify_abi().unwrap();

    let mut dp = pac::Peripherals::take().unwrap();
    clock::start_subsystems(&mut dp.RESETS, BLINK_SUBSYSTEMS);
    clock::switch_ref_to_xosc(&mut dp.XOSC, &mut dp.CLOCKS, board::XOSC_CRYSTAL_FREQ);
    clock::start_tick(&mut dp.WATCHDOG, board::XOSC_CRYSTAL_FREQ).unwrap();

    let mut pins = Pins::new(dp.IO_BANK0, dp.PADS_BANK0, dp.SIO);
    let led: DynPin = pins.pin(board::LED_PIN).unwrap().into_sio_output().into();

    let params = TaskParameters {
        name: board::BLINK_TASK_NAME,
        stack_words: board::BLINK_STACK_WORDS,
        priority: board::blink_task_priority::<FreeRtos>(),
    };
    FreeRtos
        .create_task(
            move || {
                let blinker = Blinker::new(
                    led,
                    TaskDelay::new(FreeRtos),
                    FixedPattern::square(board::BLINK_HALF_PERIOD),
                );
                if let Err(e) = blinker.run() {
                    rprintln!("blink task stopped: {:?}", e);
                }
            },
            &params,
        )
        .unwrap();
    rprintln!("starting scheduler");
    FreeRtos.start_scheduler()
}
