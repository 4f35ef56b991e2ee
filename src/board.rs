//! Raspberry Pi Pico board constants
use crate::clock::tick_cycles;
use crate::gpio::PinId;
use crate::rtos::TaskHost;
use crate::time::{Hertz, MilliSeconds};

/// GPIO of the on-board LED
pub const LED_PIN: PinId = match PinId::new(25) {
    Ok(id) => id,
    Err(_) => panic!("LED pin out of range"),
};

/// Frequency of the on-board crystal
pub const XOSC_CRYSTAL_FREQ: Hertz = Hertz(12_000_000);

const _: () = assert!(tick_cycles(XOSC_CRYSTAL_FREQ).is_some());

/// Stack of the blink task in words
pub const BLINK_STACK_WORDS: u16 = 1024;

/// Name of the blink task
pub const BLINK_TASK_NAME: &str = "led_task";

/// Half period of the blink demos, for a 2 Hz blink
pub const BLINK_HALF_PERIOD: MilliSeconds = MilliSeconds(250);

/// Priority of the blink task: the lowest one above idle
pub const fn blink_task_priority<H: TaskHost>() -> u32 {
    H::IDLE_PRIORITY + 1
}
