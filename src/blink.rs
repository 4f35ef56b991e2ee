//! Blink sequencer
//!
//! A [`Blinker`] drives one output pin through the endless cycle
//!
//! ```text
//! Off --set high--> On --delay on--> OnExpired --set low, delay off--> Off
//! ```
//!
//! The durations of each cycle come from a [`BlinkSequence`]. The loop is
//! generic over the pin and the delay, so the same code runs as a busy-wait
//! loop with [`BusyDelay`](crate::delay::BusyDelay) or as a task with
//! [`TaskDelay`](crate::delay::TaskDelay).
use crate::time::MilliSeconds;
use core::convert::Infallible;
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

/// Source of `(on, off)` durations, asked once per cycle
pub trait BlinkSequence {
    fn next_durations(&mut self) -> (MilliSeconds, MilliSeconds);
}

impl<S: BlinkSequence + ?Sized> BlinkSequence for &mut S {
    #[inline]
    fn next_durations(&mut self) -> (MilliSeconds, MilliSeconds) {
        (**self).next_durations()
    }
}

/// The same on and off time for every cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedPattern {
    on: MilliSeconds,
    off: MilliSeconds,
}

impl FixedPattern {
    pub const fn new(on: MilliSeconds, off: MilliSeconds) -> Self {
        FixedPattern { on, off }
    }

    /// Equal on and off time, `half_period` each
    pub const fn square(half_period: MilliSeconds) -> Self {
        Self::new(half_period, half_period)
    }
}

impl BlinkSequence for FixedPattern {
    #[inline]
    fn next_durations(&mut self) -> (MilliSeconds, MilliSeconds) {
        (self.on, self.off)
    }
}

/// On-times of the dimming pattern in milliseconds
pub const DIM_LEVELS: [u32; 10] = [0, 0, 1, 2, 4, 10, 10, 4, 2, 1];
/// Length of one dimming cycle in milliseconds
pub const DIM_PERIOD_MS: u32 = 10;
/// Cycles spent on each entry of [`DIM_LEVELS`]
pub const DIM_REPEAT: u32 = 10;

/// Software PWM fading the LED in and out
///
/// Each level of [`DIM_LEVELS`] is held for [`DIM_REPEAT`] cycles of
/// [`DIM_PERIOD_MS`], with the level as on-time. The whole pattern repeats
/// after one second.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DimPattern {
    index: usize,
    repeat: u32,
}

impl DimPattern {
    pub const fn new() -> Self {
        DimPattern {
            index: 0,
            repeat: 0,
        }
    }
}

impl BlinkSequence for DimPattern {
    fn next_durations(&mut self) -> (MilliSeconds, MilliSeconds) {
        let on = DIM_LEVELS[self.index];
        self.repeat += 1;
        if self.repeat == DIM_REPEAT {
            self.repeat = 0;
            self.index = (self.index + 1) % DIM_LEVELS.len();
        }
        (MilliSeconds(on), MilliSeconds(DIM_PERIOD_MS - on))
    }
}

/// Position of a [`Blinker`] within its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkState {
    /// Pin low, off-time elapsed. Initial state.
    Off,
    /// Pin high, on-time running
    On,
    /// Pin high, on-time elapsed
    OnExpired,
}

pub struct Blinker<P, D, S> {
    pin: P,
    delay: D,
    sequence: S,
    state: BlinkState,
    current: (MilliSeconds, MilliSeconds),
    cycles: u32,
}

impl<P, D, S> Blinker<P, D, S>
where
    P: OutputPin,
    D: DelayMs<u32>,
    S: BlinkSequence,
{
    /// The pin is expected to be low, which is what configuring an output does
    pub fn new(pin: P, delay: D, sequence: S) -> Self {
        Blinker {
            pin,
            delay,
            sequence,
            state: BlinkState::Off,
            current: (MilliSeconds(0), MilliSeconds(0)),
            cycles: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> BlinkState {
        self.state
    }

    /// Completed cycles, wrapping
    #[inline]
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Perform one transition of the cycle and return the new state
    pub fn step(&mut self) -> Result<BlinkState, P::Error> {
        self.state = match self.state {
            BlinkState::Off => {
                self.current = self.sequence.next_durations();
                self.pin.set_high()?;
                BlinkState::On
            }
            BlinkState::On => {
                self.delay.delay_ms(self.current.0 .0);
                BlinkState::OnExpired
            }
            BlinkState::OnExpired => {
                self.pin.set_low()?;
                self.delay.delay_ms(self.current.1 .0);
                self.cycles = self.cycles.wrapping_add(1);
                BlinkState::Off
            }
        };
        Ok(self.state)
    }

    /// Run transitions until the next cycle is complete
    pub fn cycle(&mut self) -> Result<(), P::Error> {
        while self.step()? != BlinkState::Off {}
        Ok(())
    }

    /// Blink forever. Only returns if driving the pin fails.
    pub fn run(mut self) -> Result<Infallible, P::Error> {
        loop {
            self.cycle()?;
        }
    }

    pub fn free(self) -> (P, D, S) {
        (self.pin, self.delay, self.sequence)
    }
}
