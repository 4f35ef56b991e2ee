//! API for the free-running microsecond timer
//!
//! The TIMER block counts microseconds in a 64-bit counter. [`Timer::now`]
//! samples its low word, which wraps every 2^32 us (about 71.6 minutes). The
//! only way to compare two samples is [`Instant::ticks_since`], which is
//! correct modulo 2^32. A single wrap between the two samples is therefore
//! harmless. Intervals have to stay well below the wrap period.
//!
//! ## Examples
//!
//! - Busy-wait blinky using the timer: `demos/blinky.rs`
use crate::pac::TIMER;
use crate::time::MicroSeconds;
use embedded_hal::timer::{Cancel, CountDown, Periodic};
use void::Void;

//==================================================================================================
//  Instant
//==================================================================================================

/// A sample of the low word of the microsecond counter
///
/// Deliberately not `PartialOrd`: after a wrap, a later sample can have a
/// smaller value. Use [`Instant::ticks_since`] instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant(u32);

impl Instant {
    #[inline]
    pub const fn from_ticks(ticks: u32) -> Self {
        Self(ticks)
    }

    #[inline]
    pub const fn ticks(self) -> u32 {
        self.0
    }

    /// Microseconds from `earlier` to `self`, modulo 2^32
    #[inline]
    pub const fn ticks_since(self, earlier: Instant) -> MicroSeconds {
        MicroSeconds(self.0.wrapping_sub(earlier.0))
    }

    /// The sample `duration` after `self`, modulo 2^32
    #[inline]
    pub const fn wrapping_add(self, duration: MicroSeconds) -> Instant {
        Instant(self.0.wrapping_add(duration.0))
    }
}

//==================================================================================================
//  Monotonic
//==================================================================================================

/// A source of [`Instant`]s advancing at one tick per microsecond
pub trait Monotonic {
    /// Sample the counter. Must not have side effects.
    fn now(&self) -> Instant;

    /// Microseconds since `start`, correct across one wraparound
    #[inline]
    fn elapsed(&self, start: Instant) -> MicroSeconds {
        self.now().ticks_since(start)
    }
}

impl<M: Monotonic + ?Sized> Monotonic for &M {
    #[inline]
    fn now(&self) -> Instant {
        (**self).now()
    }
}

//==================================================================================================
//  Timer
//==================================================================================================

/// Read-only view onto the TIMER block
///
/// The counter runs as soon as the TIMER subsystem is out of reset, see
/// [`clock::start_subsystems`](crate::clock::start_subsystems). Nothing is
/// written to the block.
pub struct Timer {
    timer: TIMER,
}

impl Timer {
    pub fn new(timer: TIMER) -> Self {
        Timer { timer }
    }

    /// Single read of TIMERAWL
    #[inline]
    pub fn now(&self) -> Instant {
        Instant(self.timer.timerawl.read())
    }

    /// Full 64-bit counter value
    ///
    /// Uses the raw registers, so it does not disturb the TIMEHR latch other
    /// readers may rely on. The high word is read again after the low word, and
    /// the low word is re-sampled if a carry happened in between.
    pub fn now_u64(&self) -> u64 {
        let mut hi = self.timer.timerawh.read();
        loop {
            let lo = self.timer.timerawl.read();
            let next_hi = self.timer.timerawh.read();
            if next_hi == hi {
                return (u64::from(hi) << 32) | u64::from(lo);
            }
            hi = next_hi;
        }
    }

    /// Release the TIMER block
    pub fn free(self) -> TIMER {
        self.timer
    }
}

impl Monotonic for Timer {
    #[inline]
    fn now(&self) -> Instant {
        Timer::now(self)
    }
}

//==================================================================================================
//  CountDownTimer
//==================================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// The count down was not running
    Canceled,
}

/// Periodic count down on top of any [`Monotonic`] source
///
/// The counter is free-running, so a count down never writes a register. Each
/// expiry re-arms the count down one period after the previous deadline, which
/// keeps a periodic loop free of drift.
pub struct CountDownTimer<M> {
    clock: M,
    start: Instant,
    period: Option<MicroSeconds>,
}

impl<M: Monotonic> CountDownTimer<M> {
    pub fn new(clock: M) -> Self {
        let start = clock.now();
        CountDownTimer {
            clock,
            start,
            period: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.period.is_some()
    }

    pub fn release(self) -> M {
        self.clock
    }
}

impl<M: Monotonic> CountDown for CountDownTimer<M> {
    type Time = MicroSeconds;

    fn start<T>(&mut self, timeout: T)
    where
        T: Into<MicroSeconds>,
    {
        self.start = self.clock.now();
        self.period = Some(timeout.into());
    }

    /// Return `Ok` once the period has elapsed and re-arm for the next one.
    /// A count down that was never started or was canceled never expires.
    fn wait(&mut self) -> nb::Result<(), Void> {
        match self.period {
            Some(period) if self.clock.elapsed(self.start) >= period => {
                self.start = self.start.wrapping_add(period);
                Ok(())
            }
            _ => Err(nb::Error::WouldBlock),
        }
    }
}

impl<M: Monotonic> Periodic for CountDownTimer<M> {}

impl<M: Monotonic> Cancel for CountDownTimer<M> {
    type Error = TimerError;

    fn cancel(&mut self) -> Result<(), Self::Error> {
        match self.period.take() {
            Some(_) => Ok(()),
            None => Err(TimerError::Canceled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimChip;
    use crate::time::U32Ext;

    #[test]
    fn elapsed_across_wraparound() {
        let start = Instant::from_ticks(0xFFFF_FFF0);
        let now = Instant::from_ticks(0x0000_0010);
        assert_eq!(now.ticks_since(start), MicroSeconds(32));
        assert_eq!(start.wrapping_add(32.us()), now);
    }

    #[test]
    fn timer_reads_raw_low_word() {
        let chip = SimChip::new();
        let timer = Timer::new(chip.peripherals().TIMER);
        chip.set_counter(0xFFFF_FFF0);
        let start = timer.now();
        chip.set_counter(0x1_0000_0010);
        assert_eq!(timer.now(), Instant::from_ticks(0x10));
        assert_eq!(timer.elapsed(start), 32.us());
        assert_eq!(timer.now_u64(), 0x1_0000_0010);
    }

    #[test]
    fn sampling_writes_nothing() {
        let chip = SimChip::new();
        let timer = Timer::new(chip.peripherals().TIMER);
        chip.set_counter(1234);
        let before = chip.snapshot();
        let _ = timer.now();
        let _ = timer.now_u64();
        assert_eq!(chip.snapshot(), before);
    }

    #[test]
    fn count_down_is_periodic() {
        let chip = SimChip::new();
        let mut count_down = CountDownTimer::new(Timer::new(chip.peripherals().TIMER));
        assert_eq!(count_down.wait(), Err(nb::Error::WouldBlock));

        chip.set_counter(1_000);
        count_down.start(500.us());
        chip.set_counter(1_499);
        assert_eq!(count_down.wait(), Err(nb::Error::WouldBlock));
        chip.set_counter(1_500);
        assert_eq!(count_down.wait(), Ok(()));
        assert_eq!(count_down.wait(), Err(nb::Error::WouldBlock));
        // Late poll: the next deadline stays at 2_000
        chip.set_counter(2_100);
        assert_eq!(count_down.wait(), Ok(()));
        chip.set_counter(2_499);
        assert_eq!(count_down.wait(), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn count_down_from_milliseconds_and_cancel() {
        let chip = SimChip::new();
        let mut count_down = CountDownTimer::new(Timer::new(chip.peripherals().TIMER));
        chip.set_counter(u64::from(u32::MAX) - 100);
        count_down.start(2.ms());
        chip.set_counter(u64::from(u32::MAX) + 1_900);
        assert_eq!(count_down.wait(), Ok(()));
        assert!(count_down.is_running());
        assert_eq!(count_down.cancel(), Ok(()));
        assert_eq!(count_down.cancel(), Err(TimerError::Canceled));
        assert_eq!(count_down.wait(), Err(nb::Error::WouldBlock));
    }
}
