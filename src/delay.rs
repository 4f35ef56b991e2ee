//! Delays
//!
//! Both implementations provide the embedded-hal [`DelayMs`] and [`DelayUs`]
//! traits, so code generic over a delay works unchanged in either deployment:
//!
//! - [`BusyDelay`] spins on a [`Monotonic`] clock. For a single execution
//!   context, nothing else runs during the wait.
//! - [`TaskDelay`] hands the wait to a [`TaskHost`]. The calling task is
//!   suspended and other tasks, at least the idle task, run meanwhile.
//!
//! Neither delay ever returns before the requested time has passed.
use crate::rtos::TaskHost;
use crate::time::MicroSeconds;
use crate::timer::Monotonic;
use embedded_hal::blocking::delay::{DelayMs, DelayUs};

/// Longest single busy wait in milliseconds. Longer requests are split into
/// chunks, each of which stays far below the 2^32 us wrap of the counter.
pub const MAX_CHUNK_MS: u32 = 1_000_000;

//==================================================================================================
//  BusyDelay
//==================================================================================================

/// Busy-wait delay on top of a [`Monotonic`] clock
pub struct BusyDelay<M> {
    clock: M,
}

impl<M: Monotonic> BusyDelay<M> {
    pub fn new(clock: M) -> Self {
        BusyDelay { clock }
    }

    /// Spin until `duration` has elapsed
    ///
    /// Returns within one poll of the deadline.
    pub fn wait(&self, duration: MicroSeconds) {
        let start = self.clock.now();
        while self.clock.elapsed(start) < duration {
            core::hint::spin_loop();
        }
    }

    pub fn free(self) -> M {
        self.clock
    }
}

impl<M: Monotonic> DelayMs<u32> for BusyDelay<M> {
    fn delay_ms(&mut self, mut ms: u32) {
        while ms > 0 {
            let chunk = ms.min(MAX_CHUNK_MS);
            self.wait(MicroSeconds(chunk * 1_000));
            ms -= chunk;
        }
    }
}

impl<M: Monotonic> DelayMs<u16> for BusyDelay<M> {
    fn delay_ms(&mut self, ms: u16) {
        self.wait(MicroSeconds(u32::from(ms) * 1_000));
    }
}

impl<M: Monotonic> DelayMs<u8> for BusyDelay<M> {
    fn delay_ms(&mut self, ms: u8) {
        self.wait(MicroSeconds(u32::from(ms) * 1_000));
    }
}

impl<M: Monotonic> DelayUs<u32> for BusyDelay<M> {
    fn delay_us(&mut self, us: u32) {
        // Split in halves so even u32::MAX stays below the wrap period
        let half = us / 2;
        self.wait(MicroSeconds(half));
        self.wait(MicroSeconds(us - half));
    }
}

impl<M: Monotonic> DelayUs<u16> for BusyDelay<M> {
    fn delay_us(&mut self, us: u16) {
        self.wait(MicroSeconds(u32::from(us)));
    }
}

impl<M: Monotonic> DelayUs<u8> for BusyDelay<M> {
    fn delay_us(&mut self, us: u8) {
        self.wait(MicroSeconds(u32::from(us)));
    }
}

//==================================================================================================
//  TaskDelay
//==================================================================================================

/// Number of host ticks to wait for at least `us` microseconds
///
/// A tick-based delay of `n` ticks can expire after only `n - 1` full tick
/// periods, because the current period is already partly over. One tick is
/// added on top of the rounded-up value to compensate. Zero stays zero, which
/// yields the processor without waiting.
///
/// The task then resumes at most one tick late if `us` is a whole number of
/// ticks. Otherwise the rounding adds up to one more tick, so it resumes less
/// than two ticks late.
pub fn ticks_for_us<H: TaskHost>(us: u64) -> u32 {
    if us == 0 {
        return 0;
    }
    let rate = u64::from(H::TICK_RATE_HZ);
    let ticks = us.saturating_mul(rate).div_ceil(1_000_000) + 1;
    // u32::MAX is "block forever" for several kernel calls
    ticks.min(u64::from(u32::MAX - 1)) as u32
}

/// Millisecond variant of [`ticks_for_us`]
#[inline]
pub fn ticks_for_ms<H: TaskHost>(ms: u32) -> u32 {
    ticks_for_us::<H>(u64::from(ms) * 1_000)
}

/// Delay that suspends the calling task through a [`TaskHost`]
///
/// Never busy-waits. Must only be used from a task created by the host.
pub struct TaskDelay<H> {
    host: H,
}

impl<H: TaskHost> TaskDelay<H> {
    pub fn new(host: H) -> Self {
        TaskDelay { host }
    }

    pub fn free(self) -> H {
        self.host
    }
}

impl<H: TaskHost> DelayMs<u32> for TaskDelay<H> {
    fn delay_ms(&mut self, ms: u32) {
        self.host.delay(ticks_for_ms::<H>(ms));
    }
}

impl<H: TaskHost> DelayMs<u16> for TaskDelay<H> {
    fn delay_ms(&mut self, ms: u16) {
        self.delay_ms(u32::from(ms));
    }
}

impl<H: TaskHost> DelayMs<u8> for TaskDelay<H> {
    fn delay_ms(&mut self, ms: u8) {
        self.delay_ms(u32::from(ms));
    }
}

impl<H: TaskHost> DelayUs<u32> for TaskDelay<H> {
    fn delay_us(&mut self, us: u32) {
        self.host.delay(ticks_for_us::<H>(u64::from(us)));
    }
}

impl<H: TaskHost> DelayUs<u16> for TaskDelay<H> {
    fn delay_us(&mut self, us: u16) {
        self.delay_us(u32::from(us));
    }
}

impl<H: TaskHost> DelayUs<u8> for TaskDelay<H> {
    fn delay_us(&mut self, us: u8) {
        self.delay_us(u32::from(us));
    }
}
