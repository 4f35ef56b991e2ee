//! Task host contract
//!
//! A [`TaskHost`] is a preemptive scheduler running tasks with their own
//! stacks and fixed priorities, next to an idle task at the lowest priority.
//! The crate only needs three things from it: create a task, suspend the
//! calling task for a number of ticks, and start scheduling.
//!
//! The FreeRTOS binding is available with the `freertos` feature, see
//! [`freertos::FreeRtos`].
#[cfg(feature = "freertos")]
pub mod freertos;

/// How a new task is set up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskParameters<'a> {
    /// Human readable name. Truncated by the host if it is too long.
    pub name: &'a str,
    /// Stack size in words of the host's stack type
    pub stack_words: u16,
    /// Higher values take precedence. The idle task runs at
    /// [`TaskHost::IDLE_PRIORITY`].
    pub priority: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskError {
    /// Not enough heap for the task entry, its stack or its control block
    CouldNotAllocate,
    /// The host was built with type sizes this binding does not match
    AbiMismatch,
}

pub trait TaskHost {
    /// Frequency of the scheduler tick
    const TICK_RATE_HZ: u32;
    /// Priority of the idle task
    const IDLE_PRIORITY: u32;

    /// Reference to a created task
    type Handle;

    /// Create a task running `entry` once
    ///
    /// The task ends when `entry` returns. Creation after
    /// [`start_scheduler`](Self::start_scheduler) is allowed from inside a
    /// task.
    fn create_task<F>(&self, entry: F, params: &TaskParameters) -> Result<Self::Handle, TaskError>
    where
        F: FnOnce() + Send + 'static;

    /// Suspend the calling task for `ticks` scheduler ticks
    ///
    /// Zero ticks yields to other ready tasks of the same priority.
    fn delay(&self, ticks: u32);

    /// Hand the processor to the scheduler. Only returns on a fatal host
    /// error, which is reported by panicking.
    fn start_scheduler(&self) -> !;
}

impl<H: TaskHost> TaskHost for &H {
    const TICK_RATE_HZ: u32 = H::TICK_RATE_HZ;
    const IDLE_PRIORITY: u32 = H::IDLE_PRIORITY;

    type Handle = H::Handle;

    #[inline]
    fn create_task<F>(&self, entry: F, params: &TaskParameters) -> Result<Self::Handle, TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        (**self).create_task(entry, params)
    }

    #[inline]
    fn delay(&self, ticks: u32) {
        (**self).delay(ticks)
    }

    #[inline]
    fn start_scheduler(&self) -> ! {
        (**self).start_scheduler()
    }
}
