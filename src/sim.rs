//! Host-side stand-ins for the chip and the scheduler
//!
//! [`SimChip`] is plain memory laid out like the register blocks. Drivers
//! write to it through the normal handles, and [`SimChip::settle`] plays the
//! part of the hardware: it folds the SIO set/clear/xor strobes into the
//! output registers, updates the input register and reports released resets.
//!
//! [`SimHost`] is a fixed-priority task host in simulated time. Every task is
//! a thread, but only the task picked by the scheduler runs. Task code takes
//! no time unless it calls [`SimHost::run_for`]. When no task is ready, the
//! idle task runs for one tick and calls its hook.
use crate::pac::cell::WO;
use crate::pac::io_bank0::FUNCSEL_NULL;
use crate::pac::pads_bank0::GPIO_RESET_VALUE;
use crate::pac::resets::RESET_ALL_BITS;
use crate::pac::watchdog::TICK_RESET_VALUE;
use crate::pac::xosc::STATUS_STABLE_BITS;
use crate::pac::{self, clocks, io_bank0, pads_bank0, resets, sio, timer, watchdog, xosc};
use crate::rtos::{TaskError, TaskHost, TaskParameters};
use std::any::Any;
use std::cell::Cell;
use std::mem::size_of;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;

//==================================================================================================
//  SimChip
//==================================================================================================

#[repr(C)]
pub struct SimChip {
    pub io_bank0: io_bank0::RegisterBlock,
    pub pads_bank0: pads_bank0::RegisterBlock,
    pub sio: sio::RegisterBlock,
    pub timer: timer::RegisterBlock,
    pub resets: resets::RegisterBlock,
    pub xosc: xosc::RegisterBlock,
    pub clocks: clocks::RegisterBlock,
    pub watchdog: watchdog::RegisterBlock,
    /// Levels driven onto the pads from outside
    external: Cell<u32>,
}

// Each test owns its chip. `SimHost` tasks touch it from their own threads,
// but only one at a time, and the hand-over goes through a mutex.
unsafe impl Sync for SimChip {}

impl SimChip {
    /// A chip in its post-boot state, living for the rest of the test
    pub fn new() -> &'static SimChip {
        // Safety: every register block consists of `u32` cells, for which all
        // zeros is a valid value
        let chip: &'static SimChip = Box::leak(Box::new(unsafe { std::mem::zeroed() }));
        unsafe {
            for (gpio, pad) in chip.io_bank0.gpio.iter().zip(chip.pads_bank0.gpio.iter()) {
                gpio.ctrl.write(FUNCSEL_NULL);
                pad.write(GPIO_RESET_VALUE);
            }
            chip.resets.reset.write(RESET_ALL_BITS);
            chip.xosc.status.write(STATUS_STABLE_BITS);
            chip.watchdog.tick.write(TICK_RESET_VALUE);
        }
        // Everything reports done until the first settle
        chip.resets.reset_done.poke(RESET_ALL_BITS);
        chip.clocks.clk_ref_selected.poke(1);
        chip
    }

    /// Handles pointing at this chip instead of the hardware
    pub fn peripherals(&'static self) -> pac::Peripherals {
        // Safety: the blocks live forever. Tests may hold several handles to
        // one block, which is fine as everything is single threaded.
        unsafe {
            pac::Peripherals {
                IO_BANK0: pac::IO_BANK0::from_ptr(&self.io_bank0),
                PADS_BANK0: pac::PADS_BANK0::from_ptr(&self.pads_bank0),
                SIO: pac::SIO::from_ptr(&self.sio),
                TIMER: pac::TIMER::from_ptr(&self.timer),
                RESETS: pac::RESETS::from_ptr(&self.resets),
                XOSC: pac::XOSC::from_ptr(&self.xosc),
                CLOCKS: pac::CLOCKS::from_ptr(&self.clocks),
                WATCHDOG: pac::WATCHDOG::from_ptr(&self.watchdog),
            }
        }
    }

    /// Apply what the hardware does with the last writes
    pub fn settle(&self) {
        let sio = &self.sio;
        let out = fold(
            sio.gpio_out.read(),
            &sio.gpio_out_set,
            &sio.gpio_out_clr,
            &sio.gpio_out_xor,
        );
        let oe = fold(
            sio.gpio_oe.read(),
            &sio.gpio_oe_set,
            &sio.gpio_oe_clr,
            &sio.gpio_oe_xor,
        );
        unsafe {
            sio.gpio_out.write(out);
            sio.gpio_oe.write(oe);
        }
        sio.gpio_in.poke((out & oe) | (self.external.get() & !oe));
        self.resets
            .reset_done
            .poke(!self.resets.reset.read() & RESET_ALL_BITS);
    }

    /// Drive `pin` from outside. Takes effect on the next [`SimChip::settle`].
    pub fn drive_input(&self, pin: u8, high: bool) {
        let mask = 1 << pin;
        let external = self.external.get();
        self.external
            .set(if high { external | mask } else { external & !mask });
    }

    /// Set the 64-bit microsecond counter
    pub fn set_counter(&self, us: u64) {
        let (hi, lo) = ((us >> 32) as u32, us as u32);
        self.timer.timerawh.poke(hi);
        self.timer.timerawl.poke(lo);
        self.timer.timehr.poke(hi);
        self.timer.timelr.poke(lo);
    }

    /// Every word of every register block, strobes included
    pub fn snapshot(&self) -> Vec<u32> {
        let words = (size_of::<SimChip>() - size_of::<Cell<u32>>()) / 4;
        let base = self as *const SimChip as *const u32;
        // Safety: the register blocks are `repr(C)` runs of `u32` at the start
        // of the struct
        (0..words)
            .map(|i| unsafe { base.add(i).read_volatile() })
            .collect()
    }
}

fn fold(value: u32, set: &WO<u32>, clr: &WO<u32>, xor: &WO<u32>) -> u32 {
    let value = ((value | set.peek()) & !clr.peek()) ^ xor.peek();
    unsafe {
        set.write(0);
        clr.write(0);
        xor.write(0);
    }
    value
}

//==================================================================================================
//  SimHost
//==================================================================================================

/// Parameters a task was created with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub name: String,
    pub stack_words: u16,
    pub priority: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    /// Running or waiting for the processor
    Ready,
    /// Suspended until the given tick
    Delayed(u64),
    Done,
}

struct Task {
    record: TaskRecord,
    state: TaskState,
}

#[derive(Default)]
struct Scheduler {
    tasks: Vec<Task>,
    /// Task owning the processor. `None` while the scheduler decides.
    current: Option<usize>,
    /// Last task picked, for round robin among equal priorities
    last: Option<usize>,
    tick: u64,
    idle_hook_runs: u64,
    delays: Vec<u32>,
    panic: Option<Box<dyn Any + Send>>,
}

impl Scheduler {
    /// Ready task with the highest priority, round robin among equals
    fn next_ready(&self) -> Option<usize> {
        let n = self.tasks.len();
        let start = self.last.map_or(0, |last| last + 1);
        (0..n)
            .map(|i| (start + i) % n)
            .filter(|&id| self.tasks[id].state == TaskState::Ready)
            .fold(None, |best, id| match best {
                Some(b) if self.priority(b) >= self.priority(id) => Some(b),
                _ => Some(id),
            })
    }

    fn priority(&self, id: usize) -> u32 {
        self.tasks[id].record.priority
    }

    /// One tick passes
    fn advance(&mut self) {
        self.tick += 1;
        let tick = self.tick;
        for task in &mut self.tasks {
            if matches!(task.state, TaskState::Delayed(until) if until <= tick) {
                task.state = TaskState::Ready;
            }
        }
    }

    fn preempts(&self, id: usize) -> bool {
        let priority = self.priority(id);
        self.tasks
            .iter()
            .any(|t| t.state == TaskState::Ready && t.record.priority > priority)
    }
}

#[derive(Default)]
struct Shared {
    scheduler: Mutex<Scheduler>,
    switch: Condvar,
    fail_next_create: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Scheduler> {
        self.scheduler.lock().unwrap()
    }

    /// Give the processor back to the scheduler and wait until `id` gets it again
    fn switch_out<'a>(
        &'a self,
        mut sched: MutexGuard<'a, Scheduler>,
        id: usize,
    ) -> MutexGuard<'a, Scheduler> {
        sched.current = None;
        self.switch.notify_all();
        self.wait_turn(sched, id)
    }

    fn wait_turn<'a>(
        &'a self,
        sched: MutexGuard<'a, Scheduler>,
        id: usize,
    ) -> MutexGuard<'a, Scheduler> {
        self.switch
            .wait_while(sched, |s| s.current != Some(id))
            .unwrap()
    }
}

thread_local! {
    static CURRENT_TASK: Cell<Option<usize>> = const { Cell::new(None) };
}

fn current_task() -> usize {
    CURRENT_TASK
        .with(Cell::get)
        .expect("SimHost used outside of a task")
}

/// Handle to a simulated scheduler. Clones share the scheduler.
#[derive(Clone, Default)]
pub struct SimHost {
    shared: Arc<Shared>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next [`TaskHost::create_task`] run out of heap
    pub fn fail_next_create(&self) {
        self.shared.fail_next_create.store(true, Ordering::SeqCst);
    }

    /// Schedule until every task has returned
    ///
    /// A panic inside a task is raised again here.
    pub fn run_tasks(&self) {
        let shared = &*self.shared;
        let mut sched = shared.lock();
        loop {
            let panicked = sched.panic.take();
            if let Some(payload) = panicked {
                drop(sched);
                panic::resume_unwind(payload);
            }
            if let Some(id) = sched.next_ready() {
                sched.current = Some(id);
                sched.last = Some(id);
                shared.switch.notify_all();
                sched = shared
                    .switch
                    .wait_while(sched, |s| s.current.is_some())
                    .unwrap();
            } else if sched
                .tasks
                .iter()
                .any(|t| matches!(t.state, TaskState::Delayed(_)))
            {
                // Idle task
                sched.idle_hook_runs += 1;
                sched.advance();
            } else {
                break;
            }
        }
    }

    /// Keep the processor busy for `ticks` ticks from the calling task
    ///
    /// A higher priority task that becomes ready in the meantime preempts the
    /// caller.
    pub fn run_for(&self, ticks: u32) {
        let id = current_task();
        let shared = &*self.shared;
        let mut sched = shared.lock();
        for _ in 0..ticks {
            sched.advance();
            if sched.preempts(id) {
                sched = shared.switch_out(sched, id);
            }
        }
    }

    pub fn created(&self) -> Vec<TaskRecord> {
        let sched = self.shared.lock();
        sched.tasks.iter().map(|t| t.record.clone()).collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.shared.lock().delays.clone()
    }

    /// Ticks since the host was created
    pub fn now(&self) -> u64 {
        self.shared.lock().tick
    }

    /// Ticks the idle task ran, one hook call each
    pub fn idle_hook_runs(&self) -> u64 {
        self.shared.lock().idle_hook_runs
    }
}

impl TaskHost for SimHost {
    const TICK_RATE_HZ: u32 = 1_000;
    const IDLE_PRIORITY: u32 = 0;

    type Handle = usize;

    fn create_task<F>(&self, entry: F, params: &TaskParameters) -> Result<usize, TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.shared.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(TaskError::CouldNotAllocate);
        }
        let id = {
            let mut sched = self.shared.lock();
            sched.tasks.push(Task {
                record: TaskRecord {
                    name: params.name.into(),
                    stack_words: params.stack_words,
                    priority: params.priority,
                },
                state: TaskState::Ready,
            });
            sched.tasks.len() - 1
        };
        let shared = Arc::clone(&self.shared);
        thread::spawn(move || {
            CURRENT_TASK.with(|c| c.set(Some(id)));
            drop(shared.wait_turn(shared.lock(), id));
            let result = panic::catch_unwind(AssertUnwindSafe(entry));
            let mut sched = shared.lock();
            sched.tasks[id].state = TaskState::Done;
            if let Err(payload) = result {
                sched.panic.get_or_insert(payload);
            }
            sched.current = None;
            shared.switch.notify_all();
        });
        Ok(id)
    }

    fn delay(&self, ticks: u32) {
        let id = current_task();
        let shared = &*self.shared;
        let mut sched = shared.lock();
        sched.delays.push(ticks);
        let until = sched.tick + u64::from(ticks);
        sched.tasks[id].state = if ticks == 0 {
            TaskState::Ready
        } else {
            TaskState::Delayed(until)
        };
        drop(shared.switch_out(sched, id));
    }

    fn start_scheduler(&self) -> ! {
        self.run_tasks();
        panic!("all tasks returned");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(name: &str, priority: u32) -> TaskParameters<'_> {
        TaskParameters {
            name,
            stack_words: 256,
            priority,
        }
    }

    #[test]
    fn idle_runs_only_while_every_task_is_suspended() {
        let host = SimHost::new();
        let task = host.clone();
        host.create_task(
            move || {
                task.run_for(30);
                task.delay(20);
                task.run_for(10);
            },
            &params("worker", 1),
        )
        .unwrap();
        host.run_tasks();
        assert_eq!(host.now(), 60);
        assert_eq!(host.idle_hook_runs(), 20);
    }

    #[test]
    fn idle_does_not_run_without_tasks() {
        let host = SimHost::new();
        host.run_tasks();
        assert_eq!(host.now(), 0);
        assert_eq!(host.idle_hook_runs(), 0);
    }

    #[test]
    #[should_panic(expected = "outside of a task")]
    fn delay_outside_of_a_task_panics() {
        SimHost::new().delay(10);
    }

    #[test]
    fn higher_priority_preempts_when_it_wakes() {
        let host = SimHost::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let (task, log) = (host.clone(), order.clone());
        host.create_task(
            move || {
                task.delay(5);
                log.lock().unwrap().push(("high", task.now()));
            },
            &params("high", 2),
        )
        .unwrap();
        let (task, log) = (host.clone(), order.clone());
        host.create_task(
            move || {
                task.run_for(10);
                log.lock().unwrap().push(("low", task.now()));
            },
            &params("low", 1),
        )
        .unwrap();
        host.run_tasks();

        assert_eq!(*order.lock().unwrap(), vec![("high", 5), ("low", 10)]);
        assert_eq!(host.idle_hook_runs(), 0);
    }

    #[test]
    fn task_at_idle_priority_still_lets_idle_run_while_delayed() {
        let host = SimHost::new();
        let task = host.clone();
        host.create_task(move || task.delay(100), &params("low", SimHost::IDLE_PRIORITY))
            .unwrap();
        host.run_tasks();
        assert_eq!(host.idle_hook_runs(), 100);
        assert_eq!(host.delays(), vec![100]);
    }

    #[test]
    #[should_panic(expected = "inside the task")]
    fn task_panics_reach_the_scheduler() {
        let host = SimHost::new();
        host.create_task(|| panic!("inside the task"), &params("bad", 1))
            .unwrap();
        host.run_tasks();
    }
}
