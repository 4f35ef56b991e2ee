//! FreeRTOS binding
//!
//! Links against a FreeRTOS kernel built as `libfreertos.a` together with the
//! small helper object exporting the sizes of its configurable types. The
//! kernel has to be configured with a 1 kHz tick, 32-bit ticks and heap
//! allocation (`configSUPPORT_DYNAMIC_ALLOCATION`). Call [`verify_abi`] once
//! at startup to check the sizes the binding assumes.
use super::{TaskError, TaskHost, TaskParameters};
use core::ffi::c_void;
use core::mem::size_of;
use core::ptr::{self, NonNull};
use cortex_m::interrupt;

#[allow(non_snake_case)]
mod ffi {
    use core::ffi::c_void;

    pub enum TaskControlBlock {}

    pub type TaskHandle = *mut TaskControlBlock;

    pub const PD_PASS: i32 = 1;

    #[link(name = "freertos", kind = "static")]
    extern "C" {
        pub fn freertos_sizeof_BaseType_t() -> usize;
        pub fn freertos_sizeof_TickType_t() -> usize;
        pub fn freertos_sizeof_configSTACK_DEPTH_TYPE() -> usize;
        pub fn freertos_configMAX_TASK_NAME_LEN() -> usize;

        pub fn pvPortMalloc(wanted_size: usize) -> *mut c_void;
        pub fn vPortFree(pv: *mut c_void);

        pub fn xTaskCreate(
            task_func: extern "C" fn(*mut c_void),
            name: *const u8,
            stack_depth: u16,
            task_param: *mut c_void,
            priority: u32,
            task_handle: *mut TaskHandle,
        ) -> i32;
        pub fn vTaskDelay(ticks_to_delay: u32);
        pub fn vTaskDelete(task: TaskHandle);
        pub fn vTaskStartScheduler();
    }
}

/// Longest task name the binding passes on, the terminator included
const NAME_BUF_LEN: usize = 32;

/// Check that the kernel was built with the type sizes this binding assumes
pub fn verify_abi() -> Result<(), TaskError> {
    // Safety: the helpers only return compile-time constants
    let sizes = unsafe {
        (
            ffi::freertos_sizeof_BaseType_t(),
            ffi::freertos_sizeof_TickType_t(),
            ffi::freertos_sizeof_configSTACK_DEPTH_TYPE(),
        )
    };
    if sizes == (size_of::<i32>(), size_of::<u32>(), size_of::<u16>()) {
        Ok(())
    } else {
        Err(TaskError::AbiMismatch)
    }
}

/// Handle of a task created through [`FreeRtos`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle(NonNull<ffi::TaskControlBlock>);

/// The FreeRTOS kernel linked into the program
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeRtos;

impl TaskHost for FreeRtos {
    const TICK_RATE_HZ: u32 = 1_000;
    const IDLE_PRIORITY: u32 = 0;

    type Handle = TaskHandle;

    fn create_task<F>(&self, entry: F, params: &TaskParameters) -> Result<TaskHandle, TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        let slot = EntrySlot::new(entry)?;

        // Safety: only returns a constant
        let max_len = unsafe { ffi::freertos_configMAX_TASK_NAME_LEN() };
        let mut name = [0u8; NAME_BUF_LEN];
        let len = params
            .name
            .len()
            .min(max_len.saturating_sub(1))
            .min(NAME_BUF_LEN - 1);
        name[..len].copy_from_slice(&params.name.as_bytes()[..len]);

        let mut handle: ffi::TaskHandle = ptr::null_mut();
        // Safety: the name is NUL terminated and copied by the kernel. The
        // entry slot is handed over to the trampoline.
        let status = unsafe {
            ffi::xTaskCreate(
                trampoline::<F>,
                name.as_ptr(),
                params.stack_words,
                slot.ptr,
                params.priority,
                &mut handle,
            )
        };
        if status != ffi::PD_PASS {
            // Safety: the kernel did not take the slot
            unsafe { slot.drop_entry::<F>() };
            return Err(TaskError::CouldNotAllocate);
        }
        NonNull::new(handle)
            .map(TaskHandle)
            .ok_or(TaskError::CouldNotAllocate)
    }

    #[inline]
    fn delay(&self, ticks: u32) {
        // Safety: only valid from a task, which is the contract of `TaskDelay`
        unsafe { ffi::vTaskDelay(ticks) }
    }

    fn start_scheduler(&self) -> ! {
        // Safety: the kernel only returns if it could not create the idle task
        unsafe { ffi::vTaskStartScheduler() };
        panic!("FreeRTOS scheduler returned: not enough heap for the idle task");
    }
}

/// A task entry moved to the FreeRTOS heap
///
/// `pvPortMalloc` only guarantees `portBYTE_ALIGNMENT`, so the entry is moved
/// in and out with unaligned accesses. A zero sized entry still gets a one
/// byte block, as the kernel heap does not support empty allocations.
struct EntrySlot {
    ptr: *mut c_void,
}

impl EntrySlot {
    fn new<F>(entry: F) -> Result<Self, TaskError> {
        let size = size_of::<F>().max(1);
        // Heap access with interrupts masked
        let ptr = interrupt::free(|_| unsafe { ffi::pvPortMalloc(size) });
        if ptr.is_null() {
            return Err(TaskError::CouldNotAllocate);
        }
        // Safety: the block holds at least `size_of::<F>()` bytes
        unsafe { ptr::write_unaligned(ptr as *mut F, entry) };
        Ok(EntrySlot { ptr })
    }

    /// Move the entry back out and free the block
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`EntrySlot::new`] with the same `F` and must not
    /// be used afterwards.
    unsafe fn take<F>(ptr: *mut c_void) -> F {
        let entry = ptr::read_unaligned(ptr as *const F);
        interrupt::free(|_| ffi::vPortFree(ptr));
        entry
    }

    /// # Safety
    ///
    /// Same as [`EntrySlot::take`]
    unsafe fn drop_entry<F>(self) {
        drop(Self::take::<F>(self.ptr));
    }
}

extern "C" fn trampoline<F: FnOnce()>(param: *mut c_void) {
    // Safety: `param` is the slot created for this `F` in `create_task`, and
    // the kernel passes it exactly once
    let entry = unsafe { EntrySlot::take::<F>(param) };
    entry();
    // A FreeRTOS task must never return from its function
    unsafe { ffi::vTaskDelete(ptr::null_mut()) };
}
