//! Volatile register cells
//!
//! Every register slot of a [`RegisterBlock`](super::sio::RegisterBlock) is one
//! of the three cell types below. A cell only offers the accesses the hardware
//! defines for that slot: reading a write-only register or writing a read-only
//! register does not compile. Each access is exactly one volatile load or store
//! of `T`.
//!
//! Writing raw bits is `unsafe`, the same way it is for `w.bits()` in an
//! svd2rust generated PAC: the caller vouches that the value is legal for the
//! register.
use vcell::VolatileCell;

/// Read-only register
#[repr(transparent)]
pub struct RO<T: Copy> {
    register: VolatileCell<T>,
}

impl<T: Copy> RO<T> {
    /// Read the register
    #[inline(always)]
    pub fn read(&self) -> T {
        self.register.get()
    }

    /// Drive the value the hardware would present in this slot
    #[cfg(test)]
    pub(crate) fn poke(&self, value: T) {
        self.register.set(value)
    }
}

/// Write-only register
#[repr(transparent)]
pub struct WO<T: Copy> {
    register: VolatileCell<T>,
}

impl<T: Copy> WO<T> {
    /// Write `value` to the register
    ///
    /// # Safety
    ///
    /// `value` must be a legal bit pattern for this register.
    #[inline(always)]
    pub unsafe fn write(&self, value: T) {
        self.register.set(value)
    }

    /// Last value stored into the slot. Only meaningful for a simulated block.
    #[cfg(test)]
    pub(crate) fn peek(&self) -> T {
        self.register.get()
    }
}

/// Read-write register
#[repr(transparent)]
pub struct RW<T: Copy> {
    register: VolatileCell<T>,
}

impl<T: Copy> RW<T> {
    /// Read the register
    #[inline(always)]
    pub fn read(&self) -> T {
        self.register.get()
    }

    /// Write `value` to the register
    ///
    /// # Safety
    ///
    /// `value` must be a legal bit pattern for this register.
    #[inline(always)]
    pub unsafe fn write(&self, value: T) {
        self.register.set(value)
    }

    /// Read-modify-write. The load and the store are two separate bus accesses,
    /// so this is not atomic with respect to other contexts touching the same
    /// register.
    ///
    /// # Safety
    ///
    /// The value returned by `f` must be a legal bit pattern for this register.
    #[inline(always)]
    pub unsafe fn modify<F>(&self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        self.register.set(f(self.register.get()));
    }
}
