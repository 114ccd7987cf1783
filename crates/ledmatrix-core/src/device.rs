//! External I/O surface
//!
//! Open handles onto an attached matrix. The device is write-only: the
//! chip has no readable display-state path, so a handle exposes only the
//! 8-byte raster write. Whole-raster writes are serialized behind one
//! per-device mutex so two callers can never interleave row transactions
//! and compose a corrupted frame.

use crate::bus::SpiBus;
use crate::chip::Max7219;
use crate::error::{Error, Result};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared slot holding the attached chip, emptied on detach
///
/// The mutex is the write-serialization lock from the concurrency model:
/// it is held for the duration of one full 8-row write, and detach takes
/// the chip out under the same lock, so a racing write either completes
/// against the live session or observes the empty slot.
pub(crate) type ChipSlot<B> = Arc<Mutex<Option<Max7219<B>>>>;

pub(crate) fn lock_slot<B: SpiBus>(slot: &ChipSlot<B>) -> MutexGuard<'_, Option<Max7219<B>>> {
    // A poisoned lock means a writer panicked mid-raster; the chip is in a
    // mixed-row state that the next full write overwrites anyway.
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An open handle onto the matrix device
///
/// Obtained from [`Lifecycle::open`] once the device is ready. Opening
/// records nothing beyond an open count; dropping the handle closes it.
///
/// [`Lifecycle::open`]: crate::lifecycle::Lifecycle::open
pub struct MatrixHandle<B: SpiBus> {
    slot: ChipSlot<B>,
    open_count: Arc<AtomicUsize>,
}

impl<B: SpiBus> MatrixHandle<B> {
    pub(crate) fn new(slot: ChipSlot<B>, open_count: Arc<AtomicUsize>) -> Self {
        open_count.fetch_add(1, Ordering::Relaxed);
        log::info!("led-matrix device opened");
        Self { slot, open_count }
    }

    /// Write one full 8-byte raster to the display
    ///
    /// Returns the number of bytes consumed (8) on success. Fails with
    /// `InvalidLength` for any other buffer length, `Transport` if the bus
    /// fails partway (rows already sent stay applied), and `NotPresent` if
    /// the chip detached after this handle was opened.
    pub fn write(&self, raster: &[u8]) -> Result<usize> {
        let mut guard = lock_slot(&self.slot);
        let chip = guard.as_mut().ok_or(Error::NotPresent)?;
        chip.write_raster(raster)
    }

    /// Blank the display
    pub fn clear(&self) -> Result<()> {
        let mut guard = lock_slot(&self.slot);
        let chip = guard.as_mut().ok_or(Error::NotPresent)?;
        chip.clear()
    }
}

impl<B: SpiBus> Drop for MatrixHandle<B> {
    fn drop(&mut self) {
        self.open_count.fetch_sub(1, Ordering::Relaxed);
        log::info!("led-matrix device closed");
    }
}
