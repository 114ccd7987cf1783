//! SPI bus trait definition
//!
//! The driver core speaks to the chip through this seam. A backend is any
//! synchronous SPI master that can clock out a small fixed-size frame:
//! real spidev hardware, the in-memory emulator, or a test mock.

use crate::error::Result;

/// SPI clock rate every backend must run the chip at (1 MHz)
pub const SPI_SPEED_HZ: u32 = 1_000_000;

/// SPI word width; the MAX7219 frame is always whole bytes
pub const BITS_PER_WORD: u8 = 8;

/// A synchronous SPI bus carrying one attached MAX7219
///
/// `transfer` performs one blocking full-duplex transfer of `tx` at the
/// fixed clock rate and word width above, suspending the calling context
/// until the transport completes or errors. Either the whole frame is
/// clocked out or the call reports [`Error::Transport`]; partial writes
/// are never observable above this layer.
///
/// [`Error::Transport`]: crate::error::Error::Transport
pub trait SpiBus {
    /// Perform one blocking transfer of the given frame
    fn transfer(&mut self, tx: &[u8]) -> Result<()>;
}

// Blanket impl for boxed buses to allow trait objects
#[cfg(feature = "alloc")]
impl SpiBus for alloc::boxed::Box<dyn SpiBus + Send> {
    fn transfer(&mut self, tx: &[u8]) -> Result<()> {
        (**self).transfer(tx)
    }
}
