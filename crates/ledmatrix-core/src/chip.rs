//! MAX7219 chip driver
//!
//! Owns the bus session for one attached chip and implements the register
//! transaction primitive, the fixed initialization sequence, and the
//! 8-byte raster write contract.

use crate::bus::SpiBus;
use crate::error::{Error, Result};
use crate::regs::{values, Register};

/// A raster is always exactly one byte per display row
pub const RASTER_LEN: usize = 8;

/// Driver for one MAX7219 on a dedicated bus session
///
/// The driver owns the bus; dropping the driver releases the session.
pub struct Max7219<B: SpiBus> {
    bus: B,
}

impl<B: SpiBus> Max7219<B> {
    /// Take ownership of a bus session carrying one chip
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Borrow the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Release the chip, returning the bus session
    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Issue one register transaction
    ///
    /// Builds the fixed 2-byte frame `[address, value]` and clocks it out
    /// in a single blocking transfer. Register values are chip-defined
    /// bitfields; no validation is done beyond byte width. Re-sending the
    /// same pair is safe to repeat.
    pub fn send(&mut self, reg: Register, value: u8) -> Result<()> {
        let frame = [reg.addr(), value];
        self.bus.transfer(&frame)
    }

    /// Run the chip initialization sequence
    ///
    /// Brings the chip from power-on/unknown state into raw-bitmap
    /// operating mode. The order is fixed: the chip must leave shutdown
    /// before the other registers take effect, and display-test is
    /// disabled last so the configured mode is what ends up visible.
    ///
    /// A failed transaction aborts the sequence; the caller treats that as
    /// fatal to the attach attempt and may retry with a fresh attachment.
    pub fn init(&mut self) -> Result<()> {
        self.send(Register::Shutdown, values::SHUTDOWN_NORMAL)?;
        self.send(Register::DecodeMode, values::DECODE_NONE)?;
        self.send(Register::ScanLimit, values::SCAN_ALL_ROWS)?;
        self.send(Register::Intensity, values::INTENSITY_MAX)?;
        self.send(Register::DisplayTest, values::DISPLAY_TEST_OFF)?;
        log::debug!("max7219: initialization sequence complete");
        Ok(())
    }

    /// Write one full 8-byte raster, one byte per row, MSB = leftmost pixel
    ///
    /// Any length other than 8 is rejected with `InvalidLength` before a
    /// single transaction is issued. A valid raster is decomposed into one
    /// digit-register transaction per row, in ascending row order. The chip
    /// has no atomic multi-register commit, so on a transport failure
    /// partway through, rows already written stay applied and no further
    /// rows are attempted; retrying the full write is safe since rows are
    /// independently overwritten.
    ///
    /// Returns the number of input bytes consumed (always 8 on success).
    pub fn write_raster(&mut self, raster: &[u8]) -> Result<usize> {
        if raster.len() != RASTER_LEN {
            return Err(Error::InvalidLength(raster.len()));
        }

        for (reg, &row) in Register::DIGITS.iter().zip(raster) {
            self.send(*reg, row)?;
        }

        Ok(RASTER_LEN)
    }

    /// Blank the display (all-zero raster)
    pub fn clear(&mut self) -> Result<()> {
        self.write_raster(&[0; RASTER_LEN])?;
        Ok(())
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    /// Smiley raster from the demo app
    const SMILEY: [u8; 8] = [0x3C, 0x42, 0xA5, 0x81, 0xA5, 0x99, 0x42, 0x3C];

    /// Mock bus recording every 2-byte frame, with fail-after-N injection
    struct MockBus {
        frames: Vec<(u8, u8)>,
        ok_before_failure: Option<usize>,
    }

    impl MockBus {
        fn new() -> Self {
            Self {
                frames: Vec::new(),
                ok_before_failure: None,
            }
        }

        /// Let `n` transfers succeed, then fail every subsequent one
        fn fail_after(n: usize) -> Self {
            Self {
                frames: Vec::new(),
                ok_before_failure: Some(n),
            }
        }

        fn recover(&mut self) {
            self.ok_before_failure = None;
        }
    }

    impl SpiBus for MockBus {
        fn transfer(&mut self, tx: &[u8]) -> Result<()> {
            assert_eq!(tx.len(), 2, "chip frames are always 2 bytes");
            if let Some(remaining) = self.ok_before_failure {
                if remaining == 0 {
                    return Err(Error::Transport);
                }
                self.ok_before_failure = Some(remaining - 1);
            }
            self.frames.push((tx[0], tx[1]));
            Ok(())
        }
    }

    #[test]
    fn init_sequence_order_is_fixed() {
        let mut chip = Max7219::new(MockBus::new());
        chip.init().unwrap();
        assert_eq!(
            chip.bus().frames,
            vec![
                (0x0C, 0x01), // shutdown -> normal operation
                (0x09, 0x00), // decode mode -> none
                (0x0B, 0x07), // scan limit -> all rows
                (0x0A, 0x0F), // intensity -> max
                (0x0F, 0x00), // display test -> off
            ]
        );
    }

    #[test]
    fn init_stops_at_first_transport_failure() {
        let mut chip = Max7219::new(MockBus::fail_after(2));
        assert_eq!(chip.init(), Err(Error::Transport));
        assert_eq!(chip.bus().frames, vec![(0x0C, 0x01), (0x09, 0x00)]);
    }

    #[test]
    fn smiley_raster_maps_to_ascending_digit_rows() {
        let mut chip = Max7219::new(MockBus::new());
        assert_eq!(chip.write_raster(&SMILEY), Ok(8));
        assert_eq!(
            chip.bus().frames,
            vec![
                (0x01, 0x3C),
                (0x02, 0x42),
                (0x03, 0xA5),
                (0x04, 0x81),
                (0x05, 0xA5),
                (0x06, 0x99),
                (0x07, 0x42),
                (0x08, 0x3C),
            ]
        );
    }

    #[test]
    fn wrong_length_rejected_with_zero_transactions() {
        let mut chip = Max7219::new(MockBus::new());
        for len in [0usize, 4, 7, 9, 64] {
            let buf = vec![0xAA; len];
            assert_eq!(chip.write_raster(&buf), Err(Error::InvalidLength(len)));
        }
        assert!(chip.bus().frames.is_empty());
    }

    #[test]
    fn transport_failure_mid_write_stops_without_rollback() {
        // Fail on the 5th of 8 row transactions
        let mut chip = Max7219::new(MockBus::fail_after(4));
        assert_eq!(chip.write_raster(&SMILEY), Err(Error::Transport));
        assert_eq!(
            chip.bus().frames,
            vec![(0x01, 0x3C), (0x02, 0x42), (0x03, 0xA5), (0x04, 0x81)]
        );
    }

    #[test]
    fn full_retry_after_partial_failure_writes_eight_fresh_rows() {
        let mut chip = Max7219::new(MockBus::fail_after(4));
        assert_eq!(chip.write_raster(&SMILEY), Err(Error::Transport));

        chip.bus.recover();
        chip.bus.frames.clear();
        assert_eq!(chip.write_raster(&SMILEY), Ok(8));
        assert_eq!(chip.bus().frames.len(), 8);
    }

    #[test]
    fn clear_writes_zero_to_every_row() {
        let mut chip = Max7219::new(MockBus::new());
        chip.clear().unwrap();
        let expected: Vec<(u8, u8)> = (1u8..=8).map(|addr| (addr, 0)).collect();
        assert_eq!(chip.bus().frames, expected);
    }
}
