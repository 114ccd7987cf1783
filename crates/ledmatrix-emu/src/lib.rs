//! ledmatrix-emu - In-memory MAX7219 emulator
//!
//! This crate provides a bus backend that emulates a MAX7219 register
//! file in memory. It's useful for testing and for running the CLI
//! without real hardware: every 2-byte frame is decoded into the
//! emulated chip state, and the framebuffer can be rendered as ASCII.
//!
//! The emulator is cheaply cloneable; clones share the same chip state,
//! so a test (or the CLI) can keep a handle for inspection while the
//! driver owns the bus.

use ledmatrix_core::bus::SpiBus;
use ledmatrix_core::error::{Error, Result};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Emulated MAX7219 register file and transaction log
#[derive(Debug, Default)]
struct EmuState {
    /// Row registers, digit 0 through 7
    rows: [u8; 8],
    decode_mode: u8,
    intensity: u8,
    scan_limit: u8,
    shutdown: bool,
    display_test: bool,
    /// Every accepted transaction, as (address, value)
    transactions: Vec<(u8, u8)>,
    /// Remaining transfers to accept before failing, if set
    ok_before_failure: Option<usize>,
}

/// Emulated MAX7219 on an in-memory bus
#[derive(Clone, Default)]
pub struct EmuMatrix {
    state: Arc<Mutex<EmuState>>,
}

impl EmuMatrix {
    /// Create a fresh emulated chip in power-on state
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, EmuState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Let `n` more transfers succeed, then fail every subsequent one
    /// with a transport error until [`recover`](Self::recover) is called
    pub fn fail_after(&self, n: usize) {
        self.state().ok_before_failure = Some(n);
    }

    /// Stop injecting transport failures
    pub fn recover(&self) {
        self.state().ok_before_failure = None;
    }

    /// Current framebuffer, one byte per row, MSB = leftmost pixel
    pub fn rows(&self) -> [u8; 8] {
        self.state().rows
    }

    /// All transactions accepted so far, as (address, value) pairs
    pub fn transactions(&self) -> Vec<(u8, u8)> {
        self.state().transactions.clone()
    }

    /// Clear the transaction log (chip state is untouched)
    pub fn clear_log(&self) {
        self.state().transactions.clear();
    }

    /// Whether the chip has left shutdown mode
    pub fn is_on(&self) -> bool {
        self.state().shutdown
    }

    /// Current intensity register value
    pub fn intensity(&self) -> u8 {
        self.state().intensity
    }

    /// Current scan-limit register value
    pub fn scan_limit(&self) -> u8 {
        self.state().scan_limit
    }

    /// Current decode-mode register value
    pub fn decode_mode(&self) -> u8 {
        self.state().decode_mode
    }

    /// Whether display-test mode is active
    pub fn display_test(&self) -> bool {
        self.state().display_test
    }

    /// Render the framebuffer as an 8-line ASCII grid
    ///
    /// Lit pixels are `#`, dark pixels are `.`; in display-test mode
    /// every LED is forced on, matching the real chip.
    pub fn render(&self) -> String {
        let state = self.state();
        let mut out = String::with_capacity(8 * 9);
        for row in state.rows {
            let row = if state.display_test { 0xFF } else { row };
            for bit in (0..8).rev() {
                out.push(if row & (1 << bit) != 0 { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

impl SpiBus for EmuMatrix {
    fn transfer(&mut self, tx: &[u8]) -> Result<()> {
        let mut state = self.state();

        if let Some(remaining) = state.ok_before_failure {
            if remaining == 0 {
                log::debug!("emu: injected transport failure");
                return Err(Error::Transport);
            }
            state.ok_before_failure = Some(remaining - 1);
        }

        // The chip latches exactly 16 bits per chip-select cycle
        if tx.len() != 2 {
            log::warn!("emu: frame of {} bytes, expected 2", tx.len());
            return Err(Error::Transport);
        }
        let (addr, value) = (tx[0], tx[1]);

        match addr {
            0x00 => {} // no-op
            0x01..=0x08 => state.rows[(addr - 1) as usize] = value,
            0x09 => state.decode_mode = value,
            0x0A => state.intensity = value & 0x0F,
            0x0B => state.scan_limit = value & 0x07,
            0x0C => state.shutdown = value & 0x01 != 0,
            0x0F => state.display_test = value & 0x01 != 0,
            _ => {
                log::warn!("emu: write to unknown register 0x{:02X}", addr);
                return Err(Error::Transport);
            }
        }

        state.transactions.push((addr, value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledmatrix_core::chip::Max7219;

    #[test]
    fn init_brings_the_chip_into_operating_mode() {
        let emu = EmuMatrix::new();
        let mut chip = Max7219::new(emu.clone());
        chip.init().unwrap();

        assert!(emu.is_on());
        assert_eq!(emu.decode_mode(), 0x00);
        assert_eq!(emu.scan_limit(), 0x07);
        assert_eq!(emu.intensity(), 0x0F);
        assert!(!emu.display_test());
        assert_eq!(emu.transactions().len(), 5);
    }

    #[test]
    fn raster_write_lands_in_the_framebuffer() {
        let emu = EmuMatrix::new();
        let mut chip = Max7219::new(emu.clone());
        chip.init().unwrap();
        let heart = [0x00, 0x66, 0xFF, 0xFF, 0xFF, 0x7E, 0x3C, 0x18];
        chip.write_raster(&heart).unwrap();
        assert_eq!(emu.rows(), heart);
    }

    #[test]
    fn partial_failure_leaves_mixed_rows_until_retried() {
        let emu = EmuMatrix::new();
        let mut chip = Max7219::new(emu.clone());
        chip.init().unwrap();
        chip.write_raster(&[0xFF; 8]).unwrap();

        emu.clear_log();
        emu.fail_after(4);
        assert!(chip.write_raster(&[0x00; 8]).is_err());
        assert_eq!(emu.transactions().len(), 4);
        // First four rows updated, rest keep the old frame
        assert_eq!(emu.rows(), [0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);

        emu.recover();
        emu.clear_log();
        assert_eq!(chip.write_raster(&[0x00; 8]), Ok(8));
        assert_eq!(emu.transactions().len(), 8);
        assert_eq!(emu.rows(), [0x00; 8]);
    }

    #[test]
    fn render_uses_msb_as_leftmost_pixel() {
        let emu = EmuMatrix::new();
        let mut chip = Max7219::new(emu.clone());
        chip.write_raster(&[0x80, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF])
            .unwrap();
        let rendered = emu.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "#.......");
        assert_eq!(lines[1], ".......#");
        assert_eq!(lines[7], "########");
    }

    #[test]
    fn oversized_frame_is_a_transport_error() {
        let mut emu = EmuMatrix::new();
        assert_eq!(emu.transfer(&[0x01, 0x02, 0x03]), Err(Error::Transport));
        assert!(emu.transactions().is_empty());
    }
}
