//! MAX7219 register map
//!
//! The chip exposes a flat one-byte register address space. Modeling the
//! map as a closed enum means an invalid register address cannot be
//! constructed, so every frame the driver emits carries a real address.

/// A MAX7219 register address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    /// No-op, used by chained modules (unused here, single module only)
    Noop = 0x00,
    /// Display row 0 (chip digit 0)
    Digit0 = 0x01,
    /// Display row 1
    Digit1 = 0x02,
    /// Display row 2
    Digit2 = 0x03,
    /// Display row 3
    Digit3 = 0x04,
    /// Display row 4
    Digit4 = 0x05,
    /// Display row 5
    Digit5 = 0x06,
    /// Display row 6
    Digit6 = 0x07,
    /// Display row 7
    Digit7 = 0x08,
    /// BCD decode mode (0x00 = raw bitmap, required for a matrix)
    DecodeMode = 0x09,
    /// Brightness, 0x00 to 0x0F
    Intensity = 0x0A,
    /// Number of scanned rows minus one
    ScanLimit = 0x0B,
    /// 0x00 = shutdown/power-down, 0x01 = normal operation
    Shutdown = 0x0C,
    /// 0x01 forces all LEDs on regardless of register contents
    DisplayTest = 0x0F,
}

impl Register {
    /// The eight digit registers in ascending row order
    pub const DIGITS: [Register; 8] = [
        Register::Digit0,
        Register::Digit1,
        Register::Digit2,
        Register::Digit3,
        Register::Digit4,
        Register::Digit5,
        Register::Digit6,
        Register::Digit7,
    ];

    /// Wire address of this register
    pub fn addr(self) -> u8 {
        self as u8
    }

    /// Digit register for a display row, or `None` if `row > 7`
    pub fn digit(row: u8) -> Option<Register> {
        Self::DIGITS.get(row as usize).copied()
    }
}

/// Register values used by the initialization sequence
pub mod values {
    /// Shutdown register: normal operation (exit power-down)
    pub const SHUTDOWN_NORMAL: u8 = 0x01;
    /// Decode-mode register: no BCD decode, raw bitmap rows
    pub const DECODE_NONE: u8 = 0x00;
    /// Scan-limit register: scan all 8 rows
    pub const SCAN_ALL_ROWS: u8 = 0x07;
    /// Intensity register: maximum brightness
    pub const INTENSITY_MAX: u8 = 0x0F;
    /// Display-test register: test mode off
    pub const DISPLAY_TEST_OFF: u8 = 0x00;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_addresses_are_contiguous() {
        for row in 0u8..8 {
            let reg = Register::digit(row).unwrap();
            assert_eq!(reg.addr(), 0x01 + row);
        }
    }

    #[test]
    fn out_of_range_row_has_no_register() {
        assert_eq!(Register::digit(8), None);
        assert_eq!(Register::digit(0xFF), None);
    }

    #[test]
    fn control_register_addresses_match_datasheet() {
        assert_eq!(Register::Noop.addr(), 0x00);
        assert_eq!(Register::DecodeMode.addr(), 0x09);
        assert_eq!(Register::Intensity.addr(), 0x0A);
        assert_eq!(Register::ScanLimit.addr(), 0x0B);
        assert_eq!(Register::Shutdown.addr(), 0x0C);
        assert_eq!(Register::DisplayTest.addr(), 0x0F);
    }
}
