//! ledmatrix-linux-spi - Linux spidev bus backend
//!
//! This crate drives the LED matrix through a real SPI controller exposed
//! by Linux's spidev interface at `/dev/spidevX.Y`, where X is the bus
//! number and Y is the chip select.
//!
//! # Example
//!
//! ```no_run
//! use ledmatrix_linux_spi::{SpidevBus, SpidevConfig};
//! use ledmatrix_core::chip::Max7219;
//!
//! // Open with default settings (1 MHz, mode 0)
//! let bus = SpidevBus::open_device("/dev/spidev0.0")?;
//!
//! // Or with custom settings
//! let config = SpidevConfig::new("/dev/spidev0.0")
//!     .with_speed(500_000)
//!     .with_mode(0);
//! let bus = SpidevBus::open(&config)?;
//!
//! let mut chip = Max7219::new(bus);
//! chip.init()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with the ledmatrix CLI
//!
//! ```bash
//! # Show a pattern on real hardware
//! ledmatrix -p linux_spi:dev=/dev/spidev0.0 show --pattern smiley
//!
//! # Specify SPI speed in kHz
//! ledmatrix -p linux_spi:dev=/dev/spidev0.0,speed=500 clear
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with spidev support enabled (`CONFIG_SPI_SPIDEV`)
//! - Read/write access to `/dev/spidevX.Y`
//! - May require adding the user to the `spi` group or udev rules

pub mod device;
pub mod error;

// Re-exports
pub use device::{mode, parse_options, SpidevBus, SpidevConfig};
pub use error::{Result, SpidevError};

/// Open a spidev device and return a boxed bus
///
/// This is a convenience function for the CLI backend dispatch.
///
/// # Arguments
///
/// * `options` - Slice of (key, value) pairs from backend string parsing
///
/// # Example Options
///
/// - `dev=/dev/spidev0.0` - Required: device path
/// - `speed=1000` - Optional: speed in kHz (default: 1000)
/// - `mode=0` - Optional: SPI mode 0-3 (default: 0)
pub fn open_spidev(
    options: &[(&str, &str)],
) -> std::result::Result<Box<dyn ledmatrix_core::bus::SpiBus + Send>, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    let bus = SpidevBus::open(&config)?;
    Ok(Box::new(bus))
}
