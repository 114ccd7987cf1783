//! ledmatrix-core - Core driver logic for MAX7219 LED matrix devices
//!
//! This crate implements the register protocol, initialization sequence,
//! and raster write contract for an 8x8 LED matrix behind a MAX7219
//! display driver, plus the attach/detach lifecycle that publishes the
//! matrix as a named, write-only byte device.
//!
//! The physical SPI transport is abstracted behind the [`bus::SpiBus`]
//! trait so the same driver runs against real spidev hardware, an
//! in-memory emulator, or a test mock.
//!
//! # Features
//!
//! - `std` - Enable standard library support (lifecycle manager, device
//!   registry, and I/O handles; includes `alloc`)
//! - `alloc` - Enable heap allocation (boxed bus trait objects)
//!
//! # Example
//!
//! ```ignore
//! use ledmatrix_core::chip::Max7219;
//!
//! let mut chip = Max7219::new(bus);
//! chip.init()?;
//! chip.write_raster(&[0x3C, 0x42, 0xA5, 0x81, 0xA5, 0x99, 0x42, 0x3C])?;
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod bus;
pub mod chip;
#[cfg(feature = "std")]
pub mod device;
pub mod error;
#[cfg(feature = "std")]
pub mod lifecycle;
#[cfg(feature = "std")]
pub mod registry;
pub mod regs;

pub use error::{Error, Result};
