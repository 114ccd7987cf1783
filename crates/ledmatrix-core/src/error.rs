//! Error types for ledmatrix-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Details about a failed attach attempt
///
/// Attach-time failures are fatal to that attempt: the lifecycle manager
/// unwinds whatever was already created and returns to `Unattached`, so no
/// caller ever sees a half-initialized device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachFailure {
    /// A session is already established; attach events must be serialized
    AlreadyAttached,
    /// The chip initialization sequence failed partway through
    Init,
    /// Byte-device endpoint registration failed
    Chrdev,
    /// Device class creation failed
    Class,
    /// Named device node creation failed
    Node,
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Raster buffer length is not exactly 8 bytes; carries the length seen.
    /// Rejected before any transaction is issued.
    InvalidLength(usize),
    /// The bus transfer failed (electrical, timeout, NAK). Not retried by
    /// the core; rows written before the failure stay applied.
    Transport,
    /// Operation attempted while no chip is attached (or detach is in
    /// progress); no transaction was attempted.
    NotPresent,
    /// Attach-time failure; the attempt was unwound cleanly
    Attach(AttachFailure),
}

impl fmt::Display for AttachFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAttached => write!(f, "a bus session is already attached"),
            Self::Init => write!(f, "chip initialization sequence failed"),
            Self::Chrdev => write!(f, "failed to register byte-device endpoint"),
            Self::Class => write!(f, "failed to create device class"),
            Self::Node => write!(f, "failed to create device node"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => {
                write!(f, "invalid raster length {} (expected 8 bytes)", len)
            }
            Self::Transport => write!(f, "SPI transfer failed"),
            Self::NotPresent => write!(f, "device not present"),
            Self::Attach(failure) => write!(f, "attach failed: {}", failure),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
