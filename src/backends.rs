//! Bus backend registration and dispatch
//!
//! Backends are selected with a `name:key=val,key=val` string, e.g.
//! `linux_spi:dev=/dev/spidev0.0,speed=1000` or plain `emu`. Hardware
//! backends are feature-gated so a build can carry only the transports
//! it needs; the emulator is always available.

use ledmatrix_core::bus::SpiBus;
use ledmatrix_emu::EmuMatrix;

/// Information about a bus backend
pub struct BackendInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// An opened bus, plus the emulator handle when one is backing it
pub struct Backend {
    /// The bus carrying the chip
    pub bus: Box<dyn SpiBus + Send>,
    /// Present when the bus is emulated; lets the CLI render the panel
    pub emu: Option<EmuMatrix>,
}

/// Get information about all available backends (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_backends() -> Vec<BackendInfo> {
    let mut backends = vec![BackendInfo {
        name: "emu",
        aliases: &["dummy"],
        description: "In-memory MAX7219 emulator (no hardware required)",
    }];

    #[cfg(feature = "linux-spi")]
    backends.push(BackendInfo {
        name: "linux_spi",
        aliases: &["linux-spi", "spidev"],
        description: "Linux spidev interface (dev=/dev/spidevX.Y,speed=<kHz>,mode=<0-3>)",
    });

    backends
}

/// Generate help text listing all available backends
pub fn backend_help() -> String {
    let mut help = String::from("Bus backend to use. Available:\n");
    for b in &available_backends() {
        help.push_str(&format!("  {:<10} {}\n", b.name, b.description));
    }
    help
}

/// Open a backend from a `name:key=val,...` specification string
pub fn open_backend(spec: &str) -> Result<Backend, Box<dyn std::error::Error>> {
    let (name, opts) = match spec.split_once(':') {
        Some((name, rest)) => (name, rest),
        None => (spec, ""),
    };

    #[allow(unused_variables)]
    let pairs: Vec<(&str, &str)> = opts
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|kv| kv.split_once('=').unwrap_or((kv, "")))
        .collect();

    match name {
        "emu" | "dummy" => {
            let emu = EmuMatrix::new();
            log::info!("backend: using in-memory emulator");
            Ok(Backend {
                bus: Box::new(emu.clone()),
                emu: Some(emu),
            })
        }
        #[cfg(feature = "linux-spi")]
        "linux_spi" | "linux-spi" | "spidev" => {
            let bus = ledmatrix_linux_spi::open_spidev(&pairs)?;
            Ok(Backend { bus, emu: None })
        }
        _ => Err(format!(
            "Unknown backend {:?}. Available: {}",
            name,
            available_backends()
                .iter()
                .map(|b| b.name)
                .collect::<Vec<_>>()
                .join(", ")
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(open_backend("warp_drive").is_err());
    }

    #[test]
    fn emu_backend_opens_and_exposes_the_panel() {
        let backend = open_backend("emu").unwrap();
        assert!(backend.emu.is_some());
    }

    #[cfg(feature = "linux-spi")]
    #[test]
    fn spidev_backend_requires_a_device_option() {
        // No dev= option: must fail during option parsing, before any open
        assert!(open_backend("linux_spi").is_err());
    }
}
