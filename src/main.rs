//! ledmatrix - MAX7219 8x8 LED matrix controller
//!
//! Drives an 8x8 LED matrix behind a MAX7219 display driver over SPI.
//! The driver core lives in `ledmatrix-core`; this binary wires a bus
//! backend (real spidev hardware or the in-memory emulator) through the
//! device lifecycle manager and exposes a small pattern-picker front end.

mod backends;
mod cli;
mod patterns;

use clap::Parser;
use cli::{Cli, Commands};
use ledmatrix_core::bus::SpiBus;
use ledmatrix_core::device::MatrixHandle;
use ledmatrix_core::lifecycle::Lifecycle;
use ledmatrix_core::registry::InProcessRegistry;
use ledmatrix_emu::EmuMatrix;

use std::io::{BufRead, Write};

type Bus = Box<dyn SpiBus + Send>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    if let Commands::Patterns = cli.command {
        // No device needed for a listing
        for p in patterns::BUILTINS {
            println!("{} - {}", p.name, p.description);
            println!("{}", patterns::preview(&p.raster));
        }
        return Ok(());
    }

    let backend = backends::open_backend(&cli.backend)?;
    let panel = backend.emu.clone();

    // Attach the chip: init sequence first, then the published device node
    let mut lifecycle: Lifecycle<Bus, _> = Lifecycle::new(InProcessRegistry::new());
    lifecycle.attach(backend.bus)?;
    let handle = lifecycle.open()?;

    let result = match cli.command {
        Commands::Show { pattern } => {
            let p = patterns::find(&pattern).ok_or_else(|| {
                format!("Unknown pattern {:?} (try `ledmatrix patterns`)", pattern)
            })?;
            handle.write(&p.raster)?;
            println!("Pattern {:?} written to LED matrix.", p.name);
            show_panel(&panel);
            Ok(())
        }
        Commands::Clear => {
            handle.clear()?;
            println!("Display cleared.");
            show_panel(&panel);
            Ok(())
        }
        Commands::Interactive => interactive(&handle, &panel),
        Commands::Patterns => unreachable!("handled above"),
    };

    drop(handle);
    lifecycle.detach();
    result
}

/// Render the emulated panel, when the backend has one
fn show_panel(panel: &Option<EmuMatrix>) {
    if let Some(emu) = panel {
        print!("{}", emu.render());
    }
}

/// Interactive pattern picker loop
///
/// Errors from a single write are printed and the loop continues; only an
/// explicit exit choice (or end of input) leaves the loop.
fn interactive(
    handle: &MatrixHandle<Bus>,
    panel: &Option<EmuMatrix>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    println!("LED Matrix Controller");
    println!("Choose a pattern to display:");
    for (i, p) in patterns::BUILTINS.iter().enumerate() {
        println!("{}. {}", i + 1, p.description);
    }
    let clear_choice = patterns::BUILTINS.len() + 1;
    let exit_choice = patterns::BUILTINS.len() + 2;
    println!("{}. Clear display", clear_choice);
    println!("{}. Exit", exit_choice);

    loop {
        print!("\nEnter your choice: ");
        std::io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break, // end of input
        };

        let choice: usize = match line.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                println!("Invalid choice. Please try again.");
                continue;
            }
        };

        if choice == exit_choice {
            println!("Exiting...");
            break;
        }

        let result = if choice == clear_choice {
            handle.clear()
        } else if let Some(p) = choice.checked_sub(1).and_then(|i| patterns::BUILTINS.get(i)) {
            handle.write(&p.raster).map(|_| ())
        } else {
            println!("Invalid choice. Please try again.");
            continue;
        };

        match result {
            Ok(()) => {
                println!("Pattern written to LED matrix.");
                show_panel(panel);
            }
            Err(e) => eprintln!("Failed to write to LED matrix: {}", e),
        }
    }

    Ok(())
}
