//! CLI argument parsing

use crate::backends;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ledmatrix")]
#[command(author, version, about = "MAX7219 8x8 LED matrix controller", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Bus backend specification, name:key=val,...
    #[arg(
        short = 'p',
        long,
        global = true,
        default_value = "emu",
        help = backends::backend_help()
    )]
    pub backend: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a built-in pattern to the display
    Show {
        /// Pattern name (see `patterns`)
        #[arg(short = 'n', long)]
        pattern: String,
    },

    /// Blank the display
    Clear,

    /// Interactive pattern picker
    Interactive,

    /// List built-in patterns with previews
    Patterns,
}
