//! Command-line argument parsing for Spindle.

use std::path::PathBuf;

use clap::Parser;


/// Spindle - a swipeable now-playing screen for the terminal.
#[derive( Parser, Debug )]
#[command( name = "spindle" )]
#[command( version, about, long_about = None )]
pub struct Args {
    /// Track catalog (JSON array of id/url/title/artist/artwork records).
    #[arg( short, long )]
    pub catalog: Option<PathBuf>,

    /// Switch tracks on every page crossed while dragging, not just on release.
    #[arg( long )]
    pub skip_on_drag: bool,

    /// Play these audio files instead of a catalog.
    #[arg( trailing_var_arg = true )]
    pub files: Vec<PathBuf>,
}
