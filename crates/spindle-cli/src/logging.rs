//! Log file setup
//!
//! The terminal belongs to the UI, so logs go to a file under the local data
//! directory. The filter comes from `SPINDLE_LOG` (default `info`).

use std::fs::{ self, OpenOptions };
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;


/// Returns the path of the log file.
pub fn log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map( |d| d.join( "spindle" ).join( "spindle.log" ) )
}


/// Installs the global subscriber. Returns the log file path, or `None` if
/// logging could not be set up (the player runs without logs then).
pub fn init() -> Option<PathBuf> {
    let path = log_path()?;
    if let Some( parent ) = path.parent() {
        fs::create_dir_all( parent ).ok()?;
    }
    let file = OpenOptions::new().create( true ).append( true ).open( &path ).ok()?;

    let filter = EnvFilter::try_from_env( "SPINDLE_LOG" )
        .unwrap_or_else( |_| EnvFilter::new( "info" ) );

    tracing_subscriber::fmt()
        .with_env_filter( filter )
        .with_writer( Mutex::new( file ) )
        .with_ansi( false )
        .try_init()
        .ok()?;

    Some( path )
}
