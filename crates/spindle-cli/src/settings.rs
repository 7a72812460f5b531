//! Application settings management
//!
//! Persistent settings: default catalog location, carousel skip policy and
//! frame rate.

use std::fs;
use std::io;
use std::path::{ Path, PathBuf };

use serde::{ Deserialize, Serialize };
use spindle_core::SkipPolicy;


/// Application settings.
#[derive( Debug, Clone, Serialize, Deserialize )]
#[serde( default )]
pub struct Settings {
    /// Catalog loaded when none is given on the command line
    pub catalog: Option<PathBuf>,

    /// When a carousel drag switches tracks
    pub skip_policy: SkipPolicy,

    /// Milliseconds between frames
    pub frame_rate_ms: u64,
}


impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: None,
            skip_policy: SkipPolicy::OnSettle,
            frame_rate_ms: 50,
        }
    }
}


impl Settings {
    /// Returns the path to the settings file.
    fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map( |p| p.join( "spindle" ).join( "settings.json" ) )
    }


    /// Catalog location used when neither the command line nor the settings name one.
    pub fn default_catalog_path() -> Option<PathBuf> {
        dirs::audio_dir()
            .or_else( dirs::home_dir )
            .map( |p| p.join( "spindle" ).join( "catalog.json" ) )
    }


    /// Loads the saved settings; anything missing or unreadable falls back
    /// to defaults.
    pub fn load() -> Self {
        Self::settings_path()
            .map( |path| Self::load_from( &path ) )
            .unwrap_or_default()
    }


    fn load_from( path: &Path ) -> Self {
        match fs::read_to_string( path ) {
            Ok( contents ) => Self::from_json( &contents ),
            Err( e ) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err( e ) => {
                tracing::warn!( "Failed to read settings {}: {}", path.display(), e );
                Self::default()
            }
        }
    }


    /// Parses settings, falling back to defaults on malformed input.
    fn from_json( contents: &str ) -> Self {
        serde_json::from_str( contents ).unwrap_or_else( |e| {
            tracing::warn!( "Ignoring malformed settings: {}", e );
            Self::default()
        })
    }


    /// Persists the settings; failures are logged.
    pub fn save( &self ) {
        let Some( path ) = Self::settings_path() else {
            return;
        };
        match self.save_to( &path ) {
            Ok(()) => tracing::debug!( "Settings saved to {}", path.display() ),
            Err( e ) => tracing::warn!( "Failed to save settings {}: {}", path.display(), e ),
        }
    }


    fn save_to( &self, path: &Path ) -> io::Result<()> {
        if let Some( parent ) = path.parent() {
            fs::create_dir_all( parent )?;
        }
        let json = serde_json::to_string_pretty( self ).map_err( io::Error::other )?;
        fs::write( path, json )
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings = Settings::from_json( r#"{ "skip_policy": "continuous" }"# );
        assert_eq!( settings.skip_policy, SkipPolicy::Continuous );
        assert_eq!( settings.frame_rate_ms, 50 );
        assert!( settings.catalog.is_none() );
    }


    #[test]
    fn test_malformed_settings_fall_back() {
        let settings = Settings::from_json( "{ not json" );
        assert_eq!( settings.skip_policy, SkipPolicy::OnSettle );
    }


    #[test]
    fn test_saved_settings_load_back() {
        let dir = std::env::temp_dir().join( format!( "spindle-settings-{}", std::process::id() ) );
        let path = dir.join( "nested" ).join( "settings.json" );

        assert_eq!( Settings::load_from( &path ).skip_policy, SkipPolicy::OnSettle );

        let settings = Settings {
            catalog: Some( PathBuf::from( "/music/catalog.json" ) ),
            skip_policy: SkipPolicy::Continuous,
            frame_rate_ms: 20,
        };
        settings.save_to( &path ).unwrap();

        let loaded = Settings::load_from( &path );
        assert_eq!( loaded.catalog, settings.catalog );
        assert_eq!( loaded.skip_policy, SkipPolicy::Continuous );
        assert_eq!( loaded.frame_rate_ms, 20 );

        let _ = fs::remove_dir_all( &dir );
    }
}
