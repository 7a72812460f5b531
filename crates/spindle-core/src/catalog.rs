//! Track catalog
//!
//! The fixed, ordered track list the screen loads into the engine on mount.
//! Catalog files are JSON arrays of `{ id, url, title, artist, artwork }`
//! records.

use std::collections::HashSet;
use std::fs;
use std::path::{ Path, PathBuf };

use serde::{ Deserialize, Serialize };
use thiserror::Error;


/// Errors that can occur while loading a catalog.
#[derive( Debug, Error )]
pub enum CatalogError {
    #[error( "IO error: {0}" )]
    Io( #[from] std::io::Error ),

    #[error( "Invalid catalog: {0}" )]
    Parse( #[from] serde_json::Error ),

    #[error( "Duplicate track id: {0}" )]
    DuplicateId( String ),

    #[error( "Catalog not found: {0}" )]
    NotFound( PathBuf ),
}


/// A catalog entry.
#[derive( Debug, Clone, PartialEq, Eq, Serialize, Deserialize )]
pub struct Track {
    pub id: String,
    /// Audio source (file path or `file://` URL).
    pub url: String,
    pub title: String,
    pub artist: String,
    /// Artwork reference, if the track has one.
    #[serde( default )]
    pub artwork: Option<String>,
}


/// Ordered, immutable list of tracks.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct Catalog {
    tracks: Vec<Track>,
}


impl Catalog {
    /// Builds a catalog, rejecting duplicate ids.
    pub fn new( tracks: Vec<Track> ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for track in &tracks {
            if !seen.insert( track.id.as_str() ) {
                return Err( CatalogError::DuplicateId( track.id.clone() ) );
            }
        }
        Ok( Self { tracks } )
    }


    /// Parses a catalog from JSON text.
    pub fn from_json_str( json: &str ) -> Result<Self, CatalogError> {
        let tracks: Vec<Track> = serde_json::from_str( json )?;
        Self::new( tracks )
    }


    /// Loads a catalog file.
    pub fn load( path: &Path ) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err( CatalogError::NotFound( path.to_path_buf() ) );
        }
        let contents = fs::read_to_string( path )?;
        let catalog = Self::from_json_str( &contents )?;
        tracing::info!( "Loaded {} tracks from {:?}", catalog.len(), path );
        Ok( catalog )
    }


    /// Builds a catalog from bare audio files, naming each track after its file.
    pub fn from_paths( paths: impl IntoIterator<Item = PathBuf> ) -> Self {
        let tracks = paths.into_iter()
            .enumerate()
            .map( |( idx, path )| {
                let title = path.file_stem()
                    .map( |s| s.to_string_lossy().to_string() )
                    .unwrap_or_else( || format!( "Track {}", idx + 1 ) );
                Track {
                    id: idx.to_string(),
                    url: path.to_string_lossy().to_string(),
                    title,
                    artist: "Unknown Artist".to_string(),
                    artwork: None,
                }
            })
            .collect();
        Self { tracks }
    }


    /// Gets all tracks in order.
    pub fn tracks( &self ) -> &[Track] {
        &self.tracks
    }


    /// Gets the track at `index`.
    pub fn get( &self, index: usize ) -> Option<&Track> {
        self.tracks.get( index )
    }


    /// Finds the position of the track with the given id.
    pub fn position_of( &self, id: &str ) -> Option<usize> {
        self.tracks.iter().position( |t| t.id == id )
    }


    pub fn len( &self ) -> usize {
        self.tracks.len()
    }


    pub fn is_empty( &self ) -> bool {
        self.tracks.is_empty()
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    const SAMPLE: &str = r#"[
        { "id": "1", "url": "music/one.mp3", "title": "One", "artist": "A", "artwork": "art/one.jpg" },
        { "id": "2", "url": "file:///music/two.flac", "title": "Two", "artist": "B" }
    ]"#;


    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::from_json_str( SAMPLE ).unwrap();
        assert_eq!( catalog.len(), 2 );
        assert_eq!( catalog.get( 0 ).unwrap().artwork.as_deref(), Some( "art/one.jpg" ) );
        assert_eq!( catalog.get( 1 ).unwrap().artwork, None );
        assert_eq!( catalog.position_of( "2" ), Some( 1 ) );
    }


    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            { "id": "x", "url": "a.mp3", "title": "A", "artist": "A" },
            { "id": "x", "url": "b.mp3", "title": "B", "artist": "B" }
        ]"#;
        let result = Catalog::from_json_str( json );
        assert!( matches!( result, Err( CatalogError::DuplicateId( id ) ) if id == "x" ) );
    }


    #[test]
    fn test_missing_field_is_parse_error() {
        let result = Catalog::from_json_str( r#"[ { "id": "1", "title": "No url", "artist": "A" } ]"# );
        assert!( matches!( result, Err( CatalogError::Parse( _ ) ) ) );
    }


    #[test]
    fn test_from_paths() {
        let catalog = Catalog::from_paths( vec![
            PathBuf::from( "/music/First Song.mp3" ),
            PathBuf::from( "/music/second.ogg" ),
        ]);
        assert_eq!( catalog.len(), 2 );
        assert_eq!( catalog.get( 0 ).unwrap().title, "First Song" );
        assert_eq!( catalog.get( 1 ).unwrap().id, "1" );
    }


    #[test]
    fn test_load_missing_file() {
        let result = Catalog::load( Path::new( "/definitely/not/here.json" ) );
        assert!( matches!( result, Err( CatalogError::NotFound( _ ) ) ) );
    }
}
