//! Device-backed playback engine
//!
//! Plays the queue through the default audio output using rodio. One sink
//! holds the active track; end of track is detected on [`tick`] and the
//! queue advances according to the repeat mode.
//!
//! [`tick`]: PlaybackEngine::tick

use std::fs::File;
use std::io::BufReader;
use std::path::{ Path, PathBuf };
use std::time::Duration;

use rodio::{ Decoder, OutputStream, OutputStreamHandle, Sink, Source };

use crate::catalog::Track;
use crate::engine::{
    Capability, EngineError, EngineEvent, EventSender, PlaybackEngine, PlaybackState, Progress,
    RepeatMode,
};


/// Keeps the output stream alive alongside the handle sinks are created from.
struct Output {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}


/// Playback engine that drives the default audio device.
#[derive( Default )]
pub struct DeviceEngine {
    output: Option<Output>,
    sink: Option<Sink>,
    queue: Vec<Track>,
    current: Option<usize>,
    state: PlaybackState,
    repeat: RepeatMode,
    capabilities: Vec<Capability>,
    duration: Option<Duration>,
    events: Option<EventSender>,
}


impl DeviceEngine {
    /// Creates an engine; the audio device is opened by `setup`.
    pub fn new() -> Self {
        Self::default()
    }


    /// Capabilities declared for the OS media session.
    pub fn capabilities( &self ) -> &[Capability] {
        &self.capabilities
    }


    fn emit( &self, event: EngineEvent ) {
        if let Some( ref tx ) = self.events {
            let _ = tx.send( event );
        }
    }


    fn set_state( &mut self, state: PlaybackState ) {
        if self.state != state {
            self.state = state;
            self.emit( EngineEvent::StateChanged { state } );
        }
    }


    fn output( &self ) -> Result<&Output, EngineError> {
        self.output.as_ref().ok_or( EngineError::NotInitialized )
    }


    /// Replaces the sink with a freshly decoded copy of the current track.
    fn load_current( &mut self, autoplay: bool ) -> Result<(), EngineError> {
        let index = self.current.ok_or( EngineError::UnknownTrack( 0 ) )?;
        let track = self.queue.get( index ).ok_or( EngineError::UnknownTrack( index ) )?;
        let path = local_path( &track.url )?;

        if let Some( sink ) = self.sink.take() {
            sink.stop();
        }
        self.duration = None;
        self.set_state( PlaybackState::Buffering );

        let ( sink, duration ) = match self.open_sink( &path, autoplay ) {
            Ok( opened ) => opened,
            Err( e ) => {
                self.set_state( PlaybackState::Stopped );
                return Err( e );
            }
        };

        tracing::info!( "Loaded track {}: {:?}", index, path );
        self.sink = Some( sink );
        self.duration = duration;
        self.set_state( if autoplay { PlaybackState::Playing } else { PlaybackState::Paused } );
        Ok(())
    }


    /// Decodes `path` into a new sink on the output device.
    fn open_sink( &self, path: &Path, autoplay: bool ) -> Result<( Sink, Option<Duration> ), EngineError> {
        let file = File::open( path )
            .map_err( |e| EngineError::Decode( format!( "{}: {}", path.display(), e ) ) )?;
        let source = Decoder::new( BufReader::new( file ) )
            .map_err( |e| EngineError::Decode( format!( "{}: {}", path.display(), e ) ) )?;
        let duration = source.total_duration();

        let sink = Sink::try_new( &self.output()?.handle )
            .map_err( |e| EngineError::Device( e.to_string() ) )?;
        if !autoplay {
            sink.pause();
        }
        sink.append( source );
        Ok( ( sink, duration ) )
    }


    /// Switches to `index`, keeping the play/pause state.
    fn change_track( &mut self, index: usize, autoplay: bool ) -> Result<(), EngineError> {
        let previous = self.current.replace( index );
        let result = self.load_current( autoplay );
        if result.is_err() {
            self.set_state( PlaybackState::Stopped );
        }
        if previous != Some( index ) {
            self.emit( EngineEvent::TrackChanged { previous, next: Some( index ) } );
        }
        result
    }


    /// Picks what plays after the current track ends naturally.
    fn next_after_end( &self ) -> Option<usize> {
        let current = self.current?;
        match self.repeat {
            RepeatMode::Track => Some( current ),
            RepeatMode::Queue => Some( ( current + 1 ) % self.queue.len().max( 1 ) ),
            RepeatMode::Off => {
                let next = current + 1;
                ( next < self.queue.len() ).then_some( next )
            }
        }
    }
}


/// Resolves a track URL to a local file path.
fn local_path( url: &str ) -> Result<PathBuf, EngineError> {
    if let Some( path ) = url.strip_prefix( "file://" ) {
        return Ok( PathBuf::from( path ) );
    }
    if url.contains( "://" ) {
        return Err( EngineError::UnsupportedSource( url.to_string() ) );
    }
    Ok( PathBuf::from( url ) )
}


impl PlaybackEngine for DeviceEngine {
    fn setup( &mut self, events: EventSender ) -> Result<(), EngineError> {
        let ( stream, handle ) = OutputStream::try_default()
            .map_err( |e| EngineError::Device( e.to_string() ) )?;
        self.output = Some( Output { _stream: stream, handle } );
        self.events = Some( events );
        tracing::info!( "Audio output opened" );
        Ok(())
    }


    fn update_options( &mut self, capabilities: &[Capability] ) -> Result<(), EngineError> {
        self.output()?;
        self.capabilities = capabilities.to_vec();
        tracing::debug!( "Capabilities: {:?}", self.capabilities );
        Ok(())
    }


    fn add( &mut self, tracks: &[Track] ) -> Result<(), EngineError> {
        self.output()?;
        self.queue.extend_from_slice( tracks );
        tracing::info!( "Queued {} tracks", tracks.len() );

        if self.current.is_none() && !self.queue.is_empty() {
            if let Err( e ) = self.change_track( 0, false ) {
                // The queue is usable even if the first file is not.
                tracing::warn!( "Failed to load first track: {}", e );
                self.emit( EngineEvent::Error { message: e.to_string() } );
            }
        }
        Ok(())
    }


    fn track( &self, index: usize ) -> Result<Option<Track>, EngineError> {
        Ok( self.queue.get( index ).cloned() )
    }


    fn current_track( &self ) -> Result<Option<usize>, EngineError> {
        self.output()?;
        Ok( self.current )
    }


    fn play( &mut self ) -> Result<(), EngineError> {
        match self.sink {
            Some( ref sink ) => {
                sink.play();
                self.set_state( PlaybackState::Playing );
                Ok(())
            }
            None => self.load_current( true ),
        }
    }


    fn pause( &mut self ) -> Result<(), EngineError> {
        if let Some( ref sink ) = self.sink {
            sink.pause();
            self.set_state( PlaybackState::Paused );
        }
        Ok(())
    }


    fn stop( &mut self ) -> Result<(), EngineError> {
        if let Some( sink ) = self.sink.take() {
            sink.stop();
        }
        self.set_state( PlaybackState::Stopped );
        Ok(())
    }


    fn skip( &mut self, index: usize ) -> Result<(), EngineError> {
        if index >= self.queue.len() {
            return Err( EngineError::UnknownTrack( index ) );
        }
        let autoplay = self.state == PlaybackState::Playing;
        self.change_track( index, autoplay )
    }


    fn seek_to( &mut self, position: Duration ) -> Result<(), EngineError> {
        let sink = self.sink.as_ref().ok_or( EngineError::UnknownTrack( self.current.unwrap_or( 0 ) ) )?;
        sink.try_seek( position ).map_err( |e| EngineError::Seek( e.to_string() ) )
    }


    fn set_repeat_mode( &mut self, mode: RepeatMode ) -> Result<(), EngineError> {
        self.output()?;
        self.repeat = mode;
        Ok(())
    }


    fn state( &self ) -> PlaybackState {
        self.state
    }


    fn progress( &self ) -> Progress {
        let position = self.sink.as_ref().map( |s| s.get_pos() ).unwrap_or_default();
        Progress::new( position, self.duration.unwrap_or_default() )
    }


    fn tick( &mut self ) {
        let ended = self.state == PlaybackState::Playing
            && self.sink.as_ref().map( |s| s.empty() ).unwrap_or( false );
        if !ended {
            return;
        }

        match self.next_after_end() {
            Some( next ) if Some( next ) == self.current => {
                if let Err( e ) = self.load_current( true ) {
                    self.emit( EngineEvent::Error { message: e.to_string() } );
                }
            }
            Some( next ) => {
                if let Err( e ) = self.change_track( next, true ) {
                    self.emit( EngineEvent::Error { message: e.to_string() } );
                }
            }
            None => {
                tracing::info!( "Reached end of queue" );
                if let Some( sink ) = self.sink.take() {
                    sink.stop();
                }
                self.set_state( PlaybackState::Stopped );
                self.emit( EngineEvent::TrackChanged { previous: self.current, next: None } );
            }
        }
    }


    fn destroy( &mut self ) {
        if let Some( sink ) = self.sink.take() {
            sink.stop();
        }
        self.output = None;
        self.queue.clear();
        self.current = None;
        self.events = None;
        self.state = PlaybackState::Idle;
        tracing::info!( "Audio output closed" );
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    fn queue_of( count: usize ) -> Vec<Track> {
        ( 0..count )
            .map( |i| Track {
                id: i.to_string(),
                url: format!( "/music/{}.mp3", i ),
                title: format!( "T{}", i ),
                artist: "A".into(),
                artwork: None,
            })
            .collect()
    }


    fn engine_at( count: usize, current: usize, repeat: RepeatMode ) -> DeviceEngine {
        DeviceEngine {
            queue: queue_of( count ),
            current: Some( current ),
            repeat,
            ..DeviceEngine::default()
        }
    }


    #[test]
    fn test_local_path() {
        assert_eq!( local_path( "/music/a.mp3" ).unwrap(), PathBuf::from( "/music/a.mp3" ) );
        assert_eq!( local_path( "file:///music/a.mp3" ).unwrap(), PathBuf::from( "/music/a.mp3" ) );
        assert!( matches!( local_path( "https://x/a.mp3" ), Err( EngineError::UnsupportedSource( _ ) ) ) );
    }


    #[test]
    fn test_next_after_end() {
        assert_eq!( engine_at( 3, 1, RepeatMode::Off ).next_after_end(), Some( 2 ) );
        assert_eq!( engine_at( 3, 2, RepeatMode::Off ).next_after_end(), None );
        assert_eq!( engine_at( 3, 2, RepeatMode::Queue ).next_after_end(), Some( 0 ) );
        assert_eq!( engine_at( 3, 1, RepeatMode::Track ).next_after_end(), Some( 1 ) );
    }


    #[test]
    fn test_commands_before_setup_fail() {
        let mut engine = DeviceEngine::new();
        assert!( matches!( engine.add( &queue_of( 1 ) ), Err( EngineError::NotInitialized ) ) );
        assert!( matches!( engine.current_track(), Err( EngineError::NotInitialized ) ) );
        assert!( matches!( engine.skip( 0 ), Err( EngineError::UnknownTrack( 0 ) ) ) );
        assert_eq!( engine.progress(), Progress::default() );
    }


    #[test]
    fn test_failed_load_does_not_stay_buffering() {
        let mut engine = DeviceEngine {
            queue: vec![ Track {
                id: "gone".into(),
                url: "/nonexistent/spindle/gone.mp3".into(),
                title: "Gone".into(),
                artist: "A".into(),
                artwork: None,
            }],
            current: Some( 0 ),
            state: PlaybackState::Paused,
            ..DeviceEngine::default()
        };

        assert!( matches!( engine.play(), Err( EngineError::Decode( _ ) ) ) );
        assert_eq!( engine.state(), PlaybackState::Stopped );

        engine.repeat = RepeatMode::Track;
        engine.state = PlaybackState::Playing;
        assert!( matches!( engine.load_current( true ), Err( EngineError::Decode( _ ) ) ) );
        assert_eq!( engine.state(), PlaybackState::Stopped );
    }
}
