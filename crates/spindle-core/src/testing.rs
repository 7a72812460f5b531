//! Recording engine used by the screen tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::catalog::{ Catalog, Track };
use crate::engine::{
    Capability, EngineError, EngineEvent, EventSender, PlaybackEngine, PlaybackState, Progress,
    RepeatMode,
};


/// A command the screen sent to the engine.
#[derive( Debug, Clone, PartialEq )]
pub enum EngineCall {
    Setup,
    UpdateOptions( Vec<Capability> ),
    Add( usize ),
    Play,
    Pause,
    Stop,
    Skip( usize ),
    SeekTo( Duration ),
    SetRepeatMode( RepeatMode ),
    Destroy,
}


#[derive( Debug, Default )]
struct Shared {
    calls: Vec<EngineCall>,
    queue: Vec<Track>,
    current: Option<usize>,
    state: PlaybackState,
    progress: Progress,
    events: Option<EventSender>,
    fail_setup: bool,
    fail_add: bool,
    fail_current_track: bool,
    fail_repeat: bool,
}


/// Engine fake that records every command and behaves like a simple queue player.
pub struct RecordingEngine {
    shared: Rc<RefCell<Shared>>,
}


/// Test-side handle onto a [`RecordingEngine`] owned by a screen.
#[derive( Clone )]
pub struct EngineHandle {
    shared: Rc<RefCell<Shared>>,
}


impl RecordingEngine {
    pub fn new() -> ( Self, EngineHandle ) {
        let shared = Rc::new( RefCell::new( Shared::default() ) );
        ( Self { shared: Rc::clone( &shared ) }, EngineHandle { shared } )
    }


    fn emit( &self, event: EngineEvent ) {
        if let Some( ref tx ) = self.shared.borrow().events {
            let _ = tx.send( event );
        }
    }


    fn record( &self, call: EngineCall ) {
        self.shared.borrow_mut().calls.push( call );
    }


    fn set_state( &self, state: PlaybackState ) {
        self.shared.borrow_mut().state = state;
        self.emit( EngineEvent::StateChanged { state } );
    }
}


impl PlaybackEngine for RecordingEngine {
    fn setup( &mut self, events: EventSender ) -> Result<(), EngineError> {
        self.record( EngineCall::Setup );
        let mut shared = self.shared.borrow_mut();
        if shared.fail_setup {
            return Err( EngineError::Device( "no output device".into() ) );
        }
        shared.events = Some( events );
        Ok(())
    }


    fn update_options( &mut self, capabilities: &[Capability] ) -> Result<(), EngineError> {
        self.record( EngineCall::UpdateOptions( capabilities.to_vec() ) );
        Ok(())
    }


    fn add( &mut self, tracks: &[Track] ) -> Result<(), EngineError> {
        self.record( EngineCall::Add( tracks.len() ) );
        let first = {
            let mut shared = self.shared.borrow_mut();
            if shared.fail_add {
                return Err( EngineError::Decode( "bad queue".into() ) );
            }
            shared.queue.extend_from_slice( tracks );
            if shared.current.is_none() && !shared.queue.is_empty() {
                shared.current = Some( 0 );
                shared.state = PlaybackState::Paused;
                true
            } else {
                false
            }
        };
        if first {
            self.emit( EngineEvent::TrackChanged { previous: None, next: Some( 0 ) } );
        }
        Ok(())
    }


    fn track( &self, index: usize ) -> Result<Option<Track>, EngineError> {
        Ok( self.shared.borrow().queue.get( index ).cloned() )
    }


    fn current_track( &self ) -> Result<Option<usize>, EngineError> {
        let shared = self.shared.borrow();
        if shared.fail_current_track {
            return Err( EngineError::NotInitialized );
        }
        Ok( shared.current )
    }


    fn play( &mut self ) -> Result<(), EngineError> {
        self.record( EngineCall::Play );
        self.set_state( PlaybackState::Playing );
        Ok(())
    }


    fn pause( &mut self ) -> Result<(), EngineError> {
        self.record( EngineCall::Pause );
        self.set_state( PlaybackState::Paused );
        Ok(())
    }


    fn stop( &mut self ) -> Result<(), EngineError> {
        self.record( EngineCall::Stop );
        self.set_state( PlaybackState::Stopped );
        Ok(())
    }


    fn skip( &mut self, index: usize ) -> Result<(), EngineError> {
        self.record( EngineCall::Skip( index ) );
        let previous = {
            let mut shared = self.shared.borrow_mut();
            if index >= shared.queue.len() {
                return Err( EngineError::UnknownTrack( index ) );
            }
            shared.progress.position = Duration::ZERO;
            shared.current.replace( index )
        };
        self.emit( EngineEvent::TrackChanged { previous, next: Some( index ) } );
        Ok(())
    }


    fn seek_to( &mut self, position: Duration ) -> Result<(), EngineError> {
        self.record( EngineCall::SeekTo( position ) );
        self.shared.borrow_mut().progress.position = position;
        Ok(())
    }


    fn set_repeat_mode( &mut self, mode: RepeatMode ) -> Result<(), EngineError> {
        self.record( EngineCall::SetRepeatMode( mode ) );
        if self.shared.borrow().fail_repeat {
            return Err( EngineError::NotInitialized );
        }
        Ok(())
    }


    fn state( &self ) -> PlaybackState {
        self.shared.borrow().state
    }


    fn progress( &self ) -> Progress {
        self.shared.borrow().progress
    }


    fn destroy( &mut self ) {
        self.record( EngineCall::Destroy );
        let mut shared = self.shared.borrow_mut();
        shared.events = None;
        shared.queue.clear();
        shared.current = None;
    }
}


impl EngineHandle {
    /// All commands recorded so far.
    pub fn calls( &self ) -> Vec<EngineCall> {
        self.shared.borrow().calls.clone()
    }


    /// Forgets the recorded commands.
    pub fn clear_calls( &self ) {
        self.shared.borrow_mut().calls.clear();
    }


    /// Number of recorded commands equal to `call`.
    pub fn count( &self, call: &EngineCall ) -> usize {
        self.shared.borrow().calls.iter().filter( |c| *c == call ).count()
    }


    /// Recorded skip targets, in order.
    pub fn skips( &self ) -> Vec<usize> {
        self.shared.borrow().calls.iter()
            .filter_map( |c| match c {
                EngineCall::Skip( index ) => Some( *index ),
                _ => None,
            })
            .collect()
    }


    /// Commands that start or pause playback.
    pub fn transport_calls( &self ) -> Vec<EngineCall> {
        self.shared.borrow().calls.iter()
            .filter( |c| matches!( c, EngineCall::Play | EngineCall::Pause ) )
            .cloned()
            .collect()
    }


    /// Changes the engine state without the screen asking, as an external
    /// media control would.
    pub fn set_state( &self, state: PlaybackState ) {
        self.shared.borrow_mut().state = state;
    }


    pub fn set_progress( &self, position: f64, duration: f64 ) {
        self.shared.borrow_mut().progress = Progress::from_secs_f64( position, duration );
    }


    /// Moves the engine to another queue entry on its own (end of track, remote control).
    pub fn advance_to( &self, index: usize ) {
        let ( previous, events ) = {
            let mut shared = self.shared.borrow_mut();
            ( shared.current.replace( index ), shared.events.clone() )
        };
        if let Some( tx ) = events {
            let _ = tx.send( EngineEvent::TrackChanged { previous, next: Some( index ) } );
        }
    }


    /// Sends `event` as if the engine raised it.
    pub fn emit( &self, event: EngineEvent ) {
        let events = self.shared.borrow().events.clone();
        if let Some( tx ) = events {
            let _ = tx.send( event );
        }
    }


    /// Empties the queue so no track is loaded.
    pub fn unload( &self ) {
        let mut shared = self.shared.borrow_mut();
        shared.current = None;
        shared.state = PlaybackState::Idle;
    }


    pub fn fail_setup( &self ) {
        self.shared.borrow_mut().fail_setup = true;
    }


    pub fn fail_add( &self ) {
        self.shared.borrow_mut().fail_add = true;
    }


    pub fn fail_current_track( &self ) {
        self.shared.borrow_mut().fail_current_track = true;
    }


    pub fn fail_repeat( &self ) {
        self.shared.borrow_mut().fail_repeat = true;
    }
}


/// Catalog of `count` tracks named `Track 0`, `Track 1`, ...
pub fn sample_catalog( count: usize ) -> Catalog {
    let tracks = ( 0..count )
        .map( |i| Track {
            id: format!( "t{}", i ),
            url: format!( "/music/{}.mp3", i ),
            title: format!( "Track {}", i ),
            artist: format!( "Artist {}", i ),
            artwork: Some( format!( "art/{}.jpg", i ) ),
        })
        .collect();
    Catalog::new( tracks ).expect( "sample ids are unique" )
}
