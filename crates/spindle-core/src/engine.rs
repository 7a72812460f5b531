//! Playback engine interface
//!
//! The screen never decodes or outputs audio itself. Everything it needs
//! from a playback backend is expressed by the [`PlaybackEngine`] trait:
//! session lifecycle, queue access, transport, loop mode and observation.
//! Engines report asynchronous changes by pushing [`EngineEvent`]s onto
//! the channel handed to them in [`PlaybackEngine::setup`].

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::catalog::Track;
use crate::icons::Icon;


/// Sending half of the engine event channel.
pub type EventSender = mpsc::UnboundedSender<EngineEvent>;

/// Receiving half of the engine event channel, owned by the screen.
pub type EventReceiver = mpsc::UnboundedReceiver<EngineEvent>;


/// Errors reported by a playback engine.
#[derive( Debug, Error )]
pub enum EngineError {
    #[error( "Engine is not set up" )]
    NotInitialized,

    #[error( "No track at queue index {0}" )]
    UnknownTrack( usize ),

    #[error( "Unsupported track source: {0}" )]
    UnsupportedSource( String ),

    #[error( "Audio device error: {0}" )]
    Device( String ),

    #[error( "Decode error: {0}" )]
    Decode( String ),

    #[error( "Seek failed: {0}" )]
    Seek( String ),
}


/// Controls the engine exposes to the OS media session.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum Capability {
    Play,
    Pause,
    SkipToNext,
    SkipToPrevious,
    Stop,
}


impl Capability {
    /// The capability set the player screen declares on mount.
    pub const SCREEN_DEFAULTS: [Capability; 5] = [
        Capability::Play,
        Capability::Pause,
        Capability::SkipToNext,
        Capability::SkipToPrevious,
        Capability::Stop,
    ];
}


/// Playback state as observed from the engine.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Default )]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    Stopped,
    Buffering,
}


/// Loop behavior of the engine queue.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Default )]
pub enum RepeatMode {
    #[default]
    Off,
    Track,
    Queue,
}


impl RepeatMode {
    /// Returns the next mode in the tap cycle: off, track, queue, off.
    pub fn next( self ) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::Track,
            RepeatMode::Track => RepeatMode::Queue,
            RepeatMode::Queue => RepeatMode::Off,
        }
    }


    /// Returns the icon shown for this mode.
    pub fn icon( self ) -> Icon {
        match self {
            RepeatMode::Off => Icon::RepeatOff,
            RepeatMode::Track => Icon::RepeatOnce,
            RepeatMode::Queue => Icon::Repeat,
        }
    }


    /// Returns true if the repeat control should be highlighted.
    pub fn is_active( self ) -> bool {
        self != RepeatMode::Off
    }
}


/// Elapsed position and total duration of the active track.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Default )]
pub struct Progress {
    pub position: Duration,
    pub duration: Duration,
}


impl Progress {
    pub fn new( position: Duration, duration: Duration ) -> Self {
        Self { position, duration }
    }


    /// Builds a progress value from second counts, treating anything
    /// negative or non-finite as zero.
    pub fn from_secs_f64( position: f64, duration: f64 ) -> Self {
        Self {
            position: secs_to_duration( position ),
            duration: secs_to_duration( duration ),
        }
    }


    /// Time left in the track, saturating at zero.
    pub fn remaining( &self ) -> Duration {
        self.duration.saturating_sub( self.position )
    }
}


/// Converts seconds to a `Duration`, mapping negative and non-finite input to zero.
pub(crate) fn secs_to_duration( secs: f64 ) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64( secs ).unwrap_or( Duration::MAX )
    } else {
        Duration::ZERO
    }
}


/// Events pushed by the engine.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum EngineEvent {
    /// The active queue entry changed. `next` is `None` when the queue ran out.
    TrackChanged { previous: Option<usize>, next: Option<usize> },
    StateChanged { state: PlaybackState },
    Error { message: String },
}


/// Creates the channel an engine uses to report events.
pub fn create_event_channel() -> ( EventSender, EventReceiver ) {
    mpsc::unbounded_channel()
}


/// The engine surface the player screen consumes.
///
/// Commands are requests: an engine may apply them immediately or later,
/// and reports the outcome through [`EngineEvent`]s and the polled
/// [`state`](PlaybackEngine::state) / [`progress`](PlaybackEngine::progress).
pub trait PlaybackEngine {
    /// Starts an engine session that reports events on `events`.
    fn setup( &mut self, events: EventSender ) -> Result<(), EngineError>;

    /// Declares the controls exposed to the OS media session.
    fn update_options( &mut self, capabilities: &[Capability] ) -> Result<(), EngineError>;

    /// Appends tracks to the queue.
    fn add( &mut self, tracks: &[Track] ) -> Result<(), EngineError>;

    /// Fetches the queue entry at `index`.
    fn track( &self, index: usize ) -> Result<Option<Track>, EngineError>;

    /// Returns the queue index of the active track, if any.
    fn current_track( &self ) -> Result<Option<usize>, EngineError>;

    fn play( &mut self ) -> Result<(), EngineError>;

    fn pause( &mut self ) -> Result<(), EngineError>;

    fn stop( &mut self ) -> Result<(), EngineError>;

    /// Makes the queue entry at `index` active.
    fn skip( &mut self, index: usize ) -> Result<(), EngineError>;

    /// Seeks within the active track to an absolute position.
    fn seek_to( &mut self, position: Duration ) -> Result<(), EngineError>;

    fn set_repeat_mode( &mut self, mode: RepeatMode ) -> Result<(), EngineError>;

    fn state( &self ) -> PlaybackState;

    fn progress( &self ) -> Progress;

    /// Advances engine-internal clocks such as end-of-track detection.
    fn tick( &mut self ) {}

    /// Ends the session and releases its resources.
    fn destroy( &mut self );
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_repeat_cycle_returns_to_off() {
        let mut mode = RepeatMode::Off;
        for _ in 0..3 {
            mode = mode.next();
        }
        assert_eq!( mode, RepeatMode::Off );
    }


    #[test]
    fn test_repeat_modes_map_to_distinct_icons() {
        let icons = [
            RepeatMode::Off.icon(),
            RepeatMode::Track.icon(),
            RepeatMode::Queue.icon(),
        ];
        assert_eq!( icons[ 0 ].name(), "repeat-off" );
        assert_eq!( icons[ 1 ].name(), "repeat-once" );
        assert_eq!( icons[ 2 ].name(), "repeat" );
    }


    #[test]
    fn test_progress_clamps_bad_input() {
        let progress = Progress::from_secs_f64( -3.0, f64::NAN );
        assert_eq!( progress, Progress::default() );
        assert_eq!( progress.remaining(), Duration::ZERO );
    }


    #[test]
    fn test_remaining_saturates() {
        let progress = Progress::from_secs_f64( 200.0, 185.0 );
        assert_eq!( progress.remaining(), Duration::ZERO );
    }
}
