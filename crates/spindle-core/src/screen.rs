//! Player screen
//!
//! Owns the engine session for as long as the screen is mounted and turns
//! user gestures into engine commands. Rendering is left to the caller: the
//! screen only exposes what to draw (carousel position, now-playing
//! metadata, icons, progress labels).
//!
//! The carousel and the engine's active track are kept in lock-step through
//! a single writer, [`PlayerScreen::change_active_track`] for user changes
//! and the engine's `TrackChanged` events for everything else. Both land in
//! the same private update, which is also the only place now-playing
//! metadata is written.

use std::time::Duration;

use serde::{ Deserialize, Serialize };

use crate::carousel::Carousel;
use crate::catalog::{ Catalog, Track };
use crate::clock::ProgressLabels;
use crate::engine::{
    self, Capability, EngineError, EngineEvent, EventReceiver, EventSender, PlaybackEngine,
    PlaybackState, Progress, RepeatMode,
};
use crate::icons::Icon;
use crate::slider::SeekSlider;


/// When a carousel drag is allowed to switch tracks.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize )]
#[serde( rename_all = "snake_case" )]
pub enum SkipPolicy {
    /// Every page boundary crossed mid-drag switches the engine's track.
    Continuous,

    /// Only the page the carousel settles on switches the track.
    #[default]
    OnSettle,
}


impl SkipPolicy {
    pub fn toggled( self ) -> Self {
        match self {
            SkipPolicy::Continuous => SkipPolicy::OnSettle,
            SkipPolicy::OnSettle => SkipPolicy::Continuous,
        }
    }


    pub fn name( &self ) -> &'static str {
        match self {
            SkipPolicy::Continuous => "skip while dragging",
            SkipPolicy::OnSettle => "skip on settle",
        }
    }
}


/// Options fixed when the screen is mounted.
#[derive( Debug, Clone, Copy, PartialEq )]
pub struct ScreenOptions {
    pub skip_policy: SkipPolicy,
    /// Initial carousel page width; the renderer updates it on layout.
    pub page_width: f64,
}


impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            skip_policy: SkipPolicy::default(),
            page_width: 1.0,
        }
    }
}


/// Metadata of the track the engine is playing.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub artwork: Option<String>,
}


impl From<Track> for NowPlaying {
    fn from( track: Track ) -> Self {
        Self {
            title: track.title,
            artist: track.artist,
            artwork: track.artwork,
        }
    }
}


/// Who asked for a track change.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
enum Origin {
    User,
    Engine,
}


/// The player screen and the engine session it owns.
pub struct PlayerScreen<E: PlaybackEngine> {
    engine: E,
    catalog: Catalog,
    carousel: Carousel,
    slider: SeekSlider,
    skip_policy: SkipPolicy,
    /// Carousel index the engine was last synced to.
    active_index: usize,
    repeat_mode: RepeatMode,
    now_playing: Option<NowPlaying>,
    playback_state: PlaybackState,
    progress: Progress,
    /// Dropped on unmount, which stops event delivery.
    events: Option<EventReceiver>,
    ready: bool,
    disposed: bool,
    last_error: Option<String>,
}


impl<E: PlaybackEngine> PlayerScreen<E> {
    /// Mounts the screen: sets up the engine session, declares its
    /// capabilities and queues the catalog.
    ///
    /// A failing step is logged and leaves the screen mounted but inert.
    pub fn mount( mut engine: E, catalog: Catalog, options: ScreenOptions ) -> Self {
        let ( tx, rx ) = engine::create_event_channel();
        let bootstrap = Self::bootstrap( &mut engine, &catalog, tx );

        let mut screen = Self {
            engine,
            carousel: Carousel::new( catalog.len(), options.page_width ),
            catalog,
            slider: SeekSlider::new(),
            skip_policy: options.skip_policy,
            active_index: 0,
            repeat_mode: RepeatMode::Off,
            now_playing: None,
            playback_state: PlaybackState::Idle,
            progress: Progress::default(),
            events: Some( rx ),
            ready: bootstrap.is_ok(),
            disposed: false,
            last_error: None,
        };

        match bootstrap {
            Ok(()) => tracing::info!( "Player session ready with {} tracks", screen.catalog.len() ),
            Err( e ) => {
                tracing::error!( "Player setup failed, controls disabled: {}", e );
                screen.last_error = Some( format!( "Player setup failed: {}", e ) );
            }
        }

        screen.update();
        screen
    }


    fn bootstrap( engine: &mut E, catalog: &Catalog, events: EventSender ) -> Result<(), EngineError> {
        engine.setup( events )?;
        engine.update_options( &Capability::SCREEN_DEFAULTS )?;
        engine.add( catalog.tracks() )?;
        Ok(())
    }


    /// Toggles between playing and paused.
    ///
    /// Does nothing when no track is loaded. The engine state is read right
    /// before deciding, so a change landing in between (an external media
    /// key, say) is not seen; the command then acts on the stale state.
    pub fn toggle_play_pause( &mut self ) {
        if !self.ready {
            return;
        }

        let current = match self.engine.current_track() {
            Ok( current ) => current,
            Err( e ) => {
                tracing::debug!( "Current track unavailable, treating as none: {}", e );
                None
            }
        };
        if current.is_none() {
            tracing::debug!( "Toggle ignored: no track loaded" );
            return;
        }

        let result = if self.engine.state() == PlaybackState::Playing {
            self.engine.pause()
        } else {
            self.engine.play()
        };
        if let Err( e ) = result {
            self.report( "Play/pause", e );
        }
    }


    /// Scrolls the carousel one page forward; the scroll switches the track.
    pub fn skip_to_next( &mut self ) {
        let offset = ( self.active_index as f64 + 1.0 ) * self.carousel.page_width();
        self.scroll_to( offset );
    }


    /// Scrolls the carousel one page back; the scroll switches the track.
    pub fn skip_to_previous( &mut self ) {
        let offset = ( self.active_index as f64 - 1.0 ) * self.carousel.page_width();
        self.scroll_to( offset );
    }


    /// Programmatic scroll: the carousel jumps to `offset` and settles there.
    fn scroll_to( &mut self, offset: f64 ) {
        let offset = self.carousel.scroll_to_offset( offset );
        self.on_scroll( offset );
        self.on_scroll_settled();
    }


    /// Reacts to the carousel scroll offset changing.
    pub fn on_scroll( &mut self, offset: f64 ) {
        if self.disposed {
            return;
        }
        let offset = self.carousel.scroll_to_offset( offset );
        let index = self.carousel.index_at( offset );
        if self.skip_policy == SkipPolicy::Continuous && index != self.active_index {
            self.change_active_track( index );
        }
    }


    /// Reacts to the carousel coming to rest.
    pub fn on_scroll_settled( &mut self ) {
        if self.disposed {
            return;
        }
        let index = self.carousel.index();
        if index != self.active_index {
            self.change_active_track( index );
        }
    }


    pub fn begin_carousel_drag( &mut self ) {
        self.carousel.begin_drag();
    }


    /// Moves the carousel by `delta` from where the drag started.
    pub fn drag_carousel( &mut self, delta: f64 ) {
        let offset = self.carousel.drag_by( delta );
        self.on_scroll( offset );
    }


    /// Lets go of the carousel; it snaps to the nearest page.
    pub fn release_carousel( &mut self ) {
        let offset = self.carousel.end_drag();
        self.on_scroll( offset );
        self.on_scroll_settled();
    }


    /// Makes `index` the active track: moves the carousel there, tells the
    /// engine to skip and refreshes the now-playing metadata.
    pub fn change_active_track( &mut self, index: usize ) {
        self.apply_active_track( index, Origin::User );
    }


    fn apply_active_track( &mut self, index: usize, origin: Origin ) {
        if index >= self.catalog.len() {
            tracing::debug!( "Ignoring track change to {}: out of range", index );
            return;
        }

        self.active_index = index;
        if !self.carousel.is_dragging() && self.carousel.index() != index {
            self.carousel.scroll_to_index( index );
        }

        if !self.ready {
            return;
        }

        if origin == Origin::User {
            tracing::debug!( "Skipping to track {}", index );
            if let Err( e ) = self.engine.skip( index ) {
                self.report( "Skip", e );
            }
        }

        match self.engine.track( index ) {
            Ok( Some( track ) ) => self.now_playing = Some( NowPlaying::from( track ) ),
            Ok( None ) => tracing::debug!( "Engine has no track at {}", index ),
            Err( e ) => self.report( "Track lookup", e ),
        }
    }


    /// Cycles the repeat mode (off, track, queue). The engine is told first;
    /// the displayed mode only changes if it accepted.
    pub fn cycle_repeat_mode( &mut self ) {
        if !self.ready {
            return;
        }
        let next = self.repeat_mode.next();
        match self.engine.set_repeat_mode( next ) {
            Ok(()) => {
                tracing::info!( "Repeat mode: {:?}", next );
                self.repeat_mode = next;
            }
            Err( e ) => self.report( "Repeat mode", e ),
        }
    }


    /// Seeks the active track to an absolute position.
    pub fn seek( &mut self, position: Duration ) {
        if !self.ready {
            return;
        }
        match self.engine.seek_to( position ) {
            Ok(()) => {
                tracing::debug!( "Seeked to {:?}", position );
                self.progress.position = position;
                self.slider.sync( &self.progress );
            }
            Err( e ) => self.report( "Seek", e ),
        }
    }


    /// Seeks relative to the current position, staying inside the track
    /// when its duration is known.
    pub fn seek_by( &mut self, delta_secs: f64 ) {
        let mut target = self.progress.position.as_secs_f64() + delta_secs;
        if !self.progress.duration.is_zero() {
            target = target.min( self.progress.duration.as_secs_f64() );
        }
        self.seek( engine::secs_to_duration( target ) );
    }


    /// Grabs the slider thumb at `value` seconds.
    pub fn begin_seek( &mut self, value: f64 ) {
        self.slider.begin_drag( value );
    }


    /// Moves the grabbed slider thumb; the engine is not told yet.
    pub fn drag_seek( &mut self, value: f64 ) {
        self.slider.drag_to( value );
    }


    /// Releases the slider thumb and seeks to where it was let go.
    pub fn release_seek( &mut self ) {
        if let Some( target ) = self.slider.release() {
            self.seek( engine::secs_to_duration( target ) );
        }
    }


    /// Runs once per frame: ticks the engine, handles its events and
    /// refreshes the observed state and progress.
    pub fn update( &mut self ) {
        if self.disposed {
            return;
        }

        if self.ready {
            self.engine.tick();
        }

        let mut pending = Vec::new();
        if let Some( rx ) = self.events.as_mut() {
            while let Ok( event ) = rx.try_recv() {
                pending.push( event );
            }
        }
        for event in pending {
            self.handle_event( event );
        }

        if self.ready {
            self.playback_state = self.engine.state();
            self.progress = self.engine.progress();
        }
        self.slider.sync( &self.progress );
    }


    fn handle_event( &mut self, event: EngineEvent ) {
        match event {
            EngineEvent::TrackChanged { next: Some( next ), .. } => {
                // Events can trail behind rapid skips; the engine's own view wins.
                let index = self.engine.current_track()
                    .ok()
                    .flatten()
                    .unwrap_or( next );
                self.apply_active_track( index, Origin::Engine );
            }
            EngineEvent::TrackChanged { next: None, .. } => {
                tracing::debug!( "Queue ended" );
            }
            EngineEvent::StateChanged { state } => {
                self.playback_state = state;
            }
            EngineEvent::Error { message } => {
                tracing::warn!( "Engine error: {}", message );
                self.last_error = Some( message );
            }
        }
    }


    /// Unmounts the screen, ending the engine session.
    pub fn unmount( mut self ) {
        self.dispose();
    }


    fn dispose( &mut self ) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.events = None;
        self.engine.destroy();
        tracing::info!( "Player session closed" );
    }


    fn report( &mut self, context: &str, error: EngineError ) {
        tracing::warn!( "{} failed: {}", context, error );
        self.last_error = Some( format!( "{} failed: {}", context, error ) );
    }


    /// Updates the carousel page width after a layout change.
    pub fn set_page_width( &mut self, page_width: f64 ) {
        self.carousel.set_page_width( page_width );
    }


    pub fn set_skip_policy( &mut self, policy: SkipPolicy ) {
        self.skip_policy = policy;
    }


    pub fn skip_policy( &self ) -> SkipPolicy {
        self.skip_policy
    }


    /// True once the engine session was set up successfully.
    pub fn is_ready( &self ) -> bool {
        self.ready
    }


    pub fn engine( &self ) -> &E {
        &self.engine
    }


    pub fn catalog( &self ) -> &Catalog {
        &self.catalog
    }


    pub fn carousel( &self ) -> &Carousel {
        &self.carousel
    }


    pub fn slider( &self ) -> &SeekSlider {
        &self.slider
    }


    /// The carousel index the engine is synced to.
    pub fn active_index( &self ) -> usize {
        self.active_index
    }


    pub fn now_playing( &self ) -> Option<&NowPlaying> {
        self.now_playing.as_ref()
    }


    pub fn repeat_mode( &self ) -> RepeatMode {
        self.repeat_mode
    }


    pub fn repeat_icon( &self ) -> Icon {
        self.repeat_mode.icon()
    }


    pub fn play_icon( &self ) -> Icon {
        Icon::for_state( self.playback_state )
    }


    pub fn playback_state( &self ) -> PlaybackState {
        self.playback_state
    }


    pub fn progress( &self ) -> Progress {
        self.progress
    }


    /// Elapsed and remaining labels; the elapsed side follows the slider
    /// thumb while it is being dragged.
    pub fn progress_labels( &self ) -> ProgressLabels {
        let mut progress = self.progress;
        if self.slider.is_dragging() {
            progress.position = engine::secs_to_duration( self.slider.value() );
        }
        ProgressLabels::from_progress( &progress )
    }


    /// Most recent failure, for display in a status line.
    pub fn last_error( &self ) -> Option<&str> {
        self.last_error.as_deref()
    }
}


impl<E: PlaybackEngine> Drop for PlayerScreen<E> {
    fn drop( &mut self ) {
        self.dispose();
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use crate::testing::{ sample_catalog, EngineCall, EngineHandle, RecordingEngine };


    const PAGE: f64 = 100.0;


    fn mount( count: usize, skip_policy: SkipPolicy ) -> ( PlayerScreen<RecordingEngine>, EngineHandle ) {
        let ( engine, handle ) = RecordingEngine::new();
        let options = ScreenOptions { skip_policy, page_width: PAGE };
        let screen = PlayerScreen::mount( engine, sample_catalog( count ), options );
        ( screen, handle )
    }


    #[test]
    fn test_mount_bootstraps_engine() {
        let ( screen, handle ) = mount( 3, SkipPolicy::OnSettle );
        assert_eq!( handle.calls(), vec![
            EngineCall::Setup,
            EngineCall::UpdateOptions( Capability::SCREEN_DEFAULTS.to_vec() ),
            EngineCall::Add( 3 ),
        ]);
        assert!( screen.is_ready() );
        assert_eq!( screen.now_playing().map( |n| n.title.as_str() ), Some( "Track 0" ) );
        assert_eq!( screen.playback_state(), PlaybackState::Paused );
    }


    #[test]
    fn test_setup_failure_leaves_controls_inert() {
        let ( engine, handle ) = RecordingEngine::new();
        handle.fail_setup();
        let mut screen = PlayerScreen::mount( engine, sample_catalog( 3 ), ScreenOptions::default() );

        assert!( !screen.is_ready() );
        assert!( screen.last_error().is_some() );
        assert_eq!( handle.calls(), vec![ EngineCall::Setup ] );

        screen.toggle_play_pause();
        screen.cycle_repeat_mode();
        screen.seek( Duration::from_secs( 5 ) );
        screen.change_active_track( 2 );
        assert_eq!( handle.calls(), vec![ EngineCall::Setup ] );
        assert_eq!( screen.repeat_mode(), RepeatMode::Off );
    }


    #[test]
    fn test_enqueue_failure_is_not_retried() {
        let ( engine, handle ) = RecordingEngine::new();
        handle.fail_add();
        let mut screen = PlayerScreen::mount( engine, sample_catalog( 2 ), ScreenOptions::default() );
        screen.update();
        screen.update();
        assert_eq!( handle.count( &EngineCall::Add( 2 ) ), 1 );
        assert!( !screen.is_ready() );
    }


    #[test]
    fn test_toggle_without_track_is_noop() {
        let ( mut screen, handle ) = mount( 3, SkipPolicy::OnSettle );
        handle.unload();
        screen.toggle_play_pause();
        assert!( handle.transport_calls().is_empty() );
    }


    #[test]
    fn test_toggle_with_unreadable_track_is_noop() {
        let ( mut screen, handle ) = mount( 3, SkipPolicy::OnSettle );
        handle.fail_current_track();
        screen.toggle_play_pause();
        assert!( handle.transport_calls().is_empty() );
    }


    #[test]
    fn test_toggle_pauses_when_playing() {
        let ( mut screen, handle ) = mount( 3, SkipPolicy::OnSettle );
        handle.set_state( PlaybackState::Playing );
        screen.toggle_play_pause();
        assert_eq!( handle.transport_calls(), vec![ EngineCall::Pause ] );
    }


    #[test]
    fn test_toggle_plays_when_paused_or_stopped() {
        for state in [ PlaybackState::Paused, PlaybackState::Stopped ] {
            let ( mut screen, handle ) = mount( 3, SkipPolicy::OnSettle );
            handle.set_state( state );
            screen.toggle_play_pause();
            assert_eq!( handle.transport_calls(), vec![ EngineCall::Play ] );
        }
    }


    #[test]
    fn test_play_icon_follows_engine_state() {
        let ( mut screen, _handle ) = mount( 3, SkipPolicy::OnSettle );
        assert_eq!( screen.play_icon(), Icon::PlayCircle );
        screen.toggle_play_pause();
        screen.update();
        assert_eq!( screen.play_icon(), Icon::PauseCircle );
    }


    #[test]
    fn test_skip_next_scrolls_one_page() {
        let ( mut screen, handle ) = mount( 3, SkipPolicy::OnSettle );
        handle.clear_calls();

        screen.skip_to_next();

        assert_eq!( screen.carousel().offset(), PAGE );
        assert_eq!( screen.active_index(), 1 );
        assert_eq!( handle.skips(), vec![ 1 ] );
        assert_eq!( screen.now_playing().map( |n| n.title.as_str() ), Some( "Track 1" ) );
    }


    #[test]
    fn test_skip_previous_at_start_does_nothing() {
        let ( mut screen, handle ) = mount( 3, SkipPolicy::OnSettle );
        screen.skip_to_previous();
        assert_eq!( screen.active_index(), 0 );
        assert!( handle.skips().is_empty() );
    }


    #[test]
    fn test_skip_next_at_end_does_nothing() {
        let ( mut screen, handle ) = mount( 2, SkipPolicy::OnSettle );
        screen.skip_to_next();
        screen.skip_to_next();
        assert_eq!( screen.active_index(), 1 );
        assert_eq!( handle.skips(), vec![ 1 ] );
    }


    #[test]
    fn test_settle_on_page_issues_one_skip() {
        for policy in [ SkipPolicy::Continuous, SkipPolicy::OnSettle ] {
            for k in 1..4 {
                let ( mut screen, handle ) = mount( 4, policy );
                screen.on_scroll( k as f64 * PAGE );
                screen.on_scroll_settled();
                assert_eq!( screen.active_index(), k );
                assert_eq!( handle.skips(), vec![ k ], "policy {:?}", policy );
            }
        }
    }


    #[test]
    fn test_continuous_drag_skips_every_page() {
        let ( mut screen, handle ) = mount( 4, SkipPolicy::Continuous );
        screen.begin_carousel_drag();
        screen.drag_carousel( 60.0 );
        screen.drag_carousel( 160.0 );
        screen.drag_carousel( 260.0 );
        assert_eq!( handle.skips(), vec![ 1, 2, 3 ] );
        screen.release_carousel();
        assert_eq!( screen.carousel().offset(), 300.0 );
        assert_eq!( handle.skips(), vec![ 1, 2, 3 ] );
    }


    #[test]
    fn test_settle_policy_skips_once_after_release() {
        let ( mut screen, handle ) = mount( 4, SkipPolicy::OnSettle );
        screen.begin_carousel_drag();
        screen.drag_carousel( 60.0 );
        screen.drag_carousel( 160.0 );
        assert!( handle.skips().is_empty() );
        screen.release_carousel();
        assert_eq!( handle.skips(), vec![ 2 ] );
        assert_eq!( screen.active_index(), 2 );
    }


    #[test]
    fn test_drag_back_to_start_page_skips_nothing() {
        let ( mut screen, handle ) = mount( 3, SkipPolicy::OnSettle );
        screen.begin_carousel_drag();
        screen.drag_carousel( 30.0 );
        screen.release_carousel();
        assert!( handle.skips().is_empty() );
        assert_eq!( screen.carousel().offset(), 0.0 );
    }


    #[test]
    fn test_engine_advance_moves_carousel_without_skip() {
        let ( mut screen, handle ) = mount( 3, SkipPolicy::OnSettle );
        handle.clear_calls();

        handle.advance_to( 2 );
        screen.update();

        assert_eq!( screen.active_index(), 2 );
        assert_eq!( screen.carousel().offset(), 2.0 * PAGE );
        assert_eq!( screen.now_playing().map( |n| n.title.as_str() ), Some( "Track 2" ) );
        assert!( handle.skips().is_empty() );
    }


    #[test]
    fn test_trailing_events_do_not_rewind_carousel() {
        let ( mut screen, _handle ) = mount( 4, SkipPolicy::Continuous );
        screen.on_scroll( PAGE );
        screen.on_scroll( 2.0 * PAGE );
        screen.on_scroll( 3.0 * PAGE );
        screen.update();
        assert_eq!( screen.active_index(), 3 );
        assert_eq!( screen.carousel().index(), 3 );
        assert_eq!( screen.now_playing().map( |n| n.title.as_str() ), Some( "Track 3" ) );
    }


    #[test]
    fn test_queue_end_keeps_now_playing() {
        let ( mut screen, handle ) = mount( 3, SkipPolicy::OnSettle );
        screen.skip_to_next();
        screen.update();

        handle.emit( EngineEvent::TrackChanged { previous: Some( 1 ), next: None } );
        screen.update();

        assert_eq!( screen.active_index(), 1 );
        assert_eq!( screen.carousel().index(), 1 );
        assert_eq!( screen.now_playing().map( |n| n.title.as_str() ), Some( "Track 1" ) );
        assert!( screen.last_error().is_none() );
    }


    #[test]
    fn test_engine_error_event_is_kept() {
        let ( mut screen, handle ) = mount( 3, SkipPolicy::OnSettle );
        assert!( screen.last_error().is_none() );

        handle.emit( EngineEvent::Error { message: "decoder gave up".into() } );
        screen.update();

        assert_eq!( screen.last_error(), Some( "decoder gave up" ) );
        assert_eq!( screen.now_playing().map( |n| n.title.as_str() ), Some( "Track 0" ) );
    }


    #[test]
    fn test_repeat_cycle_commands_engine_first() {
        let ( mut screen, handle ) = mount( 1, SkipPolicy::OnSettle );
        handle.clear_calls();

        let mut icons = Vec::new();
        for _ in 0..3 {
            screen.cycle_repeat_mode();
            icons.push( screen.repeat_icon().name() );
        }

        assert_eq!( icons, vec![ "repeat-once", "repeat", "repeat-off" ] );
        assert_eq!( screen.repeat_mode(), RepeatMode::Off );
        assert_eq!( handle.calls(), vec![
            EngineCall::SetRepeatMode( RepeatMode::Track ),
            EngineCall::SetRepeatMode( RepeatMode::Queue ),
            EngineCall::SetRepeatMode( RepeatMode::Off ),
        ]);
    }


    #[test]
    fn test_rejected_repeat_mode_keeps_icon() {
        let ( mut screen, handle ) = mount( 1, SkipPolicy::OnSettle );
        handle.fail_repeat();
        screen.cycle_repeat_mode();
        assert_eq!( screen.repeat_mode(), RepeatMode::Off );
        assert!( screen.last_error().is_some() );
    }


    #[test]
    fn test_seek_only_on_release() {
        let ( mut screen, handle ) = mount( 1, SkipPolicy::OnSettle );
        handle.set_progress( 10.0, 185.0 );
        screen.update();
        handle.clear_calls();

        screen.begin_seek( 30.0 );
        screen.drag_seek( 50.0 );
        screen.drag_seek( 65.0 );
        assert!( handle.calls().is_empty() );
        assert_eq!( screen.progress_labels().elapsed, "01:05" );

        screen.release_seek();
        assert_eq!( handle.calls(), vec![ EngineCall::SeekTo( Duration::from_secs( 65 ) ) ] );
    }


    #[test]
    fn test_seek_by_stays_in_track() {
        let ( mut screen, handle ) = mount( 1, SkipPolicy::OnSettle );
        handle.set_progress( 3.0, 20.0 );
        screen.update();
        handle.clear_calls();

        screen.seek_by( -5.0 );
        screen.seek_by( 100.0 );
        assert_eq!( handle.calls(), vec![
            EngineCall::SeekTo( Duration::ZERO ),
            EngineCall::SeekTo( Duration::from_secs( 20 ) ),
        ]);
    }


    #[test]
    fn test_progress_labels() {
        let ( mut screen, handle ) = mount( 1, SkipPolicy::OnSettle );
        handle.set_progress( 65.0, 185.0 );
        screen.update();
        let labels = screen.progress_labels();
        assert_eq!( labels.elapsed, "01:05" );
        assert_eq!( labels.remaining, "02:00" );
    }


    #[test]
    fn test_unmount_destroys_engine_once() {
        let ( screen, handle ) = mount( 3, SkipPolicy::Continuous );
        screen.unmount();
        assert_eq!( handle.count( &EngineCall::Destroy ), 1 );

        // The session is gone: engine-side changes reach nobody.
        handle.advance_to( 1 );
        assert_eq!( handle.calls().last(), Some( &EngineCall::Destroy ) );
        assert!( handle.skips().is_empty() );
    }


    #[test]
    fn test_drop_destroys_engine() {
        let ( screen, handle ) = mount( 3, SkipPolicy::OnSettle );
        drop( screen );
        assert_eq!( handle.count( &EngineCall::Destroy ), 1 );
    }


    #[test]
    fn test_resize_keeps_active_page() {
        let ( mut screen, handle ) = mount( 3, SkipPolicy::OnSettle );
        screen.skip_to_next();
        screen.set_page_width( 40.0 );
        assert_eq!( screen.carousel().offset(), 40.0 );
        assert_eq!( screen.active_index(), 1 );
        assert_eq!( handle.skips(), vec![ 1 ] );
    }


    #[test]
    fn test_empty_catalog_is_inert() {
        let ( mut screen, handle ) = mount( 0, SkipPolicy::Continuous );
        handle.clear_calls();
        screen.skip_to_next();
        screen.toggle_play_pause();
        screen.on_scroll( 500.0 );
        assert!( handle.calls().is_empty() );
        assert!( screen.now_playing().is_none() );
    }
}
