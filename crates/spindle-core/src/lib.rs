//! Spindle Core - Player screen and playback engine interface
//!
//! This crate provides everything behind the player screen that is not
//! drawing: the track catalog, the engine interface the screen drives,
//! carousel and slider state, clock formatting and the screen state
//! machine itself. With the `audio` feature it also provides an engine
//! that plays through the default audio device.

pub mod carousel;
pub mod catalog;
pub mod clock;
#[cfg( feature = "audio" )]
pub mod device;
pub mod engine;
pub mod icons;
pub mod screen;
pub mod slider;

#[cfg( test )]
mod testing;

pub use catalog::{ Catalog, CatalogError, Track };
pub use clock::{ format_clock, ProgressLabels };
#[cfg( feature = "audio" )]
pub use device::DeviceEngine;
pub use engine::{
    Capability, EngineError, EngineEvent, PlaybackEngine, PlaybackState, Progress, RepeatMode,
};
pub use icons::Icon;
pub use screen::{ NowPlaying, PlayerScreen, ScreenOptions, SkipPolicy };
