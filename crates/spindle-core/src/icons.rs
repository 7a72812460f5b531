//! Icon identifiers used by the player screen.

use crate::engine::PlaybackState;


/// Every icon the screen can show.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum Icon {
    SkipBack,
    SkipForward,
    PlayCircle,
    PauseCircle,
    RepeatOff,
    RepeatOnce,
    Repeat,
    Heart,
    Share,
    Ellipsis,
}


impl Icon {
    /// Picks the play/pause button icon for a playback state.
    pub fn for_state( state: PlaybackState ) -> Self {
        if state == PlaybackState::Playing {
            Icon::PauseCircle
        } else {
            Icon::PlayCircle
        }
    }


    /// Returns the icon-set identifier.
    pub fn name( &self ) -> &'static str {
        match self {
            Icon::SkipBack => "play-skip-back-outline",
            Icon::SkipForward => "play-skip-forward-outline",
            Icon::PlayCircle => "ios-play-circle",
            Icon::PauseCircle => "ios-pause-circle",
            Icon::RepeatOff => "repeat-off",
            Icon::RepeatOnce => "repeat-once",
            Icon::Repeat => "repeat",
            Icon::Heart => "heart-outline",
            Icon::Share => "share-outline",
            Icon::Ellipsis => "ellipsis-horizontal",
        }
    }


    /// Returns the terminal rendering of the icon.
    pub fn glyph( &self ) -> &'static str {
        match self {
            Icon::SkipBack => "⏮",
            Icon::SkipForward => "⏭",
            Icon::PlayCircle => "▶",
            Icon::PauseCircle => "⏸",
            Icon::RepeatOff => "⟳",
            Icon::RepeatOnce => "🔂",
            Icon::Repeat => "🔁",
            Icon::Heart => "♡",
            Icon::Share => "⇪",
            Icon::Ellipsis => "⋯",
        }
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_play_icon_follows_state() {
        assert_eq!( Icon::for_state( PlaybackState::Playing ), Icon::PauseCircle );
        assert_eq!( Icon::for_state( PlaybackState::Paused ), Icon::PlayCircle );
        assert_eq!( Icon::for_state( PlaybackState::Buffering ), Icon::PlayCircle );
        assert_eq!( Icon::for_state( PlaybackState::Idle ), Icon::PlayCircle );
    }
}
