//! Seek slider state.
//!
//! The thumb follows engine progress until the user grabs it. While dragging
//! nothing is sent to the engine; the target is only handed out on release.

use crate::engine::Progress;


/// Seek slider, with values in seconds.
#[derive( Debug, Clone, Default, PartialEq )]
pub struct SeekSlider {
    value: f64,
    maximum: f64,
    dragging: bool,
}


impl SeekSlider {
    pub fn new() -> Self {
        Self::default()
    }


    /// Follows engine progress unless the user is dragging the thumb.
    pub fn sync( &mut self, progress: &Progress ) {
        self.maximum = progress.duration.as_secs_f64();
        if !self.dragging {
            self.value = progress.position.as_secs_f64().min( self.maximum );
        }
    }


    /// Grabs the thumb at `value`.
    pub fn begin_drag( &mut self, value: f64 ) {
        self.dragging = true;
        self.value = self.clamp( value );
    }


    /// Moves the grabbed thumb.
    pub fn drag_to( &mut self, value: f64 ) {
        if self.dragging {
            self.value = self.clamp( value );
        }
    }


    /// Lets go of the thumb and returns the seek target, if a drag was in progress.
    pub fn release( &mut self ) -> Option<f64> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        Some( self.value )
    }


    pub fn value( &self ) -> f64 {
        self.value
    }


    pub fn maximum( &self ) -> f64 {
        self.maximum
    }


    pub fn is_dragging( &self ) -> bool {
        self.dragging
    }


    /// Thumb position as a fraction of the track, in `[0, 1]`.
    pub fn ratio( &self ) -> f64 {
        if self.maximum > 0.0 {
            ( self.value / self.maximum ).clamp( 0.0, 1.0 )
        } else {
            0.0
        }
    }


    fn clamp( &self, value: f64 ) -> f64 {
        if value.is_finite() {
            value.clamp( 0.0, self.maximum )
        } else {
            0.0
        }
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_follows_progress_until_grabbed() {
        let mut slider = SeekSlider::new();
        slider.sync( &Progress::from_secs_f64( 10.0, 100.0 ) );
        assert_eq!( slider.value(), 10.0 );

        slider.begin_drag( 40.0 );
        slider.sync( &Progress::from_secs_f64( 11.0, 100.0 ) );
        assert_eq!( slider.value(), 40.0 );
    }


    #[test]
    fn test_release_once() {
        let mut slider = SeekSlider::new();
        slider.sync( &Progress::from_secs_f64( 0.0, 60.0 ) );
        slider.begin_drag( 5.0 );
        slider.drag_to( 90.0 );
        assert_eq!( slider.release(), Some( 60.0 ) );
        assert_eq!( slider.release(), None );
    }


    #[test]
    fn test_drag_without_grab_is_ignored() {
        let mut slider = SeekSlider::new();
        slider.sync( &Progress::from_secs_f64( 3.0, 60.0 ) );
        slider.drag_to( 30.0 );
        assert_eq!( slider.value(), 3.0 );
        assert_eq!( slider.ratio(), 0.05 );
    }
}
