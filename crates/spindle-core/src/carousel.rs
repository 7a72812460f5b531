//! Horizontally paginated carousel
//!
//! Tracks the scroll offset of a one-page-per-track strip. Offsets are in
//! the same unit as the page width (terminal columns in the CLI).


/// Scroll position of the artwork carousel.
#[derive( Debug, Clone, PartialEq )]
pub struct Carousel {
    page_width: f64,
    offset: f64,
    page_count: usize,
    /// Offset at the start of the current drag gesture.
    drag_origin: Option<f64>,
}


impl Carousel {
    /// Creates a carousel scrolled to the first page.
    pub fn new( page_count: usize, page_width: f64 ) -> Self {
        Self {
            page_width: sanitize( page_width ),
            offset: 0.0,
            page_count,
            drag_origin: None,
        }
    }


    pub fn page_width( &self ) -> f64 {
        self.page_width
    }


    pub fn offset( &self ) -> f64 {
        self.offset
    }


    pub fn page_count( &self ) -> usize {
        self.page_count
    }


    /// Largest reachable offset (start of the last page).
    pub fn max_offset( &self ) -> f64 {
        self.page_count.saturating_sub( 1 ) as f64 * self.page_width
    }


    /// Maps a scroll offset to a page index: `round(offset / page_width)`,
    /// clamped to the available pages.
    pub fn index_at( &self, offset: f64 ) -> usize {
        if self.page_width <= 0.0 || self.page_count == 0 || !offset.is_finite() || offset <= 0.0 {
            return 0;
        }
        let index = ( offset / self.page_width ).round() as usize;
        index.min( self.page_count - 1 )
    }


    /// Page index at the current offset.
    pub fn index( &self ) -> usize {
        self.index_at( self.offset )
    }


    /// Offset at which page `index` is fully in view.
    pub fn page_offset( &self, index: usize ) -> f64 {
        index.min( self.page_count.saturating_sub( 1 ) ) as f64 * self.page_width
    }


    /// Scrolls to `offset`, clamped to the content bounds. Returns the new offset.
    pub fn scroll_to_offset( &mut self, offset: f64 ) -> f64 {
        self.offset = sanitize( offset ).min( self.max_offset() );
        self.offset
    }


    /// Scrolls so page `index` is in view. Returns the new offset.
    pub fn scroll_to_index( &mut self, index: usize ) -> f64 {
        let offset = self.page_offset( index );
        self.scroll_to_offset( offset )
    }


    /// Starts a drag gesture at the current offset.
    pub fn begin_drag( &mut self ) {
        self.drag_origin = Some( self.offset );
    }


    /// Moves the strip by `delta` relative to where the drag began.
    /// Returns the new offset.
    pub fn drag_by( &mut self, delta: f64 ) -> f64 {
        let origin = *self.drag_origin.get_or_insert( self.offset );
        self.scroll_to_offset( origin + delta )
    }


    /// Ends a drag gesture, snapping to the nearest page. Returns the settled offset.
    pub fn end_drag( &mut self ) -> f64 {
        self.drag_origin = None;
        let index = self.index();
        self.scroll_to_index( index )
    }


    pub fn is_dragging( &self ) -> bool {
        self.drag_origin.is_some()
    }


    /// Changes the page width, keeping the current page in view.
    pub fn set_page_width( &mut self, page_width: f64 ) {
        let page_width = sanitize( page_width );
        if page_width == self.page_width {
            return;
        }
        let index = self.index();
        self.page_width = page_width;
        self.drag_origin = None;
        self.scroll_to_index( index );
    }
}


fn sanitize( value: f64 ) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_index_rounds_offset() {
        let carousel = Carousel::new( 3, 100.0 );
        assert_eq!( carousel.index_at( 0.0 ), 0 );
        assert_eq!( carousel.index_at( 49.0 ), 0 );
        assert_eq!( carousel.index_at( 50.0 ), 1 );
        assert_eq!( carousel.index_at( 151.0 ), 2 );
        assert_eq!( carousel.index_at( 900.0 ), 2 );
        assert_eq!( carousel.index_at( -20.0 ), 0 );
    }


    #[test]
    fn test_settle_at_page_offsets() {
        let carousel = Carousel::new( 4, 80.0 );
        for k in 0..4 {
            assert_eq!( carousel.index_at( k as f64 * 80.0 ), k );
        }
    }


    #[test]
    fn test_scroll_clamps_to_content() {
        let mut carousel = Carousel::new( 3, 100.0 );
        assert_eq!( carousel.scroll_to_offset( 500.0 ), 200.0 );
        assert_eq!( carousel.scroll_to_offset( -100.0 ), 0.0 );
    }


    #[test]
    fn test_drag_snaps_to_nearest_page() {
        let mut carousel = Carousel::new( 3, 100.0 );
        carousel.begin_drag();
        carousel.drag_by( 30.0 );
        assert!( carousel.is_dragging() );
        assert_eq!( carousel.end_drag(), 0.0 );

        carousel.begin_drag();
        carousel.drag_by( 40.0 );
        carousel.drag_by( 70.0 );
        assert_eq!( carousel.end_drag(), 100.0 );
        assert_eq!( carousel.index(), 1 );
        assert!( !carousel.is_dragging() );
    }


    #[test]
    fn test_resize_keeps_page() {
        let mut carousel = Carousel::new( 3, 100.0 );
        carousel.scroll_to_index( 2 );
        carousel.set_page_width( 60.0 );
        assert_eq!( carousel.offset(), 120.0 );
        assert_eq!( carousel.index(), 2 );
    }


    #[test]
    fn test_zero_width_maps_to_first_page() {
        let carousel = Carousel::new( 3, 0.0 );
        assert_eq!( carousel.index_at( 250.0 ), 0 );
        assert_eq!( carousel.max_offset(), 0.0 );
    }
}
