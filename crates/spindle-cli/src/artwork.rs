//! Artwork strip for the carousel.
//!
//! Each track owns one page of a horizontal strip as wide as the carousel.
//! A terminal cannot show the artwork image, so each page draws a framed
//! cover filled with a pattern seeded from the track id, with the artwork
//! name across the middle.

use std::collections::hash_map::DefaultHasher;
use std::hash::{ Hash, Hasher };
use std::path::Path;

use ratatui::style::{ Color, Style };
use ratatui::text::{ Line, Span };
use spindle_core::Track;

use crate::theme;


const SHADES: [char; 4] = [ '░', '▒', '▓', '█' ];


/// What one carousel page shows.
#[derive( Debug, Clone )]
pub struct Cover {
    seed: u64,
    label: Vec<char>,
}


impl Cover {
    pub fn for_track( track: &Track ) -> Self {
        let mut hasher = DefaultHasher::new();
        track.id.hash( &mut hasher );

        let label = match track.artwork.as_deref() {
            Some( artwork ) => Path::new( artwork )
                .file_stem()
                .map( |s| s.to_string_lossy().to_string() )
                .unwrap_or_else( || artwork.to_string() ),
            None => "♪".to_string(),
        };

        Self {
            seed: hasher.finish(),
            label: label.chars().collect(),
        }
    }


    fn tint( &self ) -> Color {
        let [ r, g, b, .. ] = self.seed.to_le_bytes();
        // Keep the pattern muted against the background.
        Color::Rgb( 0x40 + r / 3, 0x40 + g / 3, 0x40 + b / 3 )
    }


    /// Cell at `( x, y )` of a page `width` columns wide and `height` rows tall.
    fn cell( &self, x: u16, y: u16, width: u16, height: u16 ) -> ( char, Style ) {
        let cover_w = width.saturating_sub( 4 ).min( height.saturating_mul( 2 ) );
        let left = ( width - cover_w ) / 2;
        if cover_w < 2 || height < 2 || x < left || x >= left + cover_w {
            return ( ' ', theme::base() );
        }

        let ( rx, ry ) = ( x - left, y );
        let ( last_x, last_y ) = ( cover_w - 1, height - 1 );
        let border = match ( rx, ry ) {
            ( 0, 0 ) => Some( '╭' ),
            ( rx, 0 ) if rx == last_x => Some( '╮' ),
            ( 0, ry ) if ry == last_y => Some( '╰' ),
            ( rx, ry ) if rx == last_x && ry == last_y => Some( '╯' ),
            ( _, 0 ) => Some( '─' ),
            ( _, ry ) if ry == last_y => Some( '─' ),
            ( 0, _ ) => Some( '│' ),
            ( rx, _ ) if rx == last_x => Some( '│' ),
            _ => None,
        };
        if let Some( c ) = border {
            return ( c, theme::accent() );
        }

        if ry == height / 2 {
            let inner = ( cover_w - 2 ) as usize;
            let shown = self.label.len().min( inner.saturating_sub( 2 ) );
            let start = 1 + ( inner - shown ) / 2;
            let pos = rx as usize;
            if shown > 0 && pos >= start && pos < start + shown {
                return ( self.label[ pos - start ], theme::title() );
            }
        }

        let shade = ( rx as u64 / 3 + ry as u64 + self.seed ) % SHADES.len() as u64;
        ( SHADES[ shade as usize ], theme::base().fg( self.tint() ) )
    }
}


/// Renders the part of the strip visible at `offset` as `height` lines of
/// `width` cells.
pub fn strip_lines( covers: &[Cover], offset: f64, width: u16, height: u16 ) -> Vec<Line<'static>> {
    let page_width = width as f64;
    let mut lines = Vec::with_capacity( height as usize );

    for y in 0..height {
        let mut spans = Vec::new();
        let mut run = String::new();
        let mut run_style = theme::base();

        for col in 0..width {
            let strip_x = offset + col as f64;
            let page = ( strip_x / page_width ).floor() as usize;
            let page_x = ( ( strip_x - page as f64 * page_width ).floor() as u16 ).min( width - 1 );

            let ( c, style ) = match covers.get( page ) {
                Some( cover ) => cover.cell( page_x, y, width, height ),
                None => ( ' ', theme::base() ),
            };

            if style != run_style && !run.is_empty() {
                spans.push( Span::styled( std::mem::take( &mut run ), run_style ) );
            }
            run_style = style;
            run.push( c );
        }

        if !run.is_empty() {
            spans.push( Span::styled( run, run_style ) );
        }
        lines.push( Line::from( spans ) );
    }

    lines
}


#[cfg( test )]
mod tests {
    use super::*;


    fn cover( id: &str, artwork: &str ) -> Cover {
        Cover::for_track( &Track {
            id: id.into(),
            url: format!( "{}.mp3", id ),
            title: id.into(),
            artist: "A".into(),
            artwork: Some( artwork.into() ),
        })
    }


    fn text( line: &Line ) -> String {
        line.spans.iter().map( |s| s.content.as_ref() ).collect()
    }


    #[test]
    fn test_first_page_frame() {
        let lines = strip_lines( &[ cover( "a", "art/alpha.jpg" ) ], 0.0, 20, 5 );
        let top: Vec<char> = text( &lines[ 0 ] ).chars().collect();
        assert_eq!( top.len(), 20 );
        assert_eq!( top[ 5 ], '╭' );
        assert_eq!( top[ 14 ], '╮' );
        assert!( text( &lines[ 2 ] ).contains( "alpha" ) );
    }


    #[test]
    fn test_offset_shows_next_page() {
        let covers = [ cover( "a", "alpha.png" ), cover( "b", "beta.png" ) ];
        let lines = strip_lines( &covers, 20.0, 20, 5 );
        assert!( text( &lines[ 2 ] ).contains( "beta" ) );
        assert!( !text( &lines[ 2 ] ).contains( "alpha" ) );
    }


    #[test]
    fn test_past_last_page_is_blank() {
        let lines = strip_lines( &[ cover( "a", "alpha.png" ) ], 20.0, 20, 3 );
        assert!( text( &lines[ 1 ] ).trim().is_empty() );
    }
}
