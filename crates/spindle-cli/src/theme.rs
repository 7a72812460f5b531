//! Colors and text styles of the player screen.

use ratatui::style::{ Color, Modifier, Style };


pub const BACKGROUND: Color = Color::Rgb( 0x22, 0x28, 0x31 );
pub const ACCENT: Color = Color::Rgb( 0xFF, 0xD3, 0x69 );
pub const TEXT: Color = Color::Rgb( 0xEE, 0xEE, 0xEE );
pub const INACTIVE: Color = Color::Rgb( 0x88, 0x88, 0x88 );
pub const DIVIDER: Color = Color::Rgb( 0x39, 0x3E, 0x46 );


/// Screen background with light foreground text.
pub fn base() -> Style {
    Style::default().bg( BACKGROUND ).fg( TEXT )
}


pub fn title() -> Style {
    base().add_modifier( Modifier::BOLD )
}


pub fn artist() -> Style {
    base().add_modifier( Modifier::DIM )
}


pub fn accent() -> Style {
    base().fg( ACCENT )
}


/// Style for a toggle-like icon, highlighted when active.
pub fn icon( active: bool ) -> Style {
    if active {
        accent()
    } else {
        base().fg( INACTIVE )
    }
}


pub fn divider() -> Style {
    base().fg( DIVIDER )
}
