//! Spindle CLI - terminal now-playing screen

mod artwork;
mod cli;
mod logging;
mod settings;
mod theme;

use std::io;
use std::time::{ Duration, Instant };

use anyhow::{ Context, Result };
use clap::Parser;
use crossterm::{
    event::{ self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind },
    terminal::{ disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen },
    ExecutableCommand,
};
use ratatui::{
    layout::{ Alignment, Position },
    prelude::*,
    widgets::{ Block, Borders, Paragraph },
};

use artwork::Cover;
use cli::Args;
use settings::Settings;
use spindle_core::{ Catalog, DeviceEngine, Icon, PlayerScreen, ScreenOptions, SkipPolicy };


/// Seek step for the keyboard, in seconds.
const SEEK_STEP: f64 = 5.0;


/// Screen regions that react to the mouse, recorded on every draw.
#[derive( Debug, Default, Clone, Copy )]
struct HitAreas {
    carousel: Rect,
    slider: Rect,
    previous: Rect,
    play: Rect,
    next: Rect,
    repeat: Rect,
}


/// Mouse gesture in progress.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
enum Gesture {
    /// Dragging the carousel; `anchor` is the column the drag started at.
    Carousel { anchor: u16 },
    Slider,
}


/// Application state.
struct App {
    screen: PlayerScreen<DeviceEngine>,
    covers: Vec<Cover>,
    settings: Settings,
    should_quit: bool,

    // Status message (shown in status bar)
    status_message: Option<String>,
    status_clear_at: Option<Instant>,

    hits: HitAreas,
    gesture: Option<Gesture>,
}


impl App {
    /// Creates the app and mounts the player screen.
    fn new( args: &Args ) -> Result<Self> {
        let settings = Settings::load();
        let mut status_message = None;

        let catalog = if !args.files.is_empty() {
            Catalog::from_paths( args.files.iter().cloned() )
        } else if let Some( path ) = args.catalog.as_ref().or( settings.catalog.as_ref() ) {
            Catalog::load( path )
                .with_context( || format!( "Failed to load catalog {}", path.display() ) )?
        } else {
            match Settings::default_catalog_path() {
                Some( path ) if path.exists() => Catalog::load( &path )
                    .with_context( || format!( "Failed to load catalog {}", path.display() ) )?,
                _ => {
                    status_message = Some( "No catalog found: pass audio files or --catalog <file>".to_string() );
                    Catalog::default()
                }
            }
        };

        let skip_policy = if args.skip_on_drag {
            SkipPolicy::Continuous
        } else {
            settings.skip_policy
        };

        let covers = catalog.tracks().iter().map( Cover::for_track ).collect();
        let options = ScreenOptions { skip_policy, ..ScreenOptions::default() };
        let screen = PlayerScreen::mount( DeviceEngine::new(), catalog, options );

        Ok( Self {
            screen,
            covers,
            settings,
            should_quit: false,
            status_clear_at: status_message.as_ref().map( |_| Instant::now() + Duration::from_secs( 5 ) ),
            status_message,
            hits: HitAreas::default(),
            gesture: None,
        })
    }


    /// Sets a status message that auto-clears after a delay.
    fn set_status( &mut self, msg: impl Into<String> ) {
        self.status_message = Some( msg.into() );
        self.status_clear_at = Some( Instant::now() + Duration::from_secs( 3 ) );
    }


    /// Updates app state once per frame.
    fn tick( &mut self ) {
        if let Some( clear_at ) = self.status_clear_at {
            if Instant::now() >= clear_at {
                self.status_message = None;
                self.status_clear_at = None;
            }
        }

        self.screen.update();
    }


    /// Handles a key event.
    fn handle_key( &mut self, code: KeyCode, modifiers: KeyModifiers ) {
        match code {
            KeyCode::Char( 'q' ) | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char( 'c' ) if modifiers.contains( KeyModifiers::CONTROL ) => {
                self.should_quit = true;
            }
            KeyCode::Char( ' ' ) => {
                self.screen.toggle_play_pause();
            }
            KeyCode::Right | KeyCode::Char( 'n' ) => {
                self.screen.skip_to_next();
            }
            KeyCode::Left | KeyCode::Char( 'p' ) => {
                self.screen.skip_to_previous();
            }
            KeyCode::Char( 'r' ) => {
                self.screen.cycle_repeat_mode();
            }
            KeyCode::Char( ',' ) => {
                self.screen.seek_by( -SEEK_STEP );
            }
            KeyCode::Char( '.' ) => {
                self.screen.seek_by( SEEK_STEP );
            }
            KeyCode::Char( 'm' ) => {
                let policy = self.screen.skip_policy().toggled();
                self.screen.set_skip_policy( policy );
                self.settings.skip_policy = policy;
                self.settings.save();
                self.set_status( format!( "Carousel: {}", policy.name() ) );
            }
            _ => {}
        }
    }


    /// Handles mouse events.
    fn handle_mouse( &mut self, column: u16, row: u16, kind: MouseEventKind ) {
        let at = Position::new( column, row );
        match kind {
            MouseEventKind::Down( MouseButton::Left ) => {
                if self.hits.carousel.contains( at ) {
                    self.gesture = Some( Gesture::Carousel { anchor: column } );
                    self.screen.begin_carousel_drag();
                } else if self.hits.slider.contains( at ) {
                    self.gesture = Some( Gesture::Slider );
                    let value = self.slider_value_at( column );
                    self.screen.begin_seek( value );
                } else if self.hits.previous.contains( at ) {
                    self.screen.skip_to_previous();
                } else if self.hits.play.contains( at ) {
                    self.screen.toggle_play_pause();
                } else if self.hits.next.contains( at ) {
                    self.screen.skip_to_next();
                } else if self.hits.repeat.contains( at ) {
                    self.screen.cycle_repeat_mode();
                }
            }
            MouseEventKind::Drag( MouseButton::Left ) => match self.gesture {
                Some( Gesture::Carousel { anchor } ) => {
                    // Dragging left reveals the next page.
                    self.screen.drag_carousel( anchor as f64 - column as f64 );
                }
                Some( Gesture::Slider ) => {
                    let value = self.slider_value_at( column );
                    self.screen.drag_seek( value );
                }
                None => {}
            },
            MouseEventKind::Up( MouseButton::Left ) => match self.gesture.take() {
                Some( Gesture::Carousel { .. } ) => self.screen.release_carousel(),
                Some( Gesture::Slider ) => self.screen.release_seek(),
                None => {}
            },
            _ => {}
        }
    }


    /// Maps a column on the slider to a position in seconds.
    fn slider_value_at( &self, column: u16 ) -> f64 {
        let area = self.hits.slider;
        let span = area.width.saturating_sub( 1 ).max( 1 ) as f64;
        let ratio = ( column.saturating_sub( area.x ) as f64 / span ).clamp( 0.0, 1.0 );
        ratio * self.screen.slider().maximum()
    }


    /// Unmounts the player screen, closing the engine session.
    fn shutdown( self ) {
        self.screen.unmount();
    }
}


/// Raw mode, alternate screen and mouse capture for as long as it lives.
/// Dropping it restores the terminal, also when unwinding from a panic.
struct TerminalGuard;


impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        // From here on, a failed step restores whatever was already set up.
        let guard = Self;
        io::stdout().execute( EnterAlternateScreen )?;
        io::stdout().execute( crossterm::event::EnableMouseCapture )?;
        Ok( guard )
    }
}


impl Drop for TerminalGuard {
    fn drop( &mut self ) {
        let _ = io::stdout().execute( crossterm::event::DisableMouseCapture );
        let _ = disable_raw_mode();
        let _ = io::stdout().execute( LeaveAlternateScreen );
    }
}


fn main() -> Result<()> {
    let args = Args::parse();

    if let Some( path ) = logging::init() {
        tracing::info!( "Logging to {}", path.display() );
    }

    let mut app = App::new( &args )?;

    let result = TerminalGuard::enter().and_then( |_guard| {
        let mut terminal = Terminal::new( CrosstermBackend::new( io::stdout() ) )?;
        run( &mut terminal, &mut app )
    });

    app.shutdown();
    result
}


/// Main loop: update, draw, then wait for input until the next frame.
fn run( terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App ) -> Result<()> {
    let frame_time = Duration::from_millis( app.settings.frame_rate_ms.max( 10 ) );

    loop {
        app.tick();

        terminal.draw( |frame| draw_ui( frame, app ) )?;

        if event::poll( frame_time )? {
            match event::read()? {
                Event::Key( key ) if key.kind == KeyEventKind::Press => {
                    app.handle_key( key.code, key.modifiers );
                }
                Event::Mouse( mouse ) => {
                    app.handle_mouse( mouse.column, mouse.row, mouse.kind );
                }
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}


/// Centers a rect of at most `width` columns inside `area`.
fn centered( area: Rect, width: u16 ) -> Rect {
    let width = width.min( area.width );
    Rect {
        x: area.x + ( area.width - width ) / 2,
        width,
        ..area
    }
}


/// The bottom icon row takes the middle four fifths of its area.
fn icon_row( area: Rect ) -> Rect {
    centered( area, area.width / 5 * 4 )
}


/// Draws the main UI.
fn draw_ui( frame: &mut Frame, app: &mut App ) {
    let area = frame.area();
    frame.render_widget( Block::default().style( theme::base() ), area );

    let chunks = Layout::default()
        .direction( Direction::Vertical )
        .constraints([
            Constraint::Length( 1 ),  // Status line
            Constraint::Min( 6 ),     // Carousel
            Constraint::Length( 1 ),  // Title
            Constraint::Length( 1 ),  // Artist
            Constraint::Length( 1 ),  // Slider
            Constraint::Length( 1 ),  // Durations
            Constraint::Length( 1 ),
            Constraint::Length( 1 ),  // Transport controls
            Constraint::Length( 1 ),
            Constraint::Length( 2 ),  // Bottom icons
            Constraint::Length( 1 ),  // Hints
        ])
        .split( area );

    draw_header( frame, app, chunks[0] );
    draw_carousel( frame, app, chunks[1] );
    draw_details( frame, app, chunks[2], chunks[3] );
    draw_progress( frame, app, chunks[4], chunks[5] );
    draw_controls( frame, app, chunks[7] );
    draw_bottom_icons( frame, app, chunks[9] );
    draw_status_bar( frame, app, chunks[10] );
}


fn draw_header( frame: &mut Frame, app: &App, area: Rect ) {
    let count = app.screen.catalog().len();
    let position = if count == 0 {
        String::new()
    } else {
        format!( "{} / {} ", app.screen.active_index() + 1, count )
    };

    let header = Line::from( vec![
        Span::styled( " ♪ Spindle", theme::title() ),
        Span::styled( format!( "{:>width$}", position, width = area.width.saturating_sub( 10 ) as usize ), theme::base() ),
    ]);
    frame.render_widget( Paragraph::new( header ).style( theme::base() ), area );
}


fn draw_carousel( frame: &mut Frame, app: &mut App, area: Rect ) {
    app.hits.carousel = area;
    app.screen.set_page_width( area.width as f64 );

    if app.covers.is_empty() {
        let empty = Paragraph::new( "No tracks" )
            .style( theme::base().fg( theme::INACTIVE ) )
            .alignment( Alignment::Center );
        frame.render_widget( empty, Rect { y: area.y + area.height / 2, height: 1, ..area } );
        return;
    }

    let offset = app.screen.carousel().offset();
    let lines = artwork::strip_lines( &app.covers, offset, area.width, area.height );
    frame.render_widget( Paragraph::new( lines ), area );
}


fn draw_details( frame: &mut Frame, app: &App, title_area: Rect, artist_area: Rect ) {
    let ( title, artist ) = match app.screen.now_playing() {
        Some( now ) => ( now.title.clone(), now.artist.clone() ),
        None => ( String::new(), String::new() ),
    };

    frame.render_widget(
        Paragraph::new( title ).style( theme::title() ).alignment( Alignment::Center ),
        title_area,
    );
    frame.render_widget(
        Paragraph::new( artist ).style( theme::artist() ).alignment( Alignment::Center ),
        artist_area,
    );
}


fn draw_progress( frame: &mut Frame, app: &mut App, slider_area: Rect, time_area: Rect ) {
    let slider_area = centered( slider_area, 60 );
    let time_area = centered( time_area, 60 );
    app.hits.slider = slider_area;

    let width = slider_area.width as usize;
    let thumb = if width == 0 {
        0
    } else {
        ( app.screen.slider().ratio() * ( width - 1 ) as f64 ).round() as usize
    };

    let bar = Line::from( vec![
        Span::styled( "━".repeat( thumb ), theme::accent() ),
        Span::styled( "●", theme::accent() ),
        Span::styled( "─".repeat( width.saturating_sub( thumb + 1 ) ), theme::base() ),
    ]);
    frame.render_widget( Paragraph::new( bar ), slider_area );

    let labels = app.screen.progress_labels();
    frame.render_widget(
        Paragraph::new( labels.elapsed ).style( theme::base() ).alignment( Alignment::Left ),
        time_area,
    );
    frame.render_widget(
        Paragraph::new( labels.remaining ).style( theme::base() ).alignment( Alignment::Right ),
        time_area,
    );
}


fn draw_controls( frame: &mut Frame, app: &mut App, area: Rect ) {
    let slots = Layout::horizontal([
        Constraint::Fill( 1 ),
        Constraint::Length( 5 ),
        Constraint::Length( 4 ),
        Constraint::Length( 7 ),
        Constraint::Length( 4 ),
        Constraint::Length( 5 ),
        Constraint::Fill( 1 ),
    ])
    .split( area );

    app.hits.previous = slots[1];
    app.hits.play = slots[3];
    app.hits.next = slots[5];

    let play = app.screen.play_icon();
    let buttons = [
        ( Icon::SkipBack, slots[1], theme::accent() ),
        ( play, slots[3], theme::accent().add_modifier( Modifier::BOLD ) ),
        ( Icon::SkipForward, slots[5], theme::accent() ),
    ];
    for ( icon, slot, style ) in buttons {
        let text = if icon == play { format!( "( {} )", icon.glyph() ) } else { icon.glyph().to_string() };
        frame.render_widget( Paragraph::new( text ).style( style ).alignment( Alignment::Center ), slot );
    }
}


fn draw_bottom_icons( frame: &mut Frame, app: &mut App, area: Rect ) {
    let block = Block::default().borders( Borders::TOP ).border_style( theme::divider() );
    let inner = block.inner( area );
    frame.render_widget( block, area );

    let row = icon_row( inner );
    let slots = Layout::horizontal( [ Constraint::Fill( 1 ); 4 ] ).split( row );
    app.hits.repeat = slots[1];

    let repeat = app.screen.repeat_mode();
    let icons = [
        ( Icon::Heart, theme::icon( false ) ),
        ( app.screen.repeat_icon(), theme::icon( repeat.is_active() ) ),
        ( Icon::Share, theme::icon( false ) ),
        ( Icon::Ellipsis, theme::icon( false ) ),
    ];
    for ( ( icon, style ), slot ) in icons.into_iter().zip( slots.iter() ) {
        frame.render_widget(
            Paragraph::new( icon.glyph() ).style( style ).alignment( Alignment::Center ),
            *slot,
        );
    }
}


fn draw_status_bar( frame: &mut Frame, app: &App, area: Rect ) {
    let ( text, style ) = if let Some( ref msg ) = app.status_message {
        ( msg.clone(), theme::accent() )
    } else if let Some( err ) = app.screen.last_error() {
        ( format!( " {}", err ), theme::base().fg( Color::LightRed ) )
    } else {
        (
            " [Space]Play [←/→]Skip [r]Repeat [,/.]Seek [m]Drag mode [q]Quit ".to_string(),
            theme::base().fg( theme::INACTIVE ),
        )
    };

    frame.render_widget( Paragraph::new( text ).style( style ), area );
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new( 10, 3, 40, 1 );
        assert_eq!( centered( area, 20 ), Rect::new( 20, 3, 20, 1 ) );
        assert_eq!( centered( area, 100 ), area );
    }


    #[test]
    fn test_icon_row_on_very_wide_area() {
        let row = icon_row( Rect::new( 0, 0, u16::MAX, 1 ) );
        assert_eq!( row.width, 52428 );
        assert_eq!( row.x, 6553 );
    }
}
