use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crz_map::app::App;
use crz_map::data::{self, EntryTable};
use crz_map::map::MapRenderer;
use crz_map::present::{find_view, Section, Selection, VIEWS};
use crz_map::ui;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::time::Duration;

/// Explore CRZ vehicle entries in the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// MTA entries CSV
    #[arg(env = "CRZ_DATA", default_value = "MTA_Entries.csv")]
    data: PathBuf,

    /// Directory of GeoJSON files drawn behind the maps
    #[arg(long, env = "CRZ_BASEMAP", default_value = "data")]
    basemap: PathBuf,

    /// Section to open (1-7)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=7))]
    section: Option<u8>,

    /// View within the section (1-based)
    #[arg(long, default_value_t = 1)]
    view: usize,

    /// Print the aggregate behind a view as JSON and exit
    #[arg(long, value_name = "SLUG")]
    dump: Option<String>,

    /// List view slugs and exit
    #[arg(long)]
    list_views: bool,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    if args.list_views {
        for view in &VIEWS {
            println!("{:<18} {}. {}", view.slug, view.section.number(), view.name);
        }
        return Ok(());
    }

    // Load before touching the terminal so errors print cleanly
    let table = data::load_entries(&args.data)
        .with_context(|| format!("failed to load {}", args.data.display()))?;

    if let Some(slug) = &args.dump {
        let Some(view) = find_view(slug) else {
            bail!("unknown view '{slug}', see --list-views");
        };
        let value = (view.dump)(&table)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let section = args
        .section
        .and_then(|n| Section::from_number(n as usize))
        .unwrap_or(Section::Overview);
    let selection = Selection::new(section, args.view.saturating_sub(1));

    let basemap = data::basemap_or_outline(&args.basemap);

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, table, selection, basemap);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events for panning, zooming and sidebar clicks
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for cursor marker
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.click(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, table: EntryTable, selection: Selection, basemap: MapRenderer) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(table, selection, size.width, size.height).with_basemap(basemap);

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Nothing animates, so block longer between polls
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') => app.quit(),
                            KeyCode::Esc if app.show_insights => app.toggle_insights(),
                            KeyCode::Esc => app.quit(),
                            KeyCode::Char('i') => app.toggle_insights(),

                            // Scroll the insights panel while it is open
                            KeyCode::Up | KeyCode::Char('k') if app.show_insights => app.scroll_insights(-1),
                            KeyCode::Down | KeyCode::Char('j') if app.show_insights => app.scroll_insights(1),

                            // Section and view selection
                            KeyCode::Char(c @ '1'..='7') => {
                                if let Some(section) = c.to_digit(10).and_then(|n| Section::from_number(n as usize)) {
                                    app.select_section(section);
                                }
                            }
                            KeyCode::Tab => app.next_section(),
                            KeyCode::BackTab => app.prev_section(),
                            KeyCode::Char('v') => app.next_view(),
                            KeyCode::Char('V') => app.prev_view(),

                            // Pan with hjkl or arrow keys
                            KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                            KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                            KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                            KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                            // Zoom
                            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                            // Layer toggles
                            KeyCode::Char('b') | KeyCode::Char('B') => {
                                app.map_renderer.toggle_basemap();
                            }
                            KeyCode::Char('L') => {
                                app.map_renderer.toggle_labels();
                            }

                            // Reset view
                            KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::Resize(width, height) => {
                    app.resize(width, height);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
