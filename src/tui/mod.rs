//! Terminal viewer for a loaded network snapshot.
//!
//! Feature-gated behind `tui`. Launch with `--tui` on the CLI. Arrow keys
//! scrub the timestep slider, up/down move the element selection, Enter
//! opens the popup chart panel for the selected element.

mod controls;
mod layout;
/// Viewer application state.
pub mod runtime;
mod style;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::model::NetworkSnapshot;
use runtime::App;

/// Redraw poll interval while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Launches the viewer event loop for a loaded snapshot.
///
/// Sets up the terminal (raw mode, alternate screen), runs the event loop,
/// and restores the terminal on exit.
pub fn run(snapshot: NetworkSnapshot, start_timestep: usize) {
    enable_raw_mode().unwrap_or_else(|e| {
        eprintln!("error: failed to enable raw mode: {e}");
        std::process::exit(1);
    });

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).unwrap_or_else(|e| {
        let _ = disable_raw_mode();
        eprintln!("error: failed to enter alternate screen: {e}");
        std::process::exit(1);
    });

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).unwrap_or_else(|e| {
        let _ = disable_raw_mode();
        eprintln!("error: failed to create terminal: {e}");
        std::process::exit(1);
    });

    let mut app = App::new(snapshot, start_timestep);
    let result = event_loop(&mut terminal, &mut app);

    // Always restore terminal state, even after an event-loop error.
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    if let Err(e) = result {
        eprintln!("error: TUI crashed: {e}");
        std::process::exit(1);
    }
}

/// Core event loop: draw, poll input, dispatch keys.
fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| layout::render(frame, app))?;

        if app.quit {
            return Ok(());
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                controls::handle_key(app, key);
            }
        }
    }
}
