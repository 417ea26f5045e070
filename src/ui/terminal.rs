use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::app::App;

/// How long a poll waits for input before the next redraw.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Put the terminal into raw mode on the alternate screen and drive the
/// draw/input loop until the user quits. The terminal is restored even when
/// the loop bails out with an error, so a failure never strands the shell in
/// raw mode.
pub fn run_app(app: &mut App) -> Result<()> {
    enable_raw_mode().context("failed to switch the terminal to raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to create terminal backend")?;

    let outcome = event_loop(app, &mut terminal);
    restore_terminal(&mut terminal)?;
    outcome
}

fn event_loop(app: &mut App, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    loop {
        terminal
            .draw(|frame| app.render(frame))
            .context("failed to render the shelf view")?;

        if !event::poll(TICK_INTERVAL).context("event polling failed")? {
            continue;
        }
        let Event::Key(key) = event::read().context("failed to read event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if dispatch_ctrl(app, &key)? {
            continue;
        }
        if app.handle_key(key.code)? {
            return Ok(());
        }
    }
}

/// Book actions stay reachable while the search overlay is eating plain
/// characters, so Ctrl-modified keys take their own path. Returns whether the
/// event was consumed here.
fn dispatch_ctrl(app: &mut App, key: &KeyEvent) -> Result<bool> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(false);
    }
    match key.code {
        KeyCode::Char('t') => app.handle_ctrl_t()?,
        KeyCode::Char('d') => app.handle_ctrl_d()?,
        KeyCode::Char('e') => app.handle_ctrl_e()?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to take the terminal out of raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to return from the alternate screen")?;
    terminal.show_cursor().context("failed to restore cursor")
}
