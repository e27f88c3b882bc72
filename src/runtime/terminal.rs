use std::error::Error;
use std::io::{self, Stdout};

use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn setup() -> Result<Tui, Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Undo [`setup`]. Safe to call after a partial setup.
pub fn restore() -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}

/// Run `body` inside the session `setup` opens. `shutdown` and `restore` run
/// however it ends, including when `setup` itself fails. The first error wins.
pub fn guarded<S, C>(
    ctx: &mut C,
    setup: impl FnOnce() -> Result<S, Box<dyn Error>>,
    body: impl FnOnce(&mut S, &mut C) -> Result<(), Box<dyn Error>>,
    shutdown: impl FnOnce(&mut C),
    restore: impl FnOnce() -> Result<(), Box<dyn Error>>,
) -> Result<(), Box<dyn Error>> {
    let result = match setup() {
        Ok(mut session) => body(&mut session, &mut *ctx),
        Err(e) => Err(e),
    };
    shutdown(ctx);
    let restored = restore();
    result.and(restored)
}
