//! Terminal setup and teardown with panic safety.

use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::debug;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Size;

/// Owns the terminal for the lifetime of the UI and restores it on drop.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    /// Initialize the terminal for TUI rendering.
    ///
    /// If any step fails, whatever was already switched on is switched off
    /// again before the error is returned.
    pub fn new() -> io::Result<Self> {
        let terminal = start(
            setup,
            || {
                let _ = restore_terminal();
            },
            install_panic_hook,
        )?;
        Ok(Self { terminal })
    }

    /// Get mutable access to the terminal for rendering.
    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    pub fn size(&self) -> io::Result<Size> {
        self.terminal.size()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Runs `setup`, then `ready` once it has succeeded. A failed setup runs
/// `undo` instead and `ready` never runs.
fn start<T>(
    setup: impl FnOnce() -> io::Result<T>,
    undo: impl FnOnce(),
    ready: impl FnOnce(),
) -> io::Result<T> {
    match setup() {
        Ok(value) => {
            ready();
            Ok(value)
        }
        Err(e) => {
            undo();
            Err(e)
        }
    }
}

/// Restores the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

fn setup() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    debug!("Terminal initialized at {:?}", terminal.size()?);
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_failed_setup_skips_ready() {
        let undone = Cell::new(false);
        let ready = Cell::new(false);

        let result: io::Result<()> = start(
            || Err(io::Error::other("no tty")),
            || undone.set(true),
            || ready.set(true),
        );

        assert!(result.is_err());
        assert!(undone.get());
        assert!(!ready.get());
    }

    #[test]
    fn test_ready_runs_after_setup() {
        let order = Cell::new(0);
        let ready_at = Cell::new(0);

        let result = start(
            || {
                order.set(order.get() + 1);
                Ok(7)
            },
            || panic!("undo after successful setup"),
            || ready_at.set(order.get()),
        );

        assert_eq!(result.unwrap(), 7);
        assert_eq!(ready_at.get(), 1);
    }
}
