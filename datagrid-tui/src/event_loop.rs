//! Main event loop.

use std::io;

use crossterm::event::EventStream;
use futures::StreamExt;
use log::{debug, info, trace, warn};

use crate::app::GridApp;
use crate::render::{HitMap, draw};
use crate::terminal::TerminalGuard;

/// Runs until the app asks to quit or the terminal event stream ends.
///
/// Each event is handled to completion and followed by a full repaint, so the
/// view is always derived from the state the user just produced.
pub async fn run(app: &mut GridApp, terminal: &mut TerminalGuard) -> io::Result<()> {
    let mut events = EventStream::new();

    let size = terminal.size()?;
    app.set_size(size.width, size.height);
    render(app, terminal)?;

    info!("Event loop started");

    while !app.should_quit() {
        tokio::select! {
            next = events.next() => match next {
                Some(Ok(event)) => {
                    trace!("Terminal event: {:?}", event);
                    app.handle_event(event);
                }
                Some(Err(e)) => {
                    warn!("Terminal event error: {}", e);
                    return Err(e);
                }
                None => {
                    debug!("Event stream closed");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => app.quit(),
        }

        render(app, terminal)?;
    }

    info!("Event loop finished");
    Ok(())
}

fn render(app: &mut GridApp, terminal: &mut TerminalGuard) -> io::Result<()> {
    let mut hits = HitMap::default();
    terminal.terminal().draw(|frame| hits = draw(app, frame))?;
    app.set_hits(hits);
    Ok(())
}
