use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::info;

use crate::core::ListController;

mod app;
mod constants;
mod helpers;

use app::{App, OpReport};
pub use app::SessionOptions;
use constants::TICK_RATE;

type Backend = CrosstermBackend<Stdout>;

/// Run the terminal UI on a single-threaded runtime until the user quits.
pub fn run(options: SessionOptions) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(run_session(options))
}

async fn run_session(options: SessionOptions) -> Result<()> {
    let (report_tx, report_rx) = mpsc::unbounded_channel();
    let mut app = App::new(ListController::new(), options, report_tx);
    info!("tasklet session started");

    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;

    let result = run_app(&mut terminal, &mut app, report_rx).await;

    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    info!("tasklet session ended");
    result
}

async fn run_app(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    mut reports: UnboundedReceiver<OpReport>,
) -> Result<()> {
    let (event_tx, mut events) = mpsc::unbounded_channel();
    let reader = tokio::task::spawn_blocking(move || forward_events(event_tx));
    let mut ticker = tokio::time::interval(TICK_RATE);

    let result = loop {
        if let Err(err) = terminal.draw(|f| app.draw(f)) {
            break Err(err).context("failed to draw frame");
        }
        if app.should_quit() {
            break Ok(());
        }

        tokio::select! {
            event = events.recv() => match event {
                Some(Ok(event)) => {
                    if let Err(err) = app.on_event(event) {
                        break Err(err);
                    }
                }
                Some(Err(err)) => break Err(err).context("failed to read terminal event"),
                None => break Ok(()),
            },
            Some(report) = reports.recv() => app.on_report(report),
            _ = ticker.tick() => app.on_tick(),
        }
    };

    // Closing the channel stops the reader at its next poll timeout.
    drop(events);
    reader.await.context("terminal reader panicked")?;
    result
}

/// Blocking loop that forwards terminal events until the receiver goes away.
fn forward_events(tx: UnboundedSender<io::Result<Event>>) {
    while !tx.is_closed() {
        match event::poll(TICK_RATE) {
            Ok(true) => {
                if tx.send(event::read()).is_err() {
                    break;
                }
            }
            Ok(false) => {}
            Err(err) => {
                let _ = tx.send(Err(err));
                break;
            }
        }
    }
}
