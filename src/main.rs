use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::info;

use vitalwatch::app::{App, View};
use vitalwatch::control::{CommandClient, InterventionController};
use vitalwatch::data::DEFAULT_MAX_POINTS;
use vitalwatch::events;
use vitalwatch::poller::Poller;
use vitalwatch::source::{FileSource, HttpSource, SnapshotSource};
use vitalwatch::ui;

#[derive(Parser, Debug)]
#[command(name = "vitalwatch")]
#[command(about = "Real-time TUI for monitoring digital-twin vitals and recovery simulations")]
struct Args {
    /// Backend base URL (serves data.json and the command API)
    #[arg(short, long, default_value = "http://localhost:8000", conflicts_with = "file")]
    url: String,

    /// Poll a data.json file on disk instead of the HTTP endpoint.
    /// Commands still go to --url.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[arg(short, long, default_value = "1000")]
    refresh: u64,

    /// Rolling window size per metric
    #[arg(long, default_value_t = DEFAULT_MAX_POINTS)]
    max_points: usize,

    /// Write tracing output to this file (the terminal stays clean)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    // Background fetches and command dispatches run on this runtime while
    // the TUI loop stays on the main thread.
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let source: Arc<dyn SnapshotSource> = match args.file {
        Some(ref path) => Arc::new(FileSource::new(path)),
        None => Arc::new(HttpSource::new(&args.url)),
    };
    info!(source = source.description(), "starting vitalwatch");

    let controller = InterventionController::new(CommandClient::new(&args.url));
    let description = source.description().to_string();
    let app = App::new(controller, args.max_points, description);
    let poller = Poller::new(source);

    run_tui(app, poller, Duration::from_millis(args.refresh.max(100)))
}

fn init_logging(path: &std::path::Path) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}

/// Run the TUI with the given app and poller.
fn run_tui(mut app: App, mut poller: Poller, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Kick off the first fetch immediately
    poller.tick();

    let result = run_app(&mut terminal, &mut app, &mut poller, refresh_interval);

    // A fetch still in flight completes but its result is discarded
    poller.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    poller: &mut Poller,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 14;

    while app.running {
        // Fold completed polls and finished commands into the app
        for event in poller.drain() {
            app.apply_poll_event(event);
        }
        for (cmd, result) in app.controller.drain_results() {
            app.apply_command_result(cmd, result);
        }

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered =
                    ratatui::layout::Rect::new(0, area.height.saturating_sub(4) / 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Vitals => ui::vitals::render(frame, app, chunks[2]),
                View::Recovery => ui::recovery::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Periodic acquisition; the poller skips the tick if a fetch is
        // still outstanding
        if app.take_refresh_request() || last_refresh.elapsed() >= refresh_interval {
            poller.tick();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}
