use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use papers_core::config_file::{self, Overrides};
use papers_core::storage::load_theme;
use papers_core::{CatalogScope, HttpPapersService, PapersService, ThemePreference};

mod action;
mod app;
mod backend;
mod input;
mod model;
mod persistence;
mod theme;
mod tui_event;
mod view;

use app::App;

/// Papers TUI: browse, filter and upload previous-year exam papers.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Papers service base URL (overrides everything else)
    #[arg(long)]
    base_url: Option<String>,

    /// Use a papers service running on localhost:8080
    #[arg(long)]
    local: bool,

    /// Open this course's page directly
    #[arg(long, conflicts_with = "all")]
    course: Option<String>,

    /// Open the all-papers page directly
    #[arg(long)]
    all: bool,

    /// Color theme: dark or light (overrides the saved preference)
    #[arg(long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = persistence::init_logging();

    // Resolve config from CLI flags > env vars > config file > defaults
    let file_cfg = config_file::load_config();
    let config = config_file::resolve(
        &file_cfg,
        &Overrides {
            base_url: args.base_url.clone(),
            local: args.local,
        },
    );
    tracing::info!(base_url = %config.base_url, "starting papers-tui");

    let service: Arc<dyn PapersService> = Arc::new(HttpPapersService::from_config(&config)?);
    let store = persistence::open_store(&config.data_dir);

    // Theme: flag > saved preference > config file > dark
    let preference = args
        .theme
        .as_deref()
        .and_then(ThemePreference::parse)
        .or_else(|| load_theme(&store))
        .or_else(|| file_cfg.theme().and_then(ThemePreference::parse))
        .unwrap_or(ThemePreference::Dark);

    let mut app = App::new(
        theme::Theme::from_preference(preference),
        store,
        config.base_url.clone(),
    );

    // Set up backend command channel
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<tui_event::BackendCommand>();
    let cancel = CancellationToken::new();
    app.backend_cmd_tx = Some(cmd_tx);

    tokio::spawn(backend::run_listener(
        Arc::clone(&service),
        config.download_dir.clone(),
        cmd_rx,
        event_tx,
        cancel.clone(),
    ));

    // Course index is fetched once; Home and the palette share it.
    app.load_courses();
    if args.all {
        app.open_course(CatalogScope::All);
    } else if let Some(title) = args.course.as_deref() {
        app.open_course(CatalogScope::from_param(Some(title)));
    }

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let action = input::map_event(&evt, &app.input_mode);
                    app.update(action);
                }
            } => {}
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    Ok(())
}
