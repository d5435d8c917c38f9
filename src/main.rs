// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
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
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod data;
mod events;
mod monitor;
mod persist;
mod probe;
mod settings;
mod ui;

use app::App;
use monitor::{run_probe_loop, run_settings_loop, Control, Monitor};
use persist::StateStore;
use probe::TcpProbe;
use settings::SettingsStore;

/// How long shutdown waits for the background tasks before proceeding.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "upwatch")]
#[command(about = "Terminal connectivity monitor with a persistent uptime strip chart")]
struct Args {
    /// Target to monitor as host:port
    #[arg(default_value = "8.8.8.8:53")]
    target: String,

    /// Directory for state, settings, and log files
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("creating data dir {}", args.data_dir.display()))?;
    init_logging(&args.data_dir)?;

    let (host, port) = parse_target(&args.target)?;
    info!(target = %args.target, "starting upwatch");

    // Persistence, keyed by the sanitized address.
    let state = StateStore::new(&args.data_dir, &args.target);
    let settings_store = SettingsStore::new(&args.data_dir, &args.target);
    let settings = settings_store.load();

    let monitor = Monitor::new(state);
    let probe = TcpProbe::new(host, port);

    // Control and shutdown channels for the background loops.
    let (ctrl_tx, ctrl_rx) = watch::channel(Control { paused: false, settings });
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let rt = tokio::runtime::Runtime::new()?;
    let probe_handle = rt.spawn(run_probe_loop(
        Arc::clone(&monitor),
        probe,
        ctrl_rx.clone(),
        shutdown_rx.clone(),
    ));
    let settings_handle =
        rt.spawn(run_settings_loop(settings_store.clone(), ctrl_rx, shutdown_rx));

    let mut app = App::new(args.target.clone(), Arc::clone(&monitor), ctrl_tx, settings);
    let result = run_tui(&mut app);

    // Cooperative shutdown: signal, wait bounded, then flush regardless.
    let _ = shutdown_tx.send(true);
    rt.block_on(async {
        let join = async {
            let _ = probe_handle.await;
            let _ = settings_handle.await;
        };
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, join).await.is_err() {
            error!("background tasks did not stop in time, flushing anyway");
        }
    });
    monitor.persist();
    if let Err(e) = settings_store.save(app.settings) {
        error!(error = %e, "failed saving settings at shutdown");
    }
    info!("stopped");

    if let Err(ref e) = result {
        error!(error = ?e, "event loop failed");
    }
    result
}

/// Split a `host:port` target, keeping IPv6-style hosts intact.
fn parse_target(target: &str) -> Result<(String, u16)> {
    let (host, port) = target
        .rsplit_once(':')
        .with_context(|| format!("target {:?} is not host:port", target))?;
    let port: u16 =
        port.parse().with_context(|| format!("invalid port in target {:?}", target))?;
    if host.is_empty() {
        anyhow::bail!("target {:?} has an empty host", target);
    }
    Ok((host.to_string(), port))
}

/// Route logs to a file; the TUI owns the terminal.
fn init_logging(data_dir: &std::path::Path) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("upwatch.log"))
        .context("opening log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}

/// Run the TUI event loop until the user quits.
fn run_tui(app: &mut App) -> Result<()> {
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

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 40;
    const MIN_HEIGHT: u16 = 8;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let y = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, y, area.width, 5.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(4),    // Strip chart
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::chart::render(frame, app, chunks[1]);
            ui::common::render_status_bar(frame, app, chunks[2]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout; the chart redraws every
        // iteration since time itself moves the window.
        if let Some(event) = events::poll_event(Duration::from_millis(250))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}
