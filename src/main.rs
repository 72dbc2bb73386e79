use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cloudman::app::{self, App};
use cloudman::cli::Cli;
use cloudman::config::Config;
use cloudman::docker::{self, CancelToken};
use cloudman::ops::{self, ActionRequest, Outcome};
use cloudman::ui;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to resolve the working directory")?;
    let cfg = cli.load_config(&cwd)?;

    if let Some(request) = cli.headless_request()? {
        init_logging(cli.log_filter(), None)?;
        return run_headless(&request, &cfg);
    }

    init_logging(cli.log_filter(), Some(&cfg.log_path()))?;

    // Ensure terminal is restored on panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, App::new(cfg, cwd));
    restore_terminal()?;
    result
}

/// Log to `file` when the UI owns the terminal, otherwise to stderr.
fn init_logging(default_filter: &str, file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);

    match file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
    Ok(())
}

fn run_headless(request: &ActionRequest, cfg: &Config) -> Result<()> {
    docker::ensure_available(&cfg.docker_binary)?;
    let outcome = ops::execute(request, cfg, &CancelToken::new(), |line| {
        tracing::debug!("{line}");
    });
    if outcome.is_error() {
        bail!("{}", outcome.message);
    }
    println!("{}", outcome.message);
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    match docker::ensure_available(&app.config.docker_binary) {
        Ok(version) => {
            info!(%version, "connected to docker");
            app.push_activity(format!("Connected to Docker Engine {version}"));
        }
        Err(e) => {
            warn!(error = %e, "docker unavailable");
            app.show_message(Outcome::error(
                "Docker unavailable",
                format!("{e:#}\n\nOnly \"Create Dockerfile\" will work until the daemon is reachable."),
            ));
        }
    }

    while app.running {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Short poll while an action runs so streamed output shows promptly.
        let poll_timeout = if app.busy.is_some() {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(200)
        };
        if event::poll(poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            app::handle_key(&mut app, key);
            let size = terminal.size()?;
            let area = Rect::new(0, 0, size.width, size.height);
            if let Some(max) = app.message.as_ref().map(|m| ui::max_message_scroll(m, area)) {
                app.clamp_message_scroll(max);
            }
        }

        app.start_pending();
        app.drain_events();
    }

    if let Some(token) = &app.cancel_token {
        token.cancel();
    }
    Ok(())
}
