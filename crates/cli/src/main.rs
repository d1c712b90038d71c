use anyhow::{Context, Result};
use clap::Parser;
use console::Term;
use sierpinski_api_client::ApiClient;
use sierpinski_cli::args::{CliArgs, Command};
use sierpinski_cli::commands;
use sierpinski_cli::config::{build_client, load_config};
use sierpinski_cli::console_helper::ConsoleHelper;
use sierpinski_cli::shell::{CommandLine, PROMPT};
use sierpinski_config::{DashboardConfig, LoggingConfig};
use sierpinski_dashboard::{compose, render_dashboard, render_ticker, Dashboard, Ticker, TickerSource};
use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::task::{self, JoinHandle};
use tokio::time::{interval, MissedTickBehavior};
use tokio::signal;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// How long shutdown waits for the console thread blocked on stdin.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(200);

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_tracing(&config.logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    let result = runtime.block_on(run(args.command(), config));
    runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
    result
}

async fn run(command: Command, config: DashboardConfig) -> Result<()> {
    let client = build_client(&config)?;
    match command {
        Command::Dashboard => run_dashboard(client, &config).await,
        Command::Ticker { source } => run_ticker(client, source, &config).await,
        other => {
            let value = commands::run(&client, &other, &config.token).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
    }
}

async fn run_dashboard(client: ApiClient, config: &DashboardConfig) -> Result<()> {
    let dashboard = Dashboard::new(client, config);
    dashboard.mount().await;

    info!(
        target: "sierpinski",
        api = %config.api.base_url,
        refresh_ms = config.ui.refresh_ms,
        "dashboard started; type `help` for commands, Ctrl+C to exit"
    );

    let redraw = spawn_redraw(dashboard.clone(), config.ui.refresh());
    let command_line = Arc::new(CommandLine::new(dashboard.clone(), Handle::current()));

    let shell_handle = task::spawn_blocking({
        let command_line = Arc::clone(&command_line);
        move || command_line.run_shell()
    });

    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(err) = result {
                error!(target: "sierpinski", error = %err, "failed to wait for shutdown signal");
            } else {
                info!(target: "sierpinski", "shutdown signal received (Ctrl+C)");
            }
        }
        shell = shell_handle => {
            match shell {
                Ok(Ok(())) => info!(target: "sierpinski", "console session ended"),
                Ok(Err(err)) => error!(target: "sierpinski", error = %err, "console session failed"),
                Err(err) => error!(target: "sierpinski", error = %err, "console task error"),
            }
        }
    }

    redraw.abort();
    dashboard.unmount().await;
    info!(target: "sierpinski", "dashboard stopped");
    Ok(())
}

/// Repaints the dashboard every `period` until aborted.
fn spawn_redraw(dashboard: Dashboard, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let term = Term::stdout();
        let mut ticks = interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticks.tick().await;
            if ConsoleHelper::is_prompting() {
                continue;
            }
            let state = dashboard.snapshot().await;
            let scene = compose(&state.stats, &mut rand::thread_rng());
            let frame = format!(
                "{}\nType `help` for commands.\n{PROMPT}> ",
                render_dashboard(&state, &scene)
            );
            if let Err(err) = draw(&term, &frame) {
                debug!(target: "sierpinski", error = %err, "redraw failed");
            }
        }
    })
}

async fn run_ticker(client: ApiClient, source: TickerSource, config: &DashboardConfig) -> Result<()> {
    let ticker = Arc::new(Ticker::new(client, source, config.polling.ticker()));
    let poller = Arc::clone(&ticker).spawn();

    let term = Term::stdout();
    let mut ticks = interval(config.ui.refresh());
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                if let Err(err) = result {
                    error!(target: "sierpinski", error = %err, "failed to wait for shutdown signal");
                }
                break;
            }
            _ = ticks.tick() => {
                let view = ticker.snapshot().await;
                if let Err(err) = draw(&term, &render_ticker(&view, Instant::now())) {
                    debug!(target: "sierpinski", error = %err, "redraw failed");
                }
            }
        }
    }

    poller.abort();
    info!(target: "sierpinski", %source, "ticker stopped");
    Ok(())
}

fn draw(term: &Term, frame: &str) -> io::Result<()> {
    if term.is_term() {
        term.clear_screen()?;
    }
    term.write_str(frame)?;
    term.flush()
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let level = logging.level.trim().to_ascii_lowercase();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{level},sierpinski={level}")))
        .unwrap_or_else(|_| EnvFilter::new("info,sierpinski=info"));

    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let _ = fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = fmt()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .try_init();
        }
    }
    Ok(())
}
