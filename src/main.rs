use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use touchkey::config::AppConfig;
use touchkey::device::{self, EvdevBackend};
use touchkey::error::Result;
use touchkey::session::OtpSession;
use touchkey::state::AppState;
use touchkey::trigger::GpioTrigger;
use touchkey::web;

/// Log level for the application
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// touchkey command line arguments
#[derive(Parser, Debug)]
#[command(name = "touchkey")]
#[command(version, about = "Remotely trigger a hardware security key and fetch its one-time password", long_about = None)]
struct CliArgs {
    /// Input device file of the security key (auto-detected when omitted)
    #[arg(short = 'd', long, value_name = "PATH")]
    device: Option<String>,

    /// GPIO character device connected to the trigger circuit
    #[arg(long, value_name = "DEV")]
    gpio_chip: Option<String>,

    /// GPIO line offset connected to the trigger circuit
    #[arg(short = 'p', long, value_name = "PIN")]
    pin: Option<u32>,

    /// Timeout in seconds when reading from the security key
    #[arg(short = 't', long, value_name = "SECS")]
    timeout: Option<f64>,

    /// Touch pulse duration in milliseconds
    #[arg(short = 'P', long, value_name = "MS")]
    pulse_duration: Option<u64>,

    /// List key-capable input devices and exit
    #[arg(long)]
    list_devices: bool,

    /// Run as an HTTP server instead of a one-shot trigger
    #[arg(short = 's', long)]
    server: bool,

    /// Listen address (server mode)
    #[arg(short = 'a', long, value_name = "ADDRESS")]
    address: Option<String>,

    /// HTTP port (server mode)
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,

    /// Accepted X-Auth-Token value, repeatable (server mode)
    #[arg(short = 'T', long = "auth-token", value_name = "TOKEN")]
    auth_tokens: Vec<String>,

    /// Configuration file (JSON)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short = 'l', long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_level, args.verbose);

    if args.list_devices {
        for device in device::list_devices() {
            let marker = if device.security_key { "*" } else { " " };
            println!("{} {}  {}", marker, device.path.display(), device.name);
        }
        return Ok(());
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => fail(err),
    };

    if args.server {
        run_server(config).await
    } else {
        run_once(config).await
    }
}

/// Load the config file if given and fold the CLI overrides in
fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(device) = &args.device {
        config.reader.device = Some(device.clone());
    }
    if let Some(chip) = &args.gpio_chip {
        config.trigger.chip = chip.clone();
    }
    if let Some(pin) = args.pin {
        config.trigger.pin = pin;
    }
    if let Some(secs) = args.timeout {
        config.reader.timeout_ms = (secs * 1000.0) as u64;
    }
    if let Some(ms) = args.pulse_duration {
        config.trigger.pulse_ms = ms;
    }
    if let Some(address) = &args.address {
        config.web.bind_address = address.clone();
    }
    if let Some(port) = args.port {
        config.web.port = port;
    }
    if !args.auth_tokens.is_empty() {
        config.web.auth_tokens = args.auth_tokens.clone();
    }

    Ok(config)
}

/// Build the acquisition pipeline against the real hardware
fn build_session(config: &AppConfig) -> Result<OtpSession> {
    let trigger = GpioTrigger::new(config.trigger.clone());
    trigger.init()?;
    Ok(OtpSession::new(
        config,
        Arc::new(trigger),
        Arc::new(EvdevBackend),
    ))
}

/// One-shot mode: trigger, print the OTP, exit
async fn run_once(config: AppConfig) -> anyhow::Result<()> {
    let result = match build_session(&config) {
        Ok(session) => session.acquire().await,
        Err(err) => Err(err),
    };

    match result {
        Ok(otp) => {
            println!("{}", otp);
            Ok(())
        }
        Err(err) => fail(err),
    }
}

/// Server mode: serve acquisitions over HTTP until shutdown
async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting touchkey v{}", env!("CARGO_PKG_VERSION"));

    if !config.web.auth_enabled() {
        tracing::warn!("no auth tokens configured; the OTP endpoint is unauthenticated");
    }

    let session = match build_session(&config) {
        Ok(session) => session,
        Err(err) => fail(err),
    };

    let addr: SocketAddr = format!("{}:{}", config.web.bind_address, config.web.port).parse()?;
    let state = AppState::new(config, session);
    let app = web::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting HTTP server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn fail(err: touchkey::AppError) -> ! {
    eprintln!("touchkey: error: {}", err);
    std::process::exit(err.exit_code());
}

async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
    tracing::info!("Shutdown signal received");
}

fn init_logging(level: LogLevel, verbose_count: u8) {
    // Verbose count overrides log level
    let effective_level = match verbose_count {
        0 => level,
        1 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };

    // Build filter string based on effective level
    let filter = match effective_level {
        LogLevel::Error => "touchkey=error,tower_http=error",
        LogLevel::Warn => "touchkey=warn,tower_http=warn",
        LogLevel::Info => "touchkey=info,tower_http=info",
        LogLevel::Debug => "touchkey=debug,tower_http=debug",
        LogLevel::Trace => "touchkey=trace,tower_http=debug",
    };

    // Environment variable takes highest priority
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if let Err(err) = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
    {
        eprintln!("failed to initialize tracing: {}", err);
    }
}
