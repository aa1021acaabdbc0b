//! Command Map - operator console for the command registry and dispatcher.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use command_map::audit::AuditLogger;
use command_map::commands::builtin::builtin_commands;
use command_map::commands::{CommandRegistry, Dispatcher};
use command_map::config::{CommandsConfig, Settings};
use command_map::entity::{EntityDirectory, Player, PlayerDirectory};
use command_map::feedback::{ConsoleFeedback, FeedbackSink};
use command_map::permission::GrantTable;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", NAME, VERSION);
        return ExitCode::SUCCESS;
    }

    let config_path = get_config_path(&args);

    let settings = match Settings::load(&config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&settings) {
        eprintln!("Error initializing logging: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting {} v{}", NAME, VERSION);
    info!("Configuration loaded from: {}", config_path);
    info!("Log level: {}", settings.logging.level);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async_main(settings, config_path));
    // The stdin reader sits on a blocking thread that never returns by itself.
    runtime.shutdown_timeout(Duration::from_secs(1));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command map failed");
            ExitCode::FAILURE
        }
    }
}

/// Async main function.
async fn async_main(
    settings: Settings,
    config_path: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let feedback: Arc<dyn FeedbackSink> = Arc::new(ConsoleFeedback::new());

    let directory = Arc::new(PlayerDirectory::new());
    for seed in &settings.directory.players {
        directory.insert(Player::new(seed.uid, seed.account_id.clone(), seed.online));
    }
    info!(players = directory.len(), "Player directory seeded");

    let registry = Arc::new(CommandRegistry::new());
    load_commands(&registry, &directory, &settings.commands);

    let policy = Arc::new(GrantTable::from_config(
        &settings.permissions,
        Arc::clone(&feedback),
    ));

    let mut dispatcher = Dispatcher::new(
        Arc::clone(&registry),
        Arc::clone(&directory) as Arc<dyn EntityDirectory>,
        policy,
        feedback,
    );
    let mut audit = None;
    if settings.audit.enabled {
        let logger = Arc::new(AuditLogger::new(&settings.audit.log_path)?);
        info!(path = %logger.path().display(), "Audit logging enabled");
        dispatcher = dispatcher.with_audit(Arc::clone(&logger));
        audit = Some(logger);
    }
    let dispatcher = Arc::new(dispatcher);

    let console = run_console(Arc::clone(&dispatcher), settings.console.prompt.clone());
    tokio::pin!(console);

    loop {
        tokio::select! {
            result = &mut console => {
                if let Err(e) = result {
                    error!(error = %e, "Console input failed");
                    return Err(e.into());
                }
                info!("Console input closed");
                break;
            }
            _ = shutdown_signal() => {
                info!("Shutdown signal received");
                break;
            }
            _ = reload_signal() => {
                info!("Reload signal received, reloading command table...");
                match Settings::load(&config_path) {
                    Ok(new_settings) => {
                        load_commands(&registry, &directory, &new_settings.commands);
                        info!("Command table reloaded");
                    }
                    Err(e) => {
                        error!(
                            error = %e,
                            "Failed to reload configuration, keeping existing commands"
                        );
                    }
                }
            }
        }
    }

    if let Some(logger) = audit {
        info!(entries = logger.entries_written(), "Audit log closed");
    }
    info!("Command map stopped");
    Ok(())
}

/// Register the built-in table, then drop the disabled labels.
///
/// Registration overwrites, so calling this again is a hot reload.
fn load_commands(
    registry: &Arc<CommandRegistry>,
    directory: &Arc<PlayerDirectory>,
    config: &CommandsConfig,
) {
    registry.register_all(builtin_commands(registry, directory));

    for label in &config.disabled {
        if registry.unregister(label.trim()) {
            info!(command = %label, "Command disabled by configuration");
        } else {
            warn!(command = %label, "Disabled command is not registered");
        }
    }
}

/// Read console lines and dispatch each one as the console invoker.
async fn run_console(dispatcher: Arc<Dispatcher>, prompt: String) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };

        // Inline handlers block the calling thread; keep them off the reactor.
        let dispatcher = Arc::clone(&dispatcher);
        let task = tokio::task::spawn_blocking(move || dispatcher.invoke(None, None, &line));
        if let Err(e) = task.await {
            error!(error = %e, "Console command panicked");
        }
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Wait for a reload signal (SIGHUP).
#[cfg(unix)]
async fn reload_signal() {
    match signal::unix::signal(signal::unix::SignalKind::hangup()) {
        Ok(mut sig) => {
            sig.recv().await;
        }
        Err(e) => {
            error!(error = %e, "Failed to install SIGHUP handler");
            std::future::pending::<()>().await;
        }
    }
}

/// No-op reload signal for non-Unix platforms.
#[cfg(not(unix))]
async fn reload_signal() {
    std::future::pending::<()>().await;
}

/// Print help message.
fn print_help() {
    println!(
        r#"{} {}
Command registry and dispatcher console.

USAGE:
    {} [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file
                           [default: command-map.toml]
    -h, --help             Print help information
    -V, --version          Print version information

CONSOLE:
    <label> [args...]      Run a command (e.g. `help`, `status @10001`)
    target [@]<uid>        Remember a default target
    @<uid>                 Same as `target <uid>`
    target                 Clear the remembered target
"#,
        NAME, VERSION, NAME
    );
}

/// Get configuration file path from command line arguments.
fn get_config_path(args: &[String]) -> String {
    for (i, arg) in args.iter().enumerate() {
        if (arg == "--config" || arg == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    "command-map.toml".to_string()
}

/// Initialize logging based on settings.
fn init_logging(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    match settings.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
