/// Solidview Terminal - interactive solid volume explorer
///
/// Controls:
///   - Mouse drag / wheel: orbit and zoom the camera
///   - Tab / Arrow keys: pick and adjust a parameter
///   - [ ]: lower / raise the target volume
///   - 1-4: trapezoid, cuboid, cylinder, cone
///   - Q/ESC: Quit
///
/// Set `SOLIDVIEW_CONFIG` to a TOML file to override the defaults, and
/// `RUST_LOG` to change the log level (logs go to the user data directory).

use std::io;
use solidview_core::SessionConfig;
use solidview_terminal::TerminalApp;
use tracing_appender::non_blocking::WorkerGuard;

fn init_logging() -> WorkerGuard {
    let log_dir = dirs::data_local_dir().unwrap_or_default().join("solidview");
    // The appender cannot open a file in a missing directory
    let _ = std::fs::create_dir_all(&log_dir);

    let file_appender = tracing_appender::rolling::never(&log_dir, "solidview.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    guard
}

fn load_config() -> io::Result<SessionConfig> {
    match std::env::var_os("SOLIDVIEW_CONFIG") {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            SessionConfig::from_toml_str(&text)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        }
        None => Ok(SessionConfig::default()),
    }
}

fn main() -> io::Result<()> {
    let _log_guard = init_logging();

    let config = load_config()?;
    tracing::info!(shape = %config.shape, "solidview terminal starting");

    let app = TerminalApp::new(&config)?;
    app.run()?;

    println!("Thank you for using Solidview!");
    Ok(())
}
