use env_logger::{Builder, Target, WriteStyle};
use log::{log, Level, LevelFilter};

/// Initialize the logging system on stderr.
///
/// Debug is the default level so the SMTP transcript is always printed;
/// `RUST_LOG` overrides it.
pub fn initialize_logging() -> Result<(), Box<dyn std::error::Error>> {
    configure(&mut Builder::new()).target(Target::Stderr).try_init()?;
    Ok(())
}

/// Shared builder settings, also used by the tests
fn configure(builder: &mut Builder) -> &mut Builder {
    builder
        // Set default log level
        .filter_level(LevelFilter::Debug)
        // Let RUST_LOG override it
        .parse_default_env()
        .format_timestamp_secs()
        .format_module_path(true)
        .write_style(WriteStyle::Auto)
}

/// Mask a username or secret for logging
pub fn format_sensitive(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Structured log line for one SMTP session phase.
///
/// Failures go out at `warn`; the error itself is reported once by the caller.
pub fn log_session_event(phase: &str, username: &str, success: bool, details: Option<&str>) {
    let level = if success { Level::Info } else { Level::Warn };
    log!(
        level,
        "SMTP event: phase={}, user={}, success={}, at={}, details={}",
        phase,
        format_sensitive(username),
        success,
        chrono::Local::now().format("%H:%M:%S%.3f"),
        details.unwrap_or("-")
    );
}
