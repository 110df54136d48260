//! Tracing initialization.
//!
//! Default level comes from verbosity; the `LOG` env var and the config
//! filter refine it with standard `tracing_subscriber` directives. Output
//! goes to stdout only - log shipping belongs to the host application.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init(verbosity: u8, logging: &LoggingConfig) {
    if !logging.stdout {
        return;
    }

    let mut filter = EnvFilter::builder()
        .with_default_directive(level_from_verbosity(verbosity).into())
        .with_env_var("LOG")
        .from_env_lossy();
    if let Some(directives) = logging.filter.as_deref() {
        for directive in directives.split(',').filter(|d| !d.trim().is_empty()) {
            match directive.trim().parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(err) => eprintln!("invalid log filter directive {directive:?}: {err}"),
            }
        }
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    let result = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    // Already initialized (tests, embedding hosts): keep the existing one.
    let _ = result;
}

fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
