use std::backtrace::Backtrace;
use std::panic::PanicHookInfo;

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber and panic logger. `RUST_LOG` wins over the
/// configured directives so operators can raise verbosity without touching
/// the deployed config.
pub fn init_tracing(default_directives: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    install_panic_logger();
}

// Panics inside handlers are converted to 500s by the catch-panic layer;
// this hook makes sure they also land in the log with a backtrace.
fn install_panic_logger() {
    std::panic::set_hook(Box::new(|info| {
        let message = panic_message(info);
        let backtrace = Backtrace::capture();
        match info.location() {
            Some(location) => {
                tracing::error!(panic = %message, %location, %backtrace, "panic")
            }
            None => tracing::error!(panic = %message, %backtrace, "panic"),
        }
    }));
}

fn panic_message<'a>(info: &'a PanicHookInfo<'_>) -> &'a str {
    if let Some(message) = info.payload().downcast_ref::<&str>() {
        message
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
