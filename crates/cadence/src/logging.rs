use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "CADENCE_LOG";

/// Installs the stderr subscriber. `CADENCE_LOG` wins over `-v`.
pub(crate) fn init(verbose: u8) {
    let base_filter = match std::env::var(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => level_for(verbose).to_string(),
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
