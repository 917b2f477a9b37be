use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise the crate logs at `fallback`.
fn filter_or(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Stderr only, so stdout stays clean for rendered output and AI answers.
pub fn init_cli_logger(verbose: bool) {
    let directive = if verbose {
        "coffee_architect=debug,warn"
    } else {
        "coffee_architect=warn"
    };

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    // try_init: tests and embedders may already have installed a subscriber
    let _ = tracing_subscriber::registry()
        .with(filter_or(directive))
        .with(console)
        .try_init();
}

/// One JSON object per event; the function runtime stamps the time itself.
pub fn init_lambda_logger() {
    let json = fmt::layer()
        .with_target(false)
        .without_time()
        .json()
        .with_current_span(false);

    let _ = tracing_subscriber::registry()
        .with(filter_or("coffee_architect=info"))
        .with(json)
        .try_init();
}
