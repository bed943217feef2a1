//! Log setup. Logs go to stderr so stdout stays clean for the availability text.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins when set; otherwise warnings only, or debug with `--verbose`.
pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "slot_engine=debug,slots=debug"
    } else {
        "slot_engine=warn,slots=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second init (e.g. in tests) is not an error worth failing over.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .without_time()
                .compact(),
        )
        .try_init();
}
