//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a stderr subscriber. `RUST_LOG` wins over the `--debug` default.
pub fn init_logging(debug: bool) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let default_directives = if debug {
        "warn,promscope=debug,promscope_cli=debug,promscope_core=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
