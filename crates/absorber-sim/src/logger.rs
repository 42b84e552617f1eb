use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Compact human-readable logs on stderr. `RUST_LOG` overrides the default
/// filter.
pub fn init_cli_logger(verbose: bool) {
    let default_filter = if verbose {
        "absorber_sim=debug,absorber_core=debug,absorber_render=debug,info"
    } else {
        "absorber_sim=info,absorber_core=info,absorber_render=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
