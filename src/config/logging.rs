use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "linguacoach=info";

pub fn init(verbose: bool) {
    let fallback = if verbose {
        "linguacoach=debug"
    } else {
        DEFAULT_FILTER
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
