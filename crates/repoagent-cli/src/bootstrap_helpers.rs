use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber; stdout carries only the JSON result.
pub(crate) fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
