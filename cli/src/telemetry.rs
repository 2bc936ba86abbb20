use tracing_subscriber::EnvFilter;

/// Initialize logging for binaries embedding the front end. Library
/// code only emits `tracing` events and never installs a subscriber.
pub fn init() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
}
