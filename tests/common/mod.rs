use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TEST_SETUP: Once = Once::new();

/// Installs a global fmt subscriber for the test binary. `RUST_LOG` overrides the default
/// `debug` filter.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        if let Err(e) = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init()
        {
            eprintln!("Error: Failed to set up logging: {}", e);
        }
    });
}
