use env_logger::{Builder, Target};
use std::sync::Once;

static INIT: Once = Once::new();

/// Install an `env_logger` backend for the `log` facade, honoring `RUST_LOG`.
///
/// Safe to call any number of times; only the first call has an effect. Embedders
/// that install their own logger should simply not call this.
pub fn initialize_logging() {
    INIT.call_once(|| {
        let mut builder = Builder::from_default_env();
        builder.target(Target::Stderr);
        // Another logger may already be installed by the host application
        if builder.try_init().is_err() {
            log::debug!("Logger already initialized, keeping existing backend");
        }
    });
}
