//! Logger installation behind the `log` facade.
//!
//! On wasm32 records go to the browser console through `console_log`;
//! natively `env_logger` writes them to stderr. Install once with [`init`];
//! later calls are no-ops.

use log::LevelFilter;

#[cfg(target_arch = "wasm32")]
fn install(level: LevelFilter) -> bool {
    console_log::init_with_level(level.to_level().unwrap_or(log::Level::Error)).is_ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn install(level: LevelFilter) -> bool {
    env_logger::Builder::new()
        .filter_level(level)
        .try_init()
        .is_ok()
}

/// Install the platform logger with the given maximum level.
///
/// Returns `true` if this call installed the logger, `false` if a logger
/// (this one or another) was already registered.
pub fn init(level: LevelFilter) -> bool {
    if !install(level) {
        return false;
    }
    log::set_max_level(level);
    true
}
