/// Initialize the global logger.
///
/// `level` applies unless `RUST_LOG` is set. wgpu internals are capped at
/// `warn` because they are very chatty at `info`. Calling this twice is a
/// no-op.
pub fn init_logging(level: log::LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .filter_module("wgpu_hal", log::LevelFilter::Warn)
        .filter_module("naga", log::LevelFilter::Warn);

    if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    }

    if builder.try_init().is_ok() {
        log::debug!("logging initialized at {}", level);
    }
}
