use cubeview::logging::init_logging;
use cubeview::{AppConfig, AppError};

fn run() -> Result<(), AppError> {
    let config = AppConfig::load(AppConfig::default_filename())?;
    init_logging(config.log_level.to_level_filter());
    cubeview::run(config)
}

/// cubeview entry point
fn main() {
    if let Err(e) = run() {
        // The logger may not be up yet if the config failed to load.
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
