mod config;
mod error;
mod logging;
pub mod marker_sync;
mod runtime;
pub mod services;

pub use error::AppError;

fn bootstrap(mode: &str) -> Result<config::AppConfig, AppError> {
    logging::init()?;

    let config = config::AppConfig::from_env()?;

    tracing::info!(
        mode,
        places_base_url = %config.places_base_url,
        places_timeout_ms = config.places_timeout_ms,
        default_search_radius_m = config.default_search_radius_m,
        map_search_radius_m = config.map_search_radius_m,
        db_path = %config.db_path,
        http_bind = %config.http_bind,
        map_refresh_interval_ms = config.map_refresh_interval_ms,
        map_center = ?config.map_center,
        "application bootstrap initialized"
    );

    Ok(config)
}

pub fn run() -> Result<(), AppError> {
    let config = bootstrap("combined")?;
    runtime::run(config)
}

pub fn run_api() -> Result<(), AppError> {
    let config = bootstrap("api")?;
    runtime::run_api(config)
}

pub fn run_sync() -> Result<(), AppError> {
    let config = bootstrap("sync")?;
    runtime::run_sync(config)
}
