use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::{App, HttpServer, web};

use crate::adapters::api::{ApiState, configure_routes, cors};
use crate::adapters::db::{open_connection, run_migrations};
use crate::adapters::places::GooglePlacesClient;
use crate::app::config::AppConfig;
use crate::app::error::AppError;
use crate::app::marker_sync::MarkerSyncService;
use crate::app::services::{SqliteReservationService, StationFeedService};
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::geo::ViewportBounds;
use crate::domain::marker_board::Viewport;
use crate::domain::storefront::{Storefront, generate_catalog};

fn build_feed(config: &AppConfig) -> Result<StationFeedService, AppError> {
    let client = GooglePlacesClient::new(
        &config.places_base_url,
        &config.places_api_key,
        Duration::from_millis(config.places_timeout_ms),
    )
    .map_err(AppError::runtime)?;

    Ok(
        StationFeedService::new(Arc::new(client), config.default_search_radius_m)
            .with_map_radius(config.map_search_radius_m),
    )
}

fn initial_viewport(config: &AppConfig) -> Option<Viewport> {
    config.map_center.map(|center| Viewport {
        bounds: ViewportBounds::around(center, config.map_span_deg),
        reference: center,
    })
}

fn build_api_state(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<ApiState, AppError> {
    let mut connection = open_connection(&config.db_path).map_err(AppError::database_init)?;
    run_migrations(&mut connection).map_err(AppError::database_init)?;

    let feed = build_feed(config)?;
    let marker_sync =
        MarkerSyncService::new(feed.clone(), Arc::clone(&clock), initial_viewport(config));
    let catalog = generate_catalog(&mut rand::rng());

    tracing::info!(product_count = catalog.len(), "storefront catalog generated");

    Ok(ApiState {
        station_feed: feed,
        marker_sync,
        reservations: SqliteReservationService::new(Arc::new(Mutex::new(connection))),
        storefront: Arc::new(Mutex::new(Storefront::new(catalog))),
        clock,
    })
}

async fn serve(config: &AppConfig, state: ApiState) -> std::io::Result<()> {
    tracing::info!(bind = %config.http_bind, "http server starting");

    HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes)
    })
    .bind(&config.http_bind)?
    .run()
    .await
}

/// HTTP API plus the background marker refresh loop.
pub fn run(config: AppConfig) -> Result<(), AppError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = build_api_state(&config, clock)?;
    let period = Duration::from_millis(config.map_refresh_interval_ms);

    actix_web::rt::System::new()
        .block_on(async {
            actix_web::rt::spawn(state.marker_sync.clone().run_refresh_loop(period));
            serve(&config, state).await
        })
        .map_err(AppError::runtime)
}

pub fn run_api(config: AppConfig) -> Result<(), AppError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = build_api_state(&config, clock)?;

    actix_web::rt::System::new()
        .block_on(serve(&config, state))
        .map_err(AppError::runtime)
}

/// Headless marker sync; needs `MAP_CENTER` because no client ever reports a
/// viewport.
pub fn run_sync(config: AppConfig) -> Result<(), AppError> {
    let viewport = initial_viewport(&config)
        .ok_or_else(|| AppError::config("MAP_CENTER is required for the marker sync"))?;
    let feed = build_feed(&config)?;
    let sync = MarkerSyncService::new(feed, Arc::new(SystemClock), Some(viewport));
    let period = Duration::from_millis(config.map_refresh_interval_ms);

    tracing::info!(
        interval_ms = config.map_refresh_interval_ms,
        north = viewport.bounds.north,
        south = viewport.bounds.south,
        east = viewport.bounds.east,
        west = viewport.bounds.west,
        "marker sync starting"
    );

    actix_web::rt::System::new().block_on(sync.run_refresh_loop(period));

    Ok(())
}
