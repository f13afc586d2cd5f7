//! Internal HTTP endpoint
//!
//! Serves the cached, filtered asset list as JSON under `/api`. Upstream failures
//! become a 500 with a generic `{ "error": ... }` body.

pub mod routes;

pub use routes::*;

use actix_web::{middleware::Logger, web, App, HttpServer};

use crate::config::DashboardConfig;

/// Registers the asset routes under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(get_assets)
            .service(refresh_assets),
    );
}

/// Builds shared route state from configuration
pub fn state_from_config(config: &DashboardConfig) -> web::Data<ServerState> {
    web::Data::new(ServerState {
        cache: config.build_cache(),
        view_options: config.view_options(),
    })
}

/// Runs the HTTP server until shutdown
pub async fn run(config: DashboardConfig) -> std::io::Result<()> {
    let state = state_from_config(&config);

    log::info!(
        "Serving /api/crypto on {} (upstream {}, freshness {}s)",
        config.bind_addr,
        config.upstream_url,
        config.freshness_window_secs
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind(config.bind_addr)?
    .run()
    .await
}
