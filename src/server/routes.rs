use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::cache::AssetCache;
use crate::data::{build_view, AssetRecord, FetchError, ViewOptions};

/// Shared state for the asset routes
pub struct ServerState {
    pub cache: AssetCache,
    pub view_options: ViewOptions,
}

#[derive(Deserialize)]
pub struct AssetQuery {
    /// Optional search text matched against name or symbol
    pub q: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

#[actix_web::get("/crypto")]
pub async fn get_assets(
    state: web::Data<ServerState>,
    query: web::Query<AssetQuery>,
) -> HttpResponse {
    let result = state.cache.get().await;
    respond(&state, result, query.q.as_deref())
}

#[actix_web::post("/crypto/refresh")]
pub async fn refresh_assets(
    state: web::Data<ServerState>,
    query: web::Query<AssetQuery>,
) -> HttpResponse {
    let result = state.cache.refresh().await;
    respond(&state, result, query.q.as_deref())
}

fn respond(
    state: &ServerState,
    result: Result<Vec<AssetRecord>, FetchError>,
    query: Option<&str>,
) -> HttpResponse {
    match result {
        Ok(records) => {
            let view = build_view(&records, query.unwrap_or(""), &state.view_options);
            HttpResponse::Ok().json(view)
        }
        Err(err) => {
            log::error!("Error in /api/crypto: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: err.user_message().to_string(),
            })
        }
    }
}
