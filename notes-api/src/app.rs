use axum::{
    middleware::{self},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use rand::Rng;
use serde_json::json;

use crate::{
    config,
    db::DB,
    errors::{self, on_error},
    state::AppState,
};

pub struct AppParams<R>
where
    R: FnOnce(AppState) -> Router,
{
    pub db: DB,
    pub router: R,
}

pub async fn create<R>(AppParams { db, router }: AppParams<R>) -> errors::Result<Router>
where
    R: FnOnce(AppState) -> Router,
{
    let state = AppState { conn: db };

    let app = Router::new()
        .route("/__version__", get(version))
        .route("/__heartbeat__", get(heartbeat))
        .route("/__lbheartbeat__", get(lbheartbeat))
        .merge(router(state))
        .layer(middleware::from_fn(on_error));

    Ok(app)
}

async fn version() -> impl IntoResponse {
    let config = &config();
    Json(json!({
        "source" : config.source,
        "version": config.version,
        "commit" : config.git_commit,
        "build"  : config.pipeline_id
    }))
}

async fn heartbeat() -> impl IntoResponse {
    let mut rng = rand::thread_rng();
    let random: u32 = rng.gen_range(0..=10000);

    Json(json!({
        "status" : "ok",
        "random": random,
    }))
}

async fn lbheartbeat() -> impl IntoResponse {
    ""
}
