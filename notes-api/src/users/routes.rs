use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::{ctx::BaseParams, errors::Error, state::AppState, Result};

use super::{handlers, LoginUser, RegisterUser, SessionResponse, User};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", post(register))
        .route("/users/login", post(login))
        .route("/users/logout", post(logout))
        .route("/users/me", get(me))
        .with_state(state)
}

async fn register(
    base: BaseParams,
    payload: std::result::Result<Json<RegisterUser>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let Json(args) = payload.map_err(|_| Error::Validation("Invalid Request Body".into()))?;
    handlers::register(args, base).await.map(|r| (StatusCode::CREATED, Json(r)))
}

async fn login(
    base: BaseParams,
    payload: std::result::Result<Json<LoginUser>, JsonRejection>,
) -> Result<Json<SessionResponse>> {
    let Json(args) = payload.map_err(|_| Error::Validation("Invalid Request Body".into()))?;
    handlers::login(args, base).await.map(Json)
}

async fn logout(base: BaseParams) -> Result<StatusCode> {
    handlers::logout(base).await.map(|_| StatusCode::OK)
}

async fn me(base: BaseParams) -> Result<Json<User>> {
    handlers::me(base).await.map(Json)
}
