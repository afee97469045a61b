use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{
    auth,
    db::{self, DB},
    errors::Error,
    ident::RecordId,
    state::AppState,
    users::{self, User},
};

/// Per-request context: the principal resolved from the bearer token, plus
/// the token as presented (logout revokes exactly that token).
///
/// Resolution never rejects on its own; protected handlers call
/// `require_user` as their first step so a missing or dead token turns into
/// a 401 before any route-specific logic runs.
#[derive(Clone, Debug)]
pub struct Ctx {
    user: Option<User>,
    token: Option<String>,
}

impl Ctx {
    pub fn new(user: Option<User>, token: Option<String>) -> Self {
        Self { user, token }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> Result<&User, Error> {
        self.user.as_ref().ok_or(Error::Unauthorized)
    }

    pub fn require_token(&self) -> Result<&str, Error> {
        self.token.as_deref().ok_or(Error::Unauthorized)
    }
}

impl FromRequestParts<AppState> for Ctx {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Self::new(None, None));
        };

        let Ok(claims) = auth::verify_token(&token) else {
            return Ok(Self::new(None, Some(token)));
        };
        let Ok(user_id) = RecordId::parse(&claims.sub) else {
            return Ok(Self::new(None, Some(token)));
        };

        // Signature alone is not enough: the token row must still be live.
        match users::store::find_by_live_token(&state.conn, user_id, token.clone()).await {
            Ok(user) => Ok(Self::new(Some(user), Some(token))),
            Err(db::Error::NotFound(_)) => Ok(Self::new(None, Some(token))),
            Err(error) => Err(Error::from(error)),
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[derive(Clone)]
pub struct BaseParams {
    pub ctx: Ctx,
    pub db: DB,
}

impl BaseParams {
    pub fn new(db: DB, ctx: Ctx) -> Self {
        Self { ctx, db }
    }
}

impl FromRequestParts<AppState> for BaseParams {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let ctx = Ctx::from_request_parts(parts, state).await?;
        Ok(Self::new(state.conn.clone(), ctx))
    }
}
