use crate::{auth, ctx::BaseParams, db, errors::Error, Result};

use super::{store, LoginUser, RegisterUser, SessionResponse, User};

pub async fn register(args: RegisterUser, BaseParams { db, .. }: BaseParams) -> Result<SessionResponse> {
    args.validate()?;

    let password = auth::hash_password(&args.password)?;
    let user = store::create(&db, args.normalized_email(), password)
        .await
        .map_err(|e| {
            if e.is_constraint_violation() {
                Error::Validation("Email Already In Use".into())
            } else {
                Error::from(e)
            }
        })?;

    let token = auth::issue_token(&user.id)?;
    store::insert_token(&db, user.id.clone(), token.clone()).await?;

    Ok(SessionResponse { user, token })
}

pub async fn login(args: LoginUser, BaseParams { db, .. }: BaseParams) -> Result<SessionResponse> {
    // One opaque failure for unknown email and bad password alike.
    let user = store::find_by_email(&db, args.normalized_email())
        .await
        .map_err(|e| match e {
            db::Error::NotFound(_) => Error::Validation("Unable To Login".into()),
            e => Error::from(e),
        })?;

    if !auth::verify_password(&user.password, &args.password) {
        return Err(Error::Validation("Unable To Login".into()));
    }

    let token = auth::issue_token(&user.id)?;
    store::insert_token(&db, user.id.clone(), token.clone()).await?;

    Ok(SessionResponse { user, token })
}

pub async fn logout(BaseParams { db, ctx }: BaseParams) -> Result<()> {
    ctx.require_user()?;
    let token = ctx.require_token()?;

    store::delete_token(&db, token.to_string()).await?;
    Ok(())
}

pub async fn me(BaseParams { ctx, .. }: BaseParams) -> Result<User> {
    Ok(ctx.require_user()?.clone())
}
