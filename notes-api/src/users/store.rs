use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::{self, DB};
use crate::ident::RecordId;

use super::{model::UserId, User};

impl<'a> TryFrom<&Row<'a>> for User {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            password: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

pub async fn create(db: &DB, email: String, password: String) -> db::Result<User> {
    let id = RecordId::generate();
    let created_at = Utc::now();

    db.call(move |conn| {
        conn.query_row(
            r#"INSERT INTO users (id, email, password, created_at) VALUES (?, ?, ?, ?)
            RETURNING id, email, password, created_at"#,
            params![id, email, password, created_at],
            |row| User::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
}

pub async fn find_by_email(db: &DB, email: String) -> db::Result<User> {
    db.call(move |conn| {
        conn.query_row(
            "SELECT id, email, password, created_at FROM users WHERE email = ?",
            params![email],
            |row| User::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("User Not Found"))
}

/// Resolves a principal: the token row must exist and belong to `user_id`.
pub async fn find_by_live_token(db: &DB, user_id: UserId, token: String) -> db::Result<User> {
    db.call(move |conn| {
        conn.query_row(
            r#"SELECT u.id, u.email, u.password, u.created_at FROM users u
            JOIN tokens t ON t.user_id = u.id
            WHERE u.id = ? AND t.token = ?"#,
            params![user_id, token],
            |row| User::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("User Not Found"))
}

pub async fn insert_token(db: &DB, user_id: UserId, token: String) -> db::Result<()> {
    let created_at = Utc::now();

    db.call(move |conn| {
        conn.execute(
            "INSERT INTO tokens (token, user_id, created_at) VALUES (?, ?, ?)",
            params![token, user_id, created_at],
        )?;
        Ok(())
    })
    .await
    .map_err(db::Error::from)
}

/// Revokes one token. Removing an already-absent token is a no-op.
pub async fn delete_token(db: &DB, token: String) -> db::Result<()> {
    db.call(move |conn| {
        conn.execute("DELETE FROM tokens WHERE token = ?", params![token])?;
        Ok(())
    })
    .await
    .map_err(db::Error::from)
}
