use lazy_static::lazy_static;
use rusqlite_migration::{Migrations, M};

lazy_static! {
    pub static ref MIGRATIONS: Migrations<'static> = Migrations::new(vec![
        M::up(
            r#"
            CREATE TABLE users (
                id TEXT PRIMARY KEY CHECK(length(id) = 24) NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,

                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE tokens (
                token TEXT PRIMARY KEY NOT NULL,
                user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,

                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#
        ),
        M::up(
            r#"
            CREATE TABLE notes (
                id TEXT PRIMARY KEY CHECK(length(id) = 24) NOT NULL,

                text TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,

                creator_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX notes_creator_id ON notes (creator_id);
        "#
        ),
    ]);
}
