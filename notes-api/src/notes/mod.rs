mod guard;
mod handlers;
mod model;
mod routes;
mod store;

pub use model::{NewNote, Note, NoteUpdate};
pub use routes::router;
