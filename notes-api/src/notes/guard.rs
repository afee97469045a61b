use crate::errors::Error;
use crate::users::User;

use super::Note;

/// A note is visible and mutable only to its creator.
///
/// Denial maps to `Error::OwnershipDenied`, which renders exactly like a
/// malformed id, so callers probing other users' note ids learn nothing.
pub fn authorize(principal: &User, note: &Note) -> Result<(), Error> {
    if note.is_created_by(principal) {
        return Ok(());
    }
    Err(Error::OwnershipDenied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::RecordId;
    use chrono::Utc;

    fn user(id: RecordId) -> User {
        User {
            id,
            email: "a@b".into(),
            password: String::new(),
            created_at: Utc::now(),
        }
    }

    fn note(creator_id: RecordId) -> Note {
        Note {
            id: RecordId::generate(),
            text: "note1".into(),
            completed: false,
            creator_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn creator_is_allowed() {
        let id = RecordId::generate();
        assert!(authorize(&user(id.clone()), &note(id)).is_ok());
    }

    #[test]
    fn anyone_else_is_denied() {
        let result = authorize(&user(RecordId::generate()), &note(RecordId::generate()));
        assert!(matches!(result, Err(Error::OwnershipDenied)));
    }
}
