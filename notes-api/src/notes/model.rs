use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Error;
use crate::ident::RecordId;
use crate::users::User;

pub const TEXT_MIN_CHARS: usize = 1;
pub const TEXT_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    pub text: String,
    pub completed: bool,
    pub creator_id: RecordId,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn is_created_by(&self, user: &User) -> bool {
        self.creator_id == user.id
    }
}

/// Validated creation payload. Text arrives here already normalized
/// (trimmed, lowercased), so the store writes it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub text: String,
    pub completed: bool,
}

impl NewNote {
    /// Validates a raw POST body. Unknown keys (including any client-supplied
    /// `creatorId`) are ignored; the creator always comes from the principal.
    pub fn parse(payload: &Value) -> Result<Self, Error> {
        let Some(object) = payload.as_object() else {
            return Err(Error::Validation("Invalid Request Body".into()));
        };

        let text = match object.get("text") {
            None | Some(Value::Null) => return Err(Error::Validation("Text Is Required".into())),
            Some(Value::String(text)) => text,
            Some(_) => return Err(Error::Validation("Text Must Be A String".into())),
        };

        let text = text.trim().to_lowercase();
        let chars = text.chars().count();
        if chars < TEXT_MIN_CHARS || chars > TEXT_MAX_CHARS {
            return Err(Error::Validation("Text Must Be Between 1 and 50 Characters".into()));
        }

        let completed = match object.get("completed") {
            None => false,
            Some(Value::Bool(completed)) => *completed,
            Some(_) => return Err(Error::Validation("Completed Must be Boolean".into())),
        };

        Ok(Self { text, completed })
    }
}

/// Validated update payload. `completed` is the only mutable field; an empty
/// object is a valid no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteUpdate {
    pub completed: Option<bool>,
}

impl NoteUpdate {
    pub fn parse(payload: &Value) -> Result<Self, Error> {
        let Some(object) = payload.as_object() else {
            return Err(Error::Validation("Invalid Request Body".into()));
        };

        if object.keys().any(|key| key != "completed") {
            return Err(Error::Validation("Invalid Update Fields".into()));
        }

        let completed = match object.get("completed") {
            None => None,
            Some(Value::Bool(completed)) => Some(*completed),
            Some(_) => return Err(Error::Validation("Completed Must be Boolean".into())),
        };

        Ok(Self { completed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(error: Error) -> String {
        crate::errors::ErrorResponse::from(&error).error
    }

    #[test]
    fn new_note_normalizes_text() {
        let parsed = NewNote::parse(&json!({ "text": "  BUY Milk  " })).unwrap();
        assert_eq!(parsed.text, "buy milk");
        assert!(!parsed.completed);
    }

    #[test]
    fn new_note_accepts_completed_flag() {
        let parsed = NewNote::parse(&json!({ "text": "x", "completed": true })).unwrap();
        assert!(parsed.completed);
    }

    #[test]
    fn new_note_requires_text() {
        let error = NewNote::parse(&json!({})).unwrap_err();
        assert_eq!(message(error), "Text Is Required");

        let error = NewNote::parse(&json!({ "text": null })).unwrap_err();
        assert_eq!(message(error), "Text Is Required");

        let error = NewNote::parse(&json!({ "text": 42 })).unwrap_err();
        assert_eq!(message(error), "Text Must Be A String");
    }

    #[test]
    fn new_note_enforces_length_after_trim() {
        let error = NewNote::parse(&json!({ "text": "   " })).unwrap_err();
        assert_eq!(message(error), "Text Must Be Between 1 and 50 Characters");

        let error = NewNote::parse(&json!({ "text": "a".repeat(51) })).unwrap_err();
        assert_eq!(message(error), "Text Must Be Between 1 and 50 Characters");

        // 50 chars exactly is fine, as is 1 char
        assert!(NewNote::parse(&json!({ "text": "a".repeat(50) })).is_ok());
        assert!(NewNote::parse(&json!({ "text": "a" })).is_ok());

        // length is measured after trimming
        let padded = format!("   {}   ", "a".repeat(50));
        assert!(NewNote::parse(&json!({ "text": padded })).is_ok());
    }

    #[test]
    fn new_note_ignores_unknown_keys() {
        let parsed = NewNote::parse(&json!({
            "text": "x",
            "creatorId": "aaaaaaaaaaaaaaaaaaaaaaaa",
            "anything": "else"
        }))
        .unwrap();
        assert_eq!(parsed.text, "x");
    }

    #[test]
    fn update_accepts_only_completed() {
        let parsed = NoteUpdate::parse(&json!({ "completed": true })).unwrap();
        assert_eq!(parsed.completed, Some(true));

        let parsed = NoteUpdate::parse(&json!({})).unwrap();
        assert_eq!(parsed.completed, None);

        let error = NoteUpdate::parse(&json!({ "text": "new text" })).unwrap_err();
        assert_eq!(message(error), "Invalid Update Fields");
    }

    #[test]
    fn update_rejects_non_boolean_completed() {
        for bad in [json!("true"), json!(1), json!(null), json!([true])] {
            let error = NoteUpdate::parse(&json!({ "completed": bad })).unwrap_err();
            assert_eq!(message(error), "Completed Must be Boolean");
        }
    }

    #[test]
    fn update_rejects_non_object_body() {
        let error = NoteUpdate::parse(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(message(error), "Invalid Request Body");
    }
}
