//! Record identifiers.
//!
//! Every persisted record is keyed by a fixed-length lowercase hex string.
//! The format predicate lives here, decoupled from the storage layer, so a
//! different store (or id scheme) only has to swap this module.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

/// Length of a canonical record id: 12 random bytes, hex-encoded.
pub const RECORD_ID_LEN: usize = 24;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Returns true iff `value` is a well-formed record id.
///
/// Well-formed and present are distinct outcomes: a string failing this
/// predicate must never reach the store.
pub fn is_well_formed(value: &str) -> bool {
    value.len() == RECORD_ID_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid record id")]
pub struct ParseRecordIdError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// New random id. Uniqueness is probabilistic, enforced by the store's
    /// primary key.
    pub fn generate() -> Self {
        let bytes: [u8; RECORD_ID_LEN / 2] = rand::random();
        let mut out = String::with_capacity(RECORD_ID_LEN);
        for byte in bytes {
            out.push(HEX[(byte >> 4) as usize] as char);
            out.push(HEX[(byte & 0x0f) as usize] as char);
        }
        Self(out)
    }

    /// Parses a client-supplied id, normalizing hex case.
    pub fn parse(value: &str) -> Result<Self, ParseRecordIdError> {
        if !is_well_formed(value) {
            return Err(ParseRecordIdError);
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = ParseRecordIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for RecordId {
    type Error = ParseRecordIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl ToSql for RecordId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for RecordId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        String::column_result(value).map(RecordId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_well_formed() {
        for _ in 0..32 {
            let id = RecordId::generate();
            assert!(is_well_formed(id.as_str()));
        }
    }

    #[test]
    fn rejects_wrong_length_and_non_hex() {
        assert!(RecordId::parse("1234").is_err());
        assert!(RecordId::parse("").is_err());
        // 23 and 25 chars
        assert!(RecordId::parse(&"a".repeat(23)).is_err());
        assert!(RecordId::parse(&"a".repeat(25)).is_err());
        // right length, wrong alphabet
        assert!(RecordId::parse("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
    }

    #[test]
    fn parse_normalizes_case() {
        let id = RecordId::parse("ABCDEF0123456789abcdef01").unwrap();
        assert_eq!(id.as_str(), "abcdef0123456789abcdef01");
    }

    #[test]
    fn serde_round_trip_validates() {
        let id = RecordId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);

        assert!(serde_json::from_str::<RecordId>("\"nope\"").is_err());
    }
}
