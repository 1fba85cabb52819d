use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Canonical task identifier: 32 lowercase hexadecimal characters
/// (a UUIDv4 in simple form).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaskIdParseError {
    #[error("task id cannot be empty")]
    Empty,
    #[error("expected {expected} hex characters, got {0}", expected = TaskId::HEX_LEN)]
    InvalidLength(usize),
    #[error("task id may only contain hexadecimal characters")]
    InvalidCharacter,
}

impl TaskId {
    pub const HEX_LEN: usize = 32;

    /// Generate a fresh random task ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    fn validate_and_normalize(value: &str) -> Result<String, TaskIdParseError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TaskIdParseError::Empty);
        }
        if trimmed.len() != Self::HEX_LEN {
            return Err(TaskIdParseError::InvalidLength(trimmed.len()));
        }
        if !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TaskIdParseError::InvalidCharacter);
        }

        Ok(trimmed.to_ascii_lowercase())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = TaskIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Self::validate_and_normalize(s)?))
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Uuid> for TaskId {
    fn from(value: Uuid) -> Self {
        Self(value.simple().to_string())
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.0
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl ToSql for TaskId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for TaskId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|e: TaskIdParseError| FromSqlError::Other(Box::new(e)))
    }
}
