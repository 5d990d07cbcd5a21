//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its JSON wire shape.
//! - Provide the only constructors used by the add/edit flows.
//!
//! # Invariants
//! - `id` is generated once and never reused for another note.
//! - `created_at` never changes after creation.
//! - A revision always produces `updated_at` strictly greater than the
//!   previous `updated_at`.
//! - Timestamps carry millisecond precision so the wire form round-trips.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque note identifier.
///
/// Stored as text so ids written by older clients (any non-empty string)
/// still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Validation failures for a decoded note record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// `id` is empty or whitespace.
    BlankId,
    /// `updatedAt` precedes `createdAt`.
    UpdatedBeforeCreated { id: NoteId },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "note id must not be blank"),
            Self::UpdatedBeforeCreated { id } => {
                write!(f, "note {id}: updatedAt must be >= createdAt")
            }
        }
    }
}

impl Error for NoteValidationError {}

/// A single user-authored text/markdown note.
///
/// Fields are read-only outside the crate: notes come into existence only
/// through `NoteStore::add` (or by decoding persisted state) and change only
/// through `NoteStore::edit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    id: NoteId,
    content: String,
    #[serde(with = "iso_millis")]
    created_at: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a fresh note stamped with `now` for both timestamps.
    pub(crate) fn create(content: String, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            id: NoteId::generate(),
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a new record with replaced content and a bumped `updated_at`.
    ///
    /// If the clock has not advanced past the previous `updated_at`, the new
    /// value is the previous one plus one millisecond.
    pub(crate) fn revised(&self, content: String, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        let floor = self.updated_at + Duration::milliseconds(1);
        Self {
            id: self.id.clone(),
            content,
            created_at: self.created_at,
            updated_at: now.max(floor),
        }
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the note was edited after creation.
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }

    /// Checks record-level invariants for decoded notes.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(NoteValidationError::BlankId);
        }
        if self.updated_at < self.created_at {
            return Err(NoteValidationError::UpdatedBeforeCreated {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// Current UTC time at millisecond precision.
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// ISO-8601 timestamps in the `YYYY-MM-DDTHH:MM:SS.sssZ` form.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|value| value.with_timezone(&Utc))
            .map_err(|err| serde::de::Error::custom(format!("invalid timestamp `{raw}`: {err}")))
    }
}

/// Formats a timestamp the same way the wire format does.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
