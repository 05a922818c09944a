use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Opaque, immutable contact identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(String);

impl ContactId {
    /// Fresh identifier; UUID v4 text, so ids are never reused.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContactId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ContactId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Pure contact model for inter-module communication (no serde/utoipa)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub first: String,
    pub last: String,
    pub twitter: String,
    pub avatar: String,
    pub notes: String,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated data for creating a contact. Missing optional text becomes `""`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewContact {
    pub first: String,
    pub last: String,
    pub twitter: String,
    pub avatar: String,
    pub notes: Option<String>,
    pub favorite: Option<bool>,
}

/// Merge update: `None` leaves the stored value untouched, `Some("")` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactPatch {
    pub first: Option<String>,
    pub last: Option<String>,
    pub twitter: Option<String>,
    pub avatar: Option<String>,
    pub notes: Option<String>,
    pub favorite: Option<bool>,
}

impl ContactPatch {
    pub fn favorite(favorite: bool) -> Self {
        Self {
            favorite: Some(favorite),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Contact {
    /// Build a full record from validated input, applying the defaults.
    pub fn from_new(id: ContactId, created_at: DateTime<Utc>, new: NewContact) -> Self {
        Self {
            id,
            first: new.first,
            last: new.last,
            twitter: new.twitter,
            avatar: new.avatar,
            notes: new.notes.unwrap_or_default(),
            favorite: new.favorite.unwrap_or(false),
            created_at,
        }
    }

    /// Overwrite only the fields present in `patch`. `id` and `created_at` never change.
    pub fn apply(&mut self, patch: ContactPatch) {
        if let Some(first) = patch.first {
            self.first = first;
        }
        if let Some(last) = patch.last {
            self.last = last;
        }
        if let Some(twitter) = patch.twitter {
            self.twitter = twitter;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(favorite) = patch.favorite {
            self.favorite = favorite;
        }
    }
}

/// Untyped field data as submitted by a form: field name → raw value.
pub type RawContactFields = BTreeMap<String, String>;

/// Validation messages per field, fields in name order, messages in check order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}
