use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::Contact;

/// REST DTO for contact representation with serde/utoipa
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactDto {
    pub id: String,
    pub first: String,
    pub last: String,
    pub twitter: String,
    pub avatar: String,
    pub notes: String,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// Sidebar listing: the matching contacts plus the query echoed back
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactListDto {
    pub contacts: Vec<ContactDto>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListContactsQuery {
    /// Case-insensitive substring of the first or last name
    pub q: Option<String>,
}

/// Create/edit form fields. On create `avatar`, `first`, `last` and `twitter`
/// are required; on edit every field is optional and `""` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ContactForm {
    /// Absolute URL
    pub avatar: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
    pub twitter: Option<String>,
    pub notes: Option<String>,
    /// Edit only: "true", "false" or "on"
    pub favorite: Option<String>,
}

/// Favorite toggle form; only the literal "true" marks a favorite
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct FavoriteForm {
    pub favorite: Option<String>,
}

impl FavoriteForm {
    pub fn is_favorite(&self) -> bool {
        self.favorite.as_deref() == Some("true")
    }
}

impl From<Contact> for ContactDto {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id.to_string(),
            first: c.first,
            last: c.last,
            twitter: c.twitter,
            avatar: c.avatar,
            notes: c.notes,
            favorite: c.favorite,
            created_at: c.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::ContactId;
    use chrono::TimeZone;

    #[test]
    fn contact_serializes_camel_case() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let dto = ContactDto::from(Contact {
            id: ContactId::from("c1"),
            first: "Jane".into(),
            last: "Doe".into(),
            twitter: "@jd".into(),
            avatar: "https://example.com/a.png".into(),
            notes: String::new(),
            favorite: true,
            created_at: at,
        });

        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(v["id"], "c1");
        assert_eq!(v["favorite"], true);
        assert_eq!(v["createdAt"], "2024-01-02T03:04:05Z");
        assert!(v.get("created_at").is_none());
    }

    #[test]
    fn favorite_form_only_accepts_literal_true() {
        let form = |v: Option<&str>| FavoriteForm {
            favorite: v.map(str::to_string),
        };
        assert!(form(Some("true")).is_favorite());
        assert!(!form(Some("false")).is_favorite());
        assert!(!form(Some("on")).is_favorite());
        assert!(!form(None).is_favorite());
    }
}
