use crate::contract::model::{Contact, ContactId};
use crate::infra::storage::entity::ContactRecord;

impl From<ContactRecord> for Contact {
    fn from(r: ContactRecord) -> Self {
        Self {
            id: ContactId::from(r.id),
            first: r.first,
            last: r.last,
            twitter: r.twitter,
            avatar: r.avatar,
            notes: r.notes,
            favorite: r.favorite,
            created_at: r.created_at,
        }
    }
}

impl From<&Contact> for ContactRecord {
    fn from(c: &Contact) -> Self {
        Self {
            id: c.id.to_string(),
            first: c.first.clone(),
            last: c.last.clone(),
            twitter: c.twitter.clone(),
            avatar: c.avatar.clone(),
            notes: c.notes.clone(),
            favorite: c.favorite,
            created_at: c.created_at,
        }
    }
}
