pub mod entity;
pub mod file;
pub mod mapper;
pub mod memory;

use std::collections::BTreeMap;

use crate::contract::model::{Contact, ContactId};
use crate::domain::search::{filter_contacts, sort_contacts};

/// The collection shape every store keeps behind its lock.
pub(crate) type ContactMap = BTreeMap<ContactId, Contact>;

/// Owned, ordered and filtered copy of the collection.
pub(crate) fn snapshot(contacts: &ContactMap, filter: Option<&str>) -> Vec<Contact> {
    let mut all: Vec<Contact> = contacts.values().cloned().collect();
    sort_contacts(&mut all);
    filter_contacts(all, filter)
}
