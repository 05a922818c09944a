//! Name search over contact snapshots.

use std::cmp::Ordering;

use crate::contract::model::Contact;

/// Canonical list order: oldest first, ties broken by id.
pub fn compare_contacts(a: &Contact, b: &Contact) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_contacts(contacts: &mut [Contact]) {
    contacts.sort_by(compare_contacts);
}

/// The effective query: `None` for an absent or empty query. Anything else,
/// whitespace included, is matched exactly as given.
pub fn effective_query(query: Option<&str>) -> Option<&str> {
    query.filter(|q| !q.is_empty())
}

/// True if `first` or `last` contains `needle_lower` (already lowercased).
fn name_matches(contact: &Contact, needle_lower: &str) -> bool {
    contact.first.to_lowercase().contains(needle_lower)
        || contact.last.to_lowercase().contains(needle_lower)
}

/// Keep contacts whose first or last name contains the query, ignoring case.
/// An absent or empty query returns the snapshot unchanged, order included.
pub fn filter_contacts(snapshot: Vec<Contact>, query: Option<&str>) -> Vec<Contact> {
    let Some(query) = effective_query(query) else {
        return snapshot;
    };
    let needle = query.to_lowercase();
    snapshot
        .into_iter()
        .filter(|c| name_matches(c, &needle))
        .collect()
}
