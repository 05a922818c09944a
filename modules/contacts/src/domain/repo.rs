use async_trait::async_trait;

use crate::contract::model::{Contact, ContactId, ContactPatch};

/// Port for the domain layer: persistence operations the domain needs.
///
/// Implementations own the collection exclusively and hand out owned
/// snapshots. Each call is atomic with respect to every other call.
#[async_trait]
pub trait ContactsRepository: Send + Sync {
    /// Contacts in stable order (`created_at`, then `id`), filtered by a
    /// case-insensitive first/last name substring when `filter` is non-empty.
    async fn list(&self, filter: Option<&str>) -> anyhow::Result<Vec<Contact>>;
    /// Load a contact by id.
    async fn find_by_id(&self, id: &ContactId) -> anyhow::Result<Option<Contact>>;
    /// Insert a fully-formed record; the service assigns id and timestamps.
    async fn insert(&self, contact: Contact) -> anyhow::Result<()>;
    /// Merge `patch` into the stored record. `None` if the id is absent.
    async fn update(&self, id: &ContactId, patch: ContactPatch)
        -> anyhow::Result<Option<Contact>>;
    /// Delete by id. Returns true if a record was removed.
    async fn delete(&self, id: &ContactId) -> anyhow::Result<bool>;
    /// Number of stored contacts.
    async fn count(&self) -> anyhow::Result<usize>;
}
