//! Process-local repository. Nothing survives a restart.

use parking_lot::RwLock;

use crate::contract::model::{Contact, ContactId, ContactPatch};
use crate::domain::repo::ContactsRepository;
use crate::infra::storage::{snapshot, ContactMap};

#[derive(Default)]
pub struct InMemoryContactsRepository {
    contacts: RwLock<ContactMap>,
}

impl InMemoryContactsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ContactsRepository for InMemoryContactsRepository {
    async fn list(&self, filter: Option<&str>) -> anyhow::Result<Vec<Contact>> {
        Ok(snapshot(&self.contacts.read(), filter))
    }

    async fn find_by_id(&self, id: &ContactId) -> anyhow::Result<Option<Contact>> {
        Ok(self.contacts.read().get(id).cloned())
    }

    async fn insert(&self, contact: Contact) -> anyhow::Result<()> {
        let mut contacts = self.contacts.write();
        if contacts.contains_key(&contact.id) {
            anyhow::bail!("contact {} already exists", contact.id);
        }
        contacts.insert(contact.id.clone(), contact);
        Ok(())
    }

    async fn update(
        &self,
        id: &ContactId,
        patch: ContactPatch,
    ) -> anyhow::Result<Option<Contact>> {
        let mut contacts = self.contacts.write();
        Ok(contacts.get_mut(id).map(|current| {
            current.apply(patch);
            current.clone()
        }))
    }

    async fn delete(&self, id: &ContactId) -> anyhow::Result<bool> {
        Ok(self.contacts.write().remove(id).is_some())
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.contacts.read().len())
    }
}
