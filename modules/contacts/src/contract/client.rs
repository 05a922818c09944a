use async_trait::async_trait;

use crate::contract::{
    error::ContactsError,
    model::{Contact, ContactId, RawContactFields},
};

/// Public API trait for the contacts module that other modules can use
#[async_trait]
pub trait ContactsApi: Send + Sync {
    /// List contacts, optionally filtered by a first/last name substring
    async fn list_contacts(&self, query: Option<String>) -> Result<Vec<Contact>, ContactsError>;

    /// Get a contact by ID
    async fn get_contact(&self, id: &ContactId) -> Result<Contact, ContactsError>;

    /// Validate raw form fields and create a contact
    async fn create_contact(&self, fields: RawContactFields) -> Result<Contact, ContactsError>;

    /// Validate raw form fields and merge them into an existing contact
    async fn update_contact(
        &self,
        id: &ContactId,
        fields: RawContactFields,
    ) -> Result<Contact, ContactsError>;

    /// Set or clear the favorite flag
    async fn set_favorite(&self, id: &ContactId, favorite: bool)
        -> Result<Contact, ContactsError>;

    /// Delete a contact by ID
    async fn delete_contact(&self, id: &ContactId) -> Result<(), ContactsError>;
}
