use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{Contact, ContactId, ContactPatch, NewContact, RawContactFields};
use crate::domain::error::DomainError;
use crate::domain::repo::ContactsRepository;
use crate::domain::search::effective_query;
use crate::domain::validation::{validate_contact_patch, validate_new_contact, validate_query};

/// Domain service with the business rules for contact management.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ContactsRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Longest accepted search query, in characters. Longer ones are rejected.
    pub max_query_chars: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_query_chars: 256,
        }
    }
}

fn storage_error(e: anyhow::Error) -> DomainError {
    DomainError::storage(format!("{e:#}"))
}

impl Service {
    pub fn new(repo: Arc<dyn ContactsRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(name = "contacts.service.list_contacts", skip(self))]
    pub async fn list_contacts(&self, query: Option<String>) -> Result<Vec<Contact>, DomainError> {
        let query = effective_query(query.as_deref());
        if let Some(q) = query {
            validate_query(q, self.config.max_query_chars).map_err(|errors| {
                info!(fields = %errors, "Rejected search query");
                DomainError::validation(errors)
            })?;
        }

        let contacts = self
            .repo
            .list(query)
            .await
            .map_err(storage_error)?;
        debug!("Listed {} contacts", contacts.len());
        Ok(contacts)
    }

    #[instrument(name = "contacts.service.get_contact", skip(self), fields(contact_id = %id))]
    pub async fn get_contact(&self, id: &ContactId) -> Result<Contact, DomainError> {
        debug!("Getting contact by id");
        self.repo
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| DomainError::contact_not_found(id.clone()))
    }

    /// Validate raw form fields, then create.
    #[instrument(name = "contacts.service.create_contact", skip(self, raw))]
    pub async fn create_contact(&self, raw: RawContactFields) -> Result<Contact, DomainError> {
        let new = validate_new_contact(&raw).map_err(|errors| {
            info!(fields = %errors, "Rejected contact submission");
            DomainError::validation(errors)
        })?;
        self.create_validated(new).await
    }

    #[instrument(
        name = "contacts.service.create_validated",
        skip(self, new),
        fields(first = %new.first, last = %new.last)
    )]
    pub async fn create_validated(&self, new: NewContact) -> Result<Contact, DomainError> {
        let contact = Contact::from_new(ContactId::generate(), Utc::now(), new);

        self.repo
            .insert(contact.clone())
            .await
            .map_err(storage_error)?;

        info!("Created contact with id={}", contact.id);
        Ok(contact)
    }

    /// Validate raw edit fields, then merge them into the stored contact.
    #[instrument(name = "contacts.service.update_contact", skip(self, raw), fields(contact_id = %id))]
    pub async fn update_contact(
        &self,
        id: &ContactId,
        raw: RawContactFields,
    ) -> Result<Contact, DomainError> {
        let patch = validate_contact_patch(&raw).map_err(|errors| {
            info!(fields = %errors, "Rejected contact edit");
            DomainError::validation(errors)
        })?;
        self.update_validated(id, patch).await
    }

    #[instrument(name = "contacts.service.update_validated", skip(self, patch), fields(contact_id = %id))]
    pub async fn update_validated(
        &self,
        id: &ContactId,
        patch: ContactPatch,
    ) -> Result<Contact, DomainError> {
        if patch.is_empty() {
            debug!("Empty patch; returning current record");
            return self.get_contact(id).await;
        }

        let updated = self
            .repo
            .update(id, patch)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| DomainError::contact_not_found(id.clone()))?;

        info!("Updated contact");
        Ok(updated)
    }

    #[instrument(name = "contacts.service.set_favorite", skip(self), fields(contact_id = %id))]
    pub async fn set_favorite(&self, id: &ContactId, favorite: bool) -> Result<Contact, DomainError> {
        self.update_validated(id, ContactPatch::favorite(favorite))
            .await
    }

    #[instrument(name = "contacts.service.delete_contact", skip(self), fields(contact_id = %id))]
    pub async fn delete_contact(&self, id: &ContactId) -> Result<(), DomainError> {
        let deleted = self.repo.delete(id).await.map_err(storage_error)?;
        if !deleted {
            warn!("Delete requested for unknown contact");
            return Err(DomainError::contact_not_found(id.clone()));
        }

        info!("Deleted contact");
        Ok(())
    }

    /// Number of stored contacts.
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repo.count().await.map_err(storage_error)
    }
}
