use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::ContactsApi,
    error::ContactsError,
    model::{Contact, ContactId, RawContactFields},
};
use crate::domain::service::Service;

/// Local implementation of the ContactsApi trait that delegates to the domain service
pub struct ContactsLocalClient {
    service: Arc<Service>,
}

impl ContactsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ContactsApi for ContactsLocalClient {
    async fn list_contacts(&self, query: Option<String>) -> Result<Vec<Contact>, ContactsError> {
        self.service.list_contacts(query).await.map_err(Into::into)
    }

    async fn get_contact(&self, id: &ContactId) -> Result<Contact, ContactsError> {
        self.service.get_contact(id).await.map_err(Into::into)
    }

    async fn create_contact(&self, fields: RawContactFields) -> Result<Contact, ContactsError> {
        self.service.create_contact(fields).await.map_err(Into::into)
    }

    async fn update_contact(
        &self,
        id: &ContactId,
        fields: RawContactFields,
    ) -> Result<Contact, ContactsError> {
        self.service
            .update_contact(id, fields)
            .await
            .map_err(Into::into)
    }

    async fn set_favorite(
        &self,
        id: &ContactId,
        favorite: bool,
    ) -> Result<Contact, ContactsError> {
        self.service
            .set_favorite(id, favorite)
            .await
            .map_err(Into::into)
    }

    async fn delete_contact(&self, id: &ContactId) -> Result<(), ContactsError> {
        self.service.delete_contact(id).await.map_err(Into::into)
    }
}
