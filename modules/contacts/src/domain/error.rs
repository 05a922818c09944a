use thiserror::Error;

use crate::contract::model::{ContactId, FieldErrors};

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Contact not found: {id}")]
    ContactNotFound { id: ContactId },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn contact_not_found(id: ContactId) -> Self {
        Self::ContactNotFound { id }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
