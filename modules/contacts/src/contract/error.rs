use thiserror::Error;

use crate::contract::model::{ContactId, FieldErrors};

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactsError {
    #[error("Contact not found: {id}")]
    NotFound { id: ContactId },

    #[error("Validation error: {field_errors}")]
    Validation { field_errors: FieldErrors },

    #[error("Internal error")]
    Internal,
}

impl ContactsError {
    pub fn not_found(id: ContactId) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(field_errors: FieldErrors) -> Self {
        Self::Validation { field_errors }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for ContactsError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            ContactNotFound { id } => Self::not_found(id),
            Validation(errors) => Self::validation(errors),
            Storage { .. } => Self::internal(),
        }
    }
}
