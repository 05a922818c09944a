pub mod error;
pub mod repo;
pub mod search;
pub mod service;
pub mod validation;
