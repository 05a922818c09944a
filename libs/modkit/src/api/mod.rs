//! REST building blocks shared by modules.

pub mod context;
pub mod openapi;
pub mod problem;
pub mod response;

pub use openapi::OpenApiRegistry;
