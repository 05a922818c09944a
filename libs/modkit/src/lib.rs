//! # ModKit - declarative module kit
//!
//! Modules implement a few small traits and the runtime drives them through
//! ordered phases:
//!
//! - `Module::init` wires dependencies from the module's config section
//! - `RestfulModule::register_rest` adds routes and an OpenAPI fragment
//! - `RestHostModule` owns the router (health, `/openapi.json`, middleware)
//! - `StatefulModule::start`/`stop` run background work such as the HTTP server
//!
//! The `api` module carries the pieces every REST layer uses the same way:
//! RFC 9457 `Problem` bodies, the `RequestCtx` extractor and response helpers.

pub use anyhow::Result;

pub mod api;
pub mod context;
pub mod contracts;
pub mod registry;
pub mod runtime;

pub use api::context::{RequestCtx, XRequestId};
pub use api::problem::{Problem, ProblemResponse, ValidationError};
pub use api::OpenApiRegistry;
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};
pub use contracts::{Module, RestHostModule, RestfulModule, StatefulModule};
pub use registry::{ModuleRegistry, RegistryError};
