use utoipa::openapi::OpenApi;

/// Sink for the OpenAPI fragments modules contribute during the REST phase.
pub trait OpenApiRegistry: Send + Sync {
    /// Merge a module's paths and components into the served document.
    fn register_openapi(&self, doc: OpenApi);
}
