use crate::api::rest::handlers;
use crate::api::rest::openapi::ContactsApiDoc;
use crate::domain::service::Service;
use axum::routing::{get, post};
use axum::{Extension, Router};
use modkit::api::OpenApiRegistry;
use std::sync::Arc;
use utoipa::OpenApi;

/// Mount the contacts routes on `router` and publish their OpenAPI fragment.
pub fn register_routes(
    router: Router,
    openapi: &dyn OpenApiRegistry,
    service: Arc<Service>,
) -> anyhow::Result<Router> {
    let contacts = Router::new()
        // GET /contacts?q= - sidebar list + search
        // POST /contacts - create form action
        .route(
            "/contacts",
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        // GET detail, POST favorite toggle, PUT edit (REST alias), DELETE
        .route(
            "/contacts/{contact_id}",
            get(handlers::get_contact)
                .post(handlers::toggle_favorite)
                .put(handlers::update_contact)
                .delete(handlers::delete_contact),
        )
        .route("/contacts/{contact_id}/edit", post(handlers::edit_contact))
        .route(
            "/contacts/{contact_id}/delete",
            post(handlers::delete_contact_action),
        )
        .layer(Extension(service));

    openapi.register_openapi(ContactsApiDoc::openapi());

    Ok(router.merge(contacts))
}
