use std::sync::Arc;

use axum::{
    extract::{Form, Query},
    response::{Json, Response},
    Extension,
};
use modkit::api::response::{created_at, no_content, see_other};
use modkit::{Problem, ProblemResponse, RequestCtx};
use tracing::info;

use crate::api::rest::dto::{ContactDto, ContactForm, ContactListDto, FavoriteForm, ListContactsQuery};
use crate::api::rest::error::map_domain_error;
use crate::api::rest::extract::ContactIdParam;
use crate::contract::model::RawContactFields;
use crate::domain::service::Service;

const CONTACTS_PATH: &str = "/contacts";

/// List contacts, optionally filtered by name
#[utoipa::path(
    get,
    path = "/contacts",
    tag = "contacts",
    params(ListContactsQuery),
    responses(
        (status = 200, description = "Matching contacts", body = ContactListDto),
        (status = 422, description = "Query too long", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_contacts(
    Extension(svc): Extension<Arc<Service>>,
    ctx: RequestCtx,
    Query(query): Query<ListContactsQuery>,
) -> Result<Json<ContactListDto>, ProblemResponse> {
    info!("Listing contacts with q: {:?}", query.q);

    let contacts = svc
        .list_contacts(query.q.clone())
        .await
        .map_err(|e| map_domain_error(&e, &ctx))?;

    Ok(Json(ContactListDto {
        contacts: contacts.into_iter().map(ContactDto::from).collect(),
        q: query.q,
    }))
}

/// Create a contact from form fields
#[utoipa::path(
    post,
    path = "/contacts",
    tag = "contacts",
    request_body(content = ContactForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Created contact", body = ContactDto),
        (status = 422, description = "Invalid fields", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_contact(
    Extension(svc): Extension<Arc<Service>>,
    ctx: RequestCtx,
    Form(fields): Form<RawContactFields>,
) -> Result<Response, ProblemResponse> {
    info!("Creating contact");

    let contact = svc
        .create_contact(fields)
        .await
        .map_err(|e| map_domain_error(&e, &ctx))?;

    let location = format!("{CONTACTS_PATH}/{}", contact.id);
    Ok(created_at(&location, ContactDto::from(contact)))
}

/// Get a contact by id
#[utoipa::path(
    get,
    path = "/contacts/{contact_id}",
    tag = "contacts",
    params(("contact_id" = String, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Contact found", body = ContactDto),
        (status = 404, description = "Not found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_contact(
    Extension(svc): Extension<Arc<Service>>,
    ctx: RequestCtx,
    ContactIdParam(id): ContactIdParam,
) -> Result<Json<ContactDto>, ProblemResponse> {
    info!("Getting contact with id: {}", id);

    svc.get_contact(&id)
        .await
        .map(|c| Json(ContactDto::from(c)))
        .map_err(|e| map_domain_error(&e, &ctx))
}

/// Set or clear the favorite flag
#[utoipa::path(
    post,
    path = "/contacts/{contact_id}",
    tag = "contacts",
    params(("contact_id" = String, Path, description = "Contact id")),
    request_body(content = FavoriteForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Updated contact", body = ContactDto),
        (status = 404, description = "Not found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn toggle_favorite(
    Extension(svc): Extension<Arc<Service>>,
    ctx: RequestCtx,
    ContactIdParam(id): ContactIdParam,
    Form(form): Form<FavoriteForm>,
) -> Result<Json<ContactDto>, ProblemResponse> {
    let favorite = form.is_favorite();
    info!("Setting favorite={} on contact {}", favorite, id);

    svc.set_favorite(&id, favorite)
        .await
        .map(|c| Json(ContactDto::from(c)))
        .map_err(|e| map_domain_error(&e, &ctx))
}

async fn apply_edit(
    svc: &Service,
    ctx: &RequestCtx,
    id: ContactIdParam,
    fields: RawContactFields,
) -> Result<Json<ContactDto>, ProblemResponse> {
    let ContactIdParam(id) = id;
    info!("Updating contact {}", id);

    svc.update_contact(&id, fields)
        .await
        .map(|c| Json(ContactDto::from(c)))
        .map_err(|e| map_domain_error(&e, ctx))
}

/// Edit form action: merge the submitted fields
#[utoipa::path(
    post,
    path = "/contacts/{contact_id}/edit",
    tag = "contacts",
    params(("contact_id" = String, Path, description = "Contact id")),
    request_body(content = ContactForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Updated contact", body = ContactDto),
        (status = 404, description = "Not found", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Invalid fields", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn edit_contact(
    Extension(svc): Extension<Arc<Service>>,
    ctx: RequestCtx,
    id: ContactIdParam,
    Form(fields): Form<RawContactFields>,
) -> Result<Json<ContactDto>, ProblemResponse> {
    apply_edit(&svc, &ctx, id, fields).await
}

/// REST alias of the edit action
#[utoipa::path(
    put,
    path = "/contacts/{contact_id}",
    tag = "contacts",
    params(("contact_id" = String, Path, description = "Contact id")),
    request_body(content = ContactForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Updated contact", body = ContactDto),
        (status = 404, description = "Not found", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Invalid fields", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_contact(
    Extension(svc): Extension<Arc<Service>>,
    ctx: RequestCtx,
    id: ContactIdParam,
    Form(fields): Form<RawContactFields>,
) -> Result<Json<ContactDto>, ProblemResponse> {
    apply_edit(&svc, &ctx, id, fields).await
}

/// Delete form action: redirect back to the list
#[utoipa::path(
    post,
    path = "/contacts/{contact_id}/delete",
    tag = "contacts",
    params(("contact_id" = String, Path, description = "Contact id")),
    responses(
        (status = 303, description = "Deleted; see the contact list"),
        (status = 404, description = "Not found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_contact_action(
    Extension(svc): Extension<Arc<Service>>,
    ctx: RequestCtx,
    ContactIdParam(id): ContactIdParam,
) -> Result<Response, ProblemResponse> {
    info!("Deleting contact {} (form action)", id);

    svc.delete_contact(&id)
        .await
        .map_err(|e| map_domain_error(&e, &ctx))?;
    Ok(see_other(CONTACTS_PATH))
}

/// Delete a contact by id
#[utoipa::path(
    delete,
    path = "/contacts/{contact_id}",
    tag = "contacts",
    params(("contact_id" = String, Path, description = "Contact id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_contact(
    Extension(svc): Extension<Arc<Service>>,
    ctx: RequestCtx,
    ContactIdParam(id): ContactIdParam,
) -> Result<Response, ProblemResponse> {
    info!("Deleting contact: {}", id);

    svc.delete_contact(&id)
        .await
        .map_err(|e| map_domain_error(&e, &ctx))?;
    Ok(no_content())
}

