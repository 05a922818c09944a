use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use modkit::{Problem, ValidationError};

/// OpenAPI fragment for the contacts routes, merged into the served document
/// by the REST host.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_contacts,
        handlers::create_contact,
        handlers::get_contact,
        handlers::toggle_favorite,
        handlers::edit_contact,
        handlers::update_contact,
        handlers::delete_contact_action,
        handlers::delete_contact,
    ),
    components(schemas(
        dto::ContactDto,
        dto::ContactListDto,
        dto::ContactForm,
        dto::FavoriteForm,
        Problem,
        ValidationError,
    )),
    tags((name = "contacts", description = "Contact records: list, search, create, edit, favorite, delete"))
)]
pub struct ContactsApiDoc;
