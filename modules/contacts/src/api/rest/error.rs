use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse};
use modkit::RequestCtx;

use crate::domain::error::DomainError;

/// Detail shown with every validation problem.
pub const VALIDATION_DETAIL: &str = "Please fill out all missing fields.";

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    ctx: &RequestCtx,
) -> Problem {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{}", code))
        .with_code(code);
    ctx.decorate(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, ctx: &RequestCtx) -> ProblemResponse {
    match e {
        DomainError::ContactNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "CONTACTS_NOT_FOUND",
            "Contact not found",
            format!("Contact with id {} was not found", id),
            ctx,
        )
        .into(),
        DomainError::Validation(errors) => from_parts(
            StatusCode::UNPROCESSABLE_ENTITY,
            "CONTACTS_VALIDATION",
            "Validation failed",
            VALIDATION_DETAIL,
            ctx,
        )
        .with_field_errors(errors.as_map().clone())
        .into(),
        DomainError::Storage { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Storage error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_STORAGE",
                "Internal error",
                "An internal storage error occurred",
                ctx,
            )
            .into()
        }
    }
}

/// A handler was reached without a route parameter it depends on: the router
/// is wired wrong, not the client.
pub fn malformed_request(param: &str, ctx: &RequestCtx) -> ProblemResponse {
    tracing::error!(
        param,
        path = %ctx.instance,
        "Route parameter missing; handler mounted on the wrong route"
    );
    from_parts(
        StatusCode::INTERNAL_SERVER_ERROR,
        "CONTACTS_MALFORMED_REQUEST",
        "Malformed request",
        format!("Missing route parameter '{param}'"),
        ctx,
    )
    .into()
}
