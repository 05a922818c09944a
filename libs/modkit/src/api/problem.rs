use std::collections::BTreeMap;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// RFC 9457 Problem Details for HTTP APIs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    title = "Problem",
    description = "RFC 9457 Problem Details for HTTP APIs"
)]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    pub status: u16,
    /// A human-readable explanation specific to this occurrence of the problem.
    pub detail: String,
    /// A URI reference that identifies the specific occurrence of the problem.
    pub instance: String,
    /// Machine-readable error code defined by the application.
    pub code: String,
    /// Request id useful for tracing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Validation errors for 4xx problems, one entry per message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
    /// The same validation messages grouped by field name, in field order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(title = "ValidationError")]
pub struct ValidationError {
    pub detail: String,
    /// JSON Pointer to the invalid location (e.g., "/avatar").
    pub pointer: String,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            request_id: None,
            errors: None,
            field_errors: None,
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Attach per-field messages; also fills `errors` with one pointer entry per message.
    pub fn with_field_errors(mut self, fields: BTreeMap<String, Vec<String>>) -> Self {
        let flat = fields
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |m| ValidationError {
                    detail: m.clone(),
                    pointer: format!("/{field}"),
                })
            })
            .collect();
        self.errors = Some(flat);
        self.field_errors = Some(fields);
        self
    }
}

/// Axum response wrapper that renders `Problem` with correct status & content type.
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut resp = axum::Json(self.0).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_into_response_sets_status_and_content_type() {
        let p = Problem::new(StatusCode::BAD_REQUEST, "Bad Request", "invalid payload");
        let resp = ProblemResponse(p).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let ct = resp
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_PROBLEM_JSON);
    }

    #[test]
    fn field_errors_are_flattened_into_pointers() {
        let mut fields = BTreeMap::new();
        fields.insert(
            "avatar".to_string(),
            vec!["Invalid url".to_string(), "Too short".to_string()],
        );
        fields.insert("first".to_string(), vec!["Required".to_string()]);

        let p = Problem::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Validation failed",
            "Please fill out all missing fields.",
        )
        .with_code("CONTACTS_VALIDATION")
        .with_instance("/contacts")
        .with_request_id("req-1")
        .with_field_errors(fields);

        assert_eq!(p.status, 422);
        let errors = p.errors.as_ref().unwrap();
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors[0],
            ValidationError {
                detail: "Invalid url".into(),
                pointer: "/avatar".into()
            }
        );
        assert_eq!(errors[2].pointer, "/first");
        assert_eq!(p.field_errors.as_ref().unwrap()["first"], vec!["Required"]);
    }

    #[test]
    fn optional_members_are_omitted_from_json() {
        let p = Problem::new(StatusCode::NOT_FOUND, "Not Found", "missing");
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["type"], "about:blank");
        assert!(v.get("errors").is_none());
        assert!(v.get("field_errors").is_none());
        assert!(v.get("request_id").is_none());
    }
}
