use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Request id assigned by the ingress middleware and stored in request extensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XRequestId(pub String);

/// Per-request data handlers need when rendering a `Problem`.
#[derive(Clone, Debug, Default)]
pub struct RequestCtx {
    /// Request path, used as the problem `instance`.
    pub instance: String,
    pub request_id: Option<String>,
}

impl RequestCtx {
    /// Read the context straight from request parts.
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            instance: parts.uri.path().to_string(),
            request_id: parts
                .extensions
                .get::<XRequestId>()
                .map(|XRequestId(id)| id.clone()),
        }
    }

    /// Stamp `instance` and `request_id` onto a problem.
    pub fn decorate(&self, problem: crate::Problem) -> crate::Problem {
        let problem = problem.with_instance(self.instance.clone());
        match &self.request_id {
            Some(id) => problem.with_request_id(id.clone()),
            None => problem,
        }
    }
}

impl<S> FromRequestParts<S> for RequestCtx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
