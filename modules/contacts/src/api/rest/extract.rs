use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::request::Parts;
use modkit::{ProblemResponse, RequestCtx};

use crate::api::rest::error::malformed_request;
use crate::contract::model::ContactId;

pub const CONTACT_ID_PARAM: &str = "contact_id";

/// The `{contact_id}` route parameter. Any string is accepted; unknown ids
/// surface as 404 from the service. A route without the parameter is a
/// wiring bug and answers 500.
#[derive(Debug, Clone)]
pub struct ContactIdParam(pub ContactId);

impl<S> FromRequestParts<S> for ContactIdParam
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let found = RawPathParams::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|params| {
                params
                    .iter()
                    .find(|(name, _)| *name == CONTACT_ID_PARAM)
                    .map(|(_, value)| value.to_string())
            });

        match found {
            Some(id) => Ok(Self(ContactId::from(id))),
            None => Err(malformed_request(
                CONTACT_ID_PARAM,
                &RequestCtx::from_parts(parts),
            )),
        }
    }
}
