use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};

/// 201 Created + JSON, with a `Location` header pointing at the new resource.
pub fn created_at<T: serde::Serialize>(location: &str, value: T) -> Response {
    let mut resp = (StatusCode::CREATED, Json(value)).into_response();
    if let Ok(v) = HeaderValue::from_str(location) {
        resp.headers_mut().insert(header::LOCATION, v);
    }
    resp
}

/// 204 No Content
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// 303 See Other, the redirect form actions answer with.
pub fn see_other(location: &str) -> Response {
    Redirect::to(location).into_response()
}
