//! HTTP helpers for the relay Lambda.

use lambda_http::http::response::Builder;
use lambda_http::{Body, Response};
use serde::Serialize;

use crate::models::ErrorBody;

/// CORS headers attached to every relay response.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    (
        "access-control-allow-headers",
        "Content-Type, Authorization, x-widget-key",
    ),
];

fn with_cors(status: u16) -> Builder {
    CORS_HEADERS
        .iter()
        .fold(Response::builder().status(status), |builder, (name, value)| {
            builder.header(*name, *value)
        })
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(
    status: u16,
    data: &T,
) -> Result<Response<Body>, lambda_http::Error> {
    let response = with_cors(status)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(data)?))
        .map_err(Box::new)?;
    Ok(response)
}

/// Create an error response with the given status code and message.
pub fn error_response(
    status: u16,
    message: impl Into<String>,
) -> Result<Response<Body>, lambda_http::Error> {
    json_response(status, &ErrorBody::new(message))
}

/// Create a bodiless response (preflight).
pub fn empty_response(status: u16) -> Result<Response<Body>, lambda_http::Error> {
    let response = with_cors(status).body(Body::Empty).map_err(Box::new)?;
    Ok(response)
}
