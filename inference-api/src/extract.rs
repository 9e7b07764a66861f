//! Request body extraction for `POST /predict`.
//!
//! The body is kept as an undecoded [`RawValue`]: the JSON syntax is checked
//! here, numbers are only decoded later, field by field, during validation.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use serde_json::value::RawValue;

use crate::error::ApiError;

/// A syntactically valid JSON body sent with a JSON content type.
#[derive(Debug)]
pub struct JsonBody(pub Box<RawValue>);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Err(ApiError::NotJson(
                "Expected request with `Content-Type: application/json`".to_string(),
            ));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::NotJson(rejection.body_text()))?;
        let raw = serde_json::from_slice(&bytes).map_err(|e| ApiError::NotJson(e.to_string()))?;

        Ok(Self(raw))
    }
}

/// `application/json`, or any `application/*+json` type, parameters ignored.
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence
        .strip_prefix("application/")
        .is_some_and(|subtype| subtype == "json" || subtype.ends_with("+json"))
}
