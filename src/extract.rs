//! Request body extraction for the translate endpoint.

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::FormRejection, FromRequest, Request},
    http::header,
    Form,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::warn;

use crate::error::{AppError, ErrorResponse};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The untyped request body, read either as JSON or as an urlencoded form.
///
/// Anything that does not parse becomes `Value::Null` so that validation
/// reports it as a missing `text`. Only failing to read the body at all
/// (for instance past the size limit) is rejected, with a JSON error.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(pub Value);

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            return match Form::<HashMap<String, String>>::from_request(req, state).await {
                Ok(Form(fields)) => Ok(Payload(form_to_json(fields))),
                Err(FormRejection::BytesRejection(rejection)) => Err(reject(rejection.into())),
                Err(_) => Ok(Payload(Value::Null)),
            };
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| reject(rejection.into()))?;
        Ok(Payload(serde_json::from_slice(&body).unwrap_or(Value::Null)))
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().starts_with(FORM_CONTENT_TYPE))
        .unwrap_or(false)
}

fn form_to_json(fields: HashMap<String, String>) -> Value {
    let object: Map<String, Value> = fields
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    Value::Object(object)
}

fn reject(err: AppError) -> ErrorResponse {
    warn!(code = ?err.code(), "Rejected request body: {}", err);
    err.respond(false)
}
