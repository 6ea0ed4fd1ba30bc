// Schema-driven request validation. Bodies and query strings have separate
// entry points so a single route can validate both independently. Failures
// become a 422 with one `"<field> is <reason>"` entry per violated field;
// serde drops unknown fields and coerces date strings on the way in.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// JSON body extractor that validates the deserialized payload.
pub struct ValidatedJson<T>(pub T);

/// Query-string extractor that validates the deserialized parameters.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(map_json_rejection)?;
        payload.validate().map_err(into_invalid_input)?;
        Ok(ValidatedJson(payload))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(map_query_rejection)?;
        params.validate().map_err(into_invalid_input)?;
        Ok(ValidatedQuery(params))
    }
}

fn map_json_rejection(rejection: JsonRejection) -> ApiError {
    match rejection {
        // Well-formed JSON that doesn't fit the schema, e.g. a missing
        // required field. Reported in the same shape as validator failures.
        JsonRejection::JsonDataError(err) => {
            let detail = err.body_text();
            if let Some(field) = missing_field_name(&detail) {
                ApiError::invalid_input(vec![format!("{} is required", field)])
            } else {
                ApiError::invalid_input(vec![detail])
            }
        }
        JsonRejection::JsonSyntaxError(_) => ApiError::bad_request("Malformed JSON body"),
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::bad_request("Expected application/json request body")
        }
        other => {
            tracing::error!("unexpected body extraction failure: {}", other.body_text());
            ApiError::unexpected()
        }
    }
}

fn map_query_rejection(rejection: QueryRejection) -> ApiError {
    ApiError::invalid_input(vec![rejection.body_text()])
}

/// serde reports a missing required field as "missing field `name`".
fn missing_field_name(detail: &str) -> Option<&str> {
    let (_, rest) = detail.split_once("missing field `")?;
    rest.split('`').next()
}

fn into_invalid_input(errors: ValidationErrors) -> ApiError {
    ApiError::invalid_input(format_errors(&errors))
}

/// One message per violated field: `"<field> is <constraint message>"`.
fn format_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let reason = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                format!("{} is {}", field, reason)
            })
        })
        .collect();
    messages.sort();
    messages
}
