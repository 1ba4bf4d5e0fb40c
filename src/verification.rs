//! Required-field verification for write payloads
//!
//! Before a create or update handler runs, the raw request body is parsed as
//! JSON and checked against the model's [`TableSchema`]: every column that is
//! not part of the primary key, not nullable and has no default must be
//! present. The body is parsed whatever its content type.
//!
//! The check is available as plain functions ([`verify_fields`],
//! [`with_verified_fields`]) and as the [`Verified`] extractor, which runs it
//! before the handler body:
//!
//! ```rust,ignore
//! async fn create_cloud(Verified { payload, .. }: Verified<cloud::Model>) -> Result<..., ApiError> {
//!     let cloud = cloud::Model::default().from_dict(&payload)?;
//!     // ...
//! }
//! ```

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;

use crate::errors::ApiError;
use crate::schema::TableSchema;
use crate::serialization::SerializableModel;

/// A field that failed verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Qualified column name, `table.column`
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// Body missing, unparseable, or an empty / non-object JSON value
    NoData,
    /// A required column is absent from the payload
    MissingField(ValidationError),
    /// An update payload assigns a different value to a primary key column
    KeyChanged(ValidationError),
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "No data received from request"),
            Self::MissingField(err) | Self::KeyChanged(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for VerificationError {}

/// Parse a request body into a non-empty JSON object.
///
/// # Errors
///
/// [`VerificationError::NoData`] if the body is not JSON, or is JSON but
/// not an object with at least one key.
pub fn parse_payload(body: &[u8]) -> Result<Map<String, Value>, VerificationError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(payload)) if !payload.is_empty() => Ok(payload),
        Ok(other) => {
            tracing::debug!(payload = %other, "Rejected empty or non-object payload");
            Err(VerificationError::NoData)
        }
        Err(err) => {
            tracing::debug!(error = %err, "Rejected unparseable payload");
            Err(VerificationError::NoData)
        }
    }
}

/// Check that `payload` carries every required column of `schema`.
///
/// Only key presence is checked; an explicit `null` counts as present.
///
/// # Errors
///
/// [`VerificationError::MissingField`] naming the first required column, in
/// schema order, that is absent.
pub fn verify_payload(
    schema: &TableSchema,
    payload: &Map<String, Value>,
) -> Result<(), VerificationError> {
    for column in schema.required_columns() {
        if !payload.contains_key(&column.name) {
            let field = schema.qualified_name(column);
            tracing::debug!(field = %field, "Required field missing from payload");
            return Err(VerificationError::MissingField(ValidationError::new(
                field, "required",
            )));
        }
    }
    Ok(())
}

/// Check that an update `payload` leaves the primary key of `current` alone.
///
/// Sending a key column with its current value is accepted, so a dict
/// returned by a read can be sent back unchanged.
///
/// # Errors
///
/// [`VerificationError::KeyChanged`] naming the first primary key column
/// whose payload value differs from `current`.
pub fn verify_primary_key_unchanged(
    schema: &TableSchema,
    current: &Map<String, Value>,
    payload: &Map<String, Value>,
) -> Result<(), VerificationError> {
    for column in schema.columns().iter().filter(|c| c.primary_key) {
        let Some(sent) = payload.get(&column.name) else {
            continue;
        };
        if current.get(&column.name) != Some(sent) {
            let field = schema.qualified_name(column);
            tracing::debug!(field = %field, "Rejected primary key change");
            return Err(VerificationError::KeyChanged(ValidationError::new(
                field,
                "cannot be changed",
            )));
        }
    }
    Ok(())
}

/// Parse `body` and verify it against `schema`, returning the payload.
///
/// # Errors
///
/// See [`parse_payload`] and [`verify_payload`].
pub fn verify_fields(
    schema: &TableSchema,
    body: &[u8],
) -> Result<Map<String, Value>, VerificationError> {
    let payload = parse_payload(body)?;
    verify_payload(schema, &payload)?;
    Ok(payload)
}

/// Run `operation` with the verified payload, or fail without running it.
///
/// # Errors
///
/// 400 if the body carries no data, 403 if a required field is missing.
pub fn with_verified_fields<T, F>(
    schema: &TableSchema,
    body: &[u8],
    operation: F,
) -> Result<T, ApiError>
where
    F: FnOnce(Map<String, Value>) -> T,
{
    let payload = verify_fields(schema, body)?;
    Ok(operation(payload))
}

/// Extractor yielding a payload verified against `M::schema()`
pub struct Verified<M> {
    pub payload: Map<String, Value>,
    model: PhantomData<fn() -> M>,
}

impl<M> Verified<M> {
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.payload
    }
}

impl<S, M> FromRequest<S> for Verified<M>
where
    S: Send + Sync,
    M: SerializableModel,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| {
                let status = rejection.status();
                if status == StatusCode::BAD_REQUEST {
                    ApiError::bad_request(rejection.body_text())
                } else {
                    ApiError::custom(status, rejection.body_text(), None)
                }
            })?;
        let payload = verify_fields(&M::schema(), &body)?;
        Ok(Self {
            payload,
            model: PhantomData,
        })
    }
}
