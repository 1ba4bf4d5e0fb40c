//! Generic REST handlers for one resource
//!
//! `crud_router::<M>(store)` serves `/` (list, create) and `/{id}` (get,
//! replace, patch, delete). Bodies are read and written as `to_dict` maps.
//! Create and replace verify required fields first; neither replace nor
//! patch may change the record's primary key.

use crate::errors::ApiError;
use crate::serialization::SerializableModel;
use crate::verification::{Verified, parse_payload, verify_primary_key_unchanged};
use async_trait::async_trait;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A model exposed over the generated REST endpoints.
///
/// `Default` supplies the blank record a create payload is applied to.
pub trait Resource: SerializableModel + Default + Send + Sync + 'static {
    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;
}

/// Persistence for one resource type, keyed by the id segment of the URL.
///
/// Implemented by the application on top of its ORM connection.
#[async_trait]
pub trait RecordStore<M: Send + 'static>: Send + Sync {
    async fn list(&self) -> Result<Vec<M>, ApiError>;

    async fn get(&self, id: &str) -> Result<Option<M>, ApiError>;

    /// Persist a new record and return it with its assigned primary key
    async fn insert(&self, record: M) -> Result<M, ApiError>;

    async fn save(&self, id: &str, record: M) -> Result<M, ApiError>;

    /// Returns `false` if nothing was stored under `id`
    async fn delete(&self, id: &str) -> Result<bool, ApiError>;
}

pub type SharedStore<M> = Arc<dyn RecordStore<M>>;

type Dict = Map<String, Value>;

/// Build a router with the list/create (`/`) and item (`/{id}`) endpoints
/// for `M`. Nest it under the resource's path:
///
/// ```rust,ignore
/// let app = Router::new().nest("/clouds", crud_router::<cloud::Model>(store));
/// ```
pub fn crud_router<M: Resource>(store: SharedStore<M>) -> Router {
    Router::new()
        .route("/", get(get_all::<M>).post(create_one::<M>))
        .route(
            "/{id}",
            get(get_one::<M>)
                .put(update_one::<M>)
                .patch(patch_one::<M>)
                .delete(delete_one::<M>),
        )
        .with_state(store)
}

pub async fn get_all<M: Resource>(
    State(store): State<SharedStore<M>>,
) -> Result<Json<Vec<Dict>>, ApiError> {
    let records = store.list().await?;
    let items = records
        .iter()
        .map(SerializableModel::to_dict)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(items))
}

pub async fn get_one<M: Resource>(
    State(store): State<SharedStore<M>>,
    Path(id): Path<String>,
) -> Result<Json<Dict>, ApiError> {
    let record = fetch(store.as_ref(), &id).await?;
    Ok(Json(record.to_dict()?))
}

/// Requires every required column in the body.
pub async fn create_one<M: Resource>(
    State(store): State<SharedStore<M>>,
    verified: Verified<M>,
) -> Result<(StatusCode, Json<Dict>), ApiError> {
    let record = M::default().from_dict(&verified.into_inner())?;
    let created = store.insert(record).await?;
    tracing::debug!(resource = M::RESOURCE_NAME_SINGULAR, "Created record");
    Ok((StatusCode::CREATED, Json(created.to_dict()?)))
}

/// Full replacement: the body is verified like a create.
pub async fn update_one<M: Resource>(
    State(store): State<SharedStore<M>>,
    Path(id): Path<String>,
    verified: Verified<M>,
) -> Result<Json<Dict>, ApiError> {
    let existing = fetch(store.as_ref(), &id).await?;
    let payload = verified.into_inner();
    verify_primary_key_unchanged(&M::schema(), &existing.to_dict()?, &payload)?;
    let record = existing.from_dict(&payload)?;
    let saved = store.save(&id, record).await?;
    Ok(Json(saved.to_dict()?))
}

/// Partial update: only the fields sent are changed, nothing is required.
pub async fn patch_one<M: Resource>(
    State(store): State<SharedStore<M>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Dict>, ApiError> {
    let payload = parse_payload(&body)?;
    let existing = fetch(store.as_ref(), &id).await?;
    verify_primary_key_unchanged(&M::schema(), &existing.to_dict()?, &payload)?;
    let record = existing.from_dict(&payload)?;
    let saved = store.save(&id, record).await?;
    Ok(Json(saved.to_dict()?))
}

pub async fn delete_one<M: Resource>(
    State(store): State<SharedStore<M>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if store.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(M::RESOURCE_NAME_SINGULAR, Some(id)))
    }
}

async fn fetch<M: Resource>(store: &dyn RecordStore<M>, id: &str) -> Result<M, ApiError> {
    store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(M::RESOURCE_NAME_SINGULAR, Some(id.to_owned())))
}
