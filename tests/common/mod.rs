#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use sandcrate::{ApiError, RecordStore, crud_router};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub mod cloud_entity;
pub mod machine_entity;

/// In-memory store standing in for a database connection
pub struct MemoryStore<M> {
    records: Mutex<BTreeMap<i32, M>>,
    assign_id: fn(&mut M, i32),
}

impl<M: Clone> MemoryStore<M> {
    pub fn new(assign_id: fn(&mut M, i32)) -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            assign_id,
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("store lock").len()
    }

    pub fn get_sync(&self, id: i32) -> Option<M> {
        self.records.lock().expect("store lock").get(&id).cloned()
    }
}

#[async_trait]
impl<M: Clone + Send + Sync + 'static> RecordStore<M> for MemoryStore<M> {
    async fn list(&self) -> Result<Vec<M>, ApiError> {
        Ok(self.records.lock().expect("store lock").values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<M>, ApiError> {
        let Ok(id) = id.parse::<i32>() else {
            return Ok(None);
        };
        Ok(self.get_sync(id))
    }

    async fn insert(&self, mut record: M) -> Result<M, ApiError> {
        let mut records = self.records.lock().expect("store lock");
        let id = records.keys().next_back().map_or(1, |last| last + 1);
        (self.assign_id)(&mut record, id);
        records.insert(id, record.clone());
        Ok(record)
    }

    async fn save(&self, id: &str, record: M) -> Result<M, ApiError> {
        let key = id
            .parse::<i32>()
            .map_err(|_| ApiError::not_found("record", Some(id.to_owned())))?;
        self.records
            .lock()
            .expect("store lock")
            .insert(key, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        let Ok(id) = id.parse::<i32>() else {
            return Ok(false);
        };
        Ok(self.records.lock().expect("store lock").remove(&id).is_some())
    }
}

pub fn cloud_store() -> Arc<MemoryStore<cloud_entity::Model>> {
    Arc::new(MemoryStore::<cloud_entity::Model>::new(|cloud, id| {
        cloud.id = id;
    }))
}

pub fn machine_store() -> Arc<MemoryStore<machine_entity::Model>> {
    Arc::new(MemoryStore::<machine_entity::Model>::new(|machine, id| {
        machine.id = id;
    }))
}

/// Route `tracing` output through the test harness; `RUST_LOG=debug` shows
/// rejected payloads.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn setup_test_app(
    clouds: Arc<MemoryStore<cloud_entity::Model>>,
    machines: Arc<MemoryStore<machine_entity::Model>>,
) -> Router {
    init_tracing();

    let api = Router::new()
        .nest("/clouds", crud_router::<cloud_entity::Model>(clouds))
        .nest("/machines", crud_router::<machine_entity::Model>(machines));

    Router::new().nest("/api/v1", api)
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn raw_request(method: &str, uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
