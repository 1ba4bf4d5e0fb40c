//! Serialization and required-field verification for CRUD APIs built on
//! Axum and Sea-ORM.
//!
//! - [`schema`]: column schemas, hand-written or reflected from an entity
//! - [`serialization`]: `to_dict` / `from_dict` for models
//! - [`verification`]: reject write payloads missing required columns
//! - [`routes`]: generic handlers wiring the two together

pub mod errors;
pub mod routes;
pub mod schema;
pub mod serialization;
pub mod verification;

pub use errors::ApiError;
pub use routes::{RecordStore, Resource, crud_router};
pub use schema::{ColumnSchema, TableSchema};
pub use serialization::{SerializableModel, SerializationError};
pub use verification::{
    ValidationError, VerificationError, Verified, verify_fields, verify_primary_key_unchanged,
    with_verified_fields,
};
