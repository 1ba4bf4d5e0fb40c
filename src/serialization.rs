//! Model ⇄ key-value map conversion
//!
//! [`SerializableModel`] gives a model `to_dict` / `from_dict` on top of its
//! serde implementation. Keys are the columns of the model's
//! [`TableSchema`]; values are whatever serde produces for the field, so
//! chrono timestamps come out as RFC 3339 strings and are accepted back in
//! the same form.
//!
//! Sea-ORM models get the implementation from [`serializable_model!`]:
//!
//! ```rust,ignore
//! #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
//! #[sea_orm(table_name = "cloud")]
//! pub struct Model {
//!     #[sea_orm(primary_key)]
//!     pub id: i32,
//!     pub name: String,
//! }
//!
//! sandcrate::serializable_model!(Model => Entity);
//!
//! let dict = cloud.to_dict()?;
//! let renamed = cloud.from_dict(&json!({"name": "eu-west"}).as_object().unwrap())?;
//! ```

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::fmt;

use crate::schema::TableSchema;

#[derive(Debug)]
pub enum SerializationError {
    /// A key in the input map is not a column of the table
    UnknownField { table: String, field: String },
    /// A value could not be converted to (or from) the field's type
    InvalidValue {
        table: String,
        source: serde_json::Error,
    },
    /// The record does not serialize to a JSON object
    NotAnObject { table: String },
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { table, field } => {
                write!(f, "'{table}' has no attribute '{field}'")
            }
            Self::InvalidValue { table, source } => {
                write!(f, "invalid value for '{table}': {source}")
            }
            Self::NotAnObject { table } => {
                write!(f, "'{table}' record does not serialize to an object")
            }
        }
    }
}

impl std::error::Error for SerializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidValue { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A record that can describe its columns and convert itself to and from a
/// flat JSON map.
///
/// Schema column names are matched against the record's serde field names,
/// so every column must serialize under its own name. With
/// `#[serde(rename)]` or a renamed Sea-ORM column, write `schema()` by hand
/// using the serde names.
pub trait SerializableModel: Serialize + DeserializeOwned {
    /// Column schema of the backing table
    fn schema() -> TableSchema;

    /// One entry per schema column, in column order. A column the record
    /// does not serialize is emitted as `null`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] if the record does not serialize to a
    /// JSON object.
    fn to_dict(&self) -> Result<Map<String, Value>, SerializationError> {
        let schema = Self::schema();
        let mut fields = serialized_fields(self, &schema)?;
        Ok(schema
            .columns()
            .iter()
            .map(|column| {
                let value = fields.remove(&column.name).unwrap_or(Value::Null);
                (column.name.clone(), value)
            })
            .collect())
    }

    /// Overwrite each field named in `attributes` and return the updated
    /// record. Fields not named keep their current value.
    ///
    /// # Errors
    ///
    /// - [`SerializationError::UnknownField`] if a key is not a column
    /// - [`SerializationError::InvalidValue`] if a value does not fit the
    ///   field's type
    fn from_dict(self, attributes: &Map<String, Value>) -> Result<Self, SerializationError> {
        let schema = Self::schema();

        if let Some(field) = attributes.keys().find(|key| !schema.contains(key)) {
            tracing::debug!(table = %schema, field = %field, "Rejected unknown attribute");
            return Err(SerializationError::UnknownField {
                table: schema.name().to_owned(),
                field: field.clone(),
            });
        }

        let mut fields = serialized_fields(&self, &schema)?;
        for (key, value) in attributes {
            fields.insert(key.clone(), value.clone());
        }

        serde_json::from_value(Value::Object(fields)).map_err(|source| {
            SerializationError::InvalidValue {
                table: schema.name().to_owned(),
                source,
            }
        })
    }
}

fn serialized_fields<M: Serialize>(
    record: &M,
    schema: &TableSchema,
) -> Result<Map<String, Value>, SerializationError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(SerializationError::NotAnObject {
            table: schema.name().to_owned(),
        }),
        Err(source) => Err(SerializationError::InvalidValue {
            table: schema.name().to_owned(),
            source,
        }),
    }
}

/// Implement [`SerializableModel`] for Sea-ORM models by reflecting the
/// schema of their entity.
///
/// Usage: `serializable_model!(cloud::Model => cloud::Entity)`, or several
/// pairs separated by commas.
#[macro_export]
macro_rules! serializable_model {
    ($($model:ty => $entity:ty),+ $(,)?) => {
        $(
            impl $crate::serialization::SerializableModel for $model {
                fn schema() -> $crate::schema::TableSchema {
                    $crate::schema::TableSchema::from_entity::<$entity>()
                }
            }
        )+
    };
}
