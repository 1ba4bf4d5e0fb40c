//! Column schema descriptions
//!
//! A [`TableSchema`] is the only thing serialization and field verification
//! know about a model: which columns exist, and for each whether it is part of
//! the primary key, nullable, or carries a default. Schemas can be declared by
//! hand or reflected from a Sea-ORM entity.
//!
//! ```rust,ignore
//! use sandcrate::schema::{ColumnSchema, TableSchema};
//!
//! let schema = TableSchema::new("cloud")
//!     .with_column(ColumnSchema::new("id").primary_key())
//!     .with_column(ColumnSchema::new("name"))
//!     .with_column(ColumnSchema::new("description").nullable());
//!
//! // Or, from an entity generated by `DeriveEntityModel`:
//! let schema = TableSchema::from_entity::<cloud::Entity>();
//! ```

use sea_orm::{ColumnTrait, EntityTrait, IdenStatic, Iterable, PrimaryKeyToColumn};
use serde::Serialize;
use std::fmt;

/// Description of a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    pub nullable: bool,
    pub has_default: bool,
    pub primary_key: bool,
}

impl ColumnSchema {
    /// A non-nullable column without a default that is not part of the primary key
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            has_default: false,
            primary_key: false,
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Whether a write payload has to carry a value for this column.
    ///
    /// Primary keys are assigned by the store, nullable columns may be left
    /// out, and columns with a default are filled in on insert.
    #[must_use]
    pub fn is_required(&self) -> bool {
        !(self.primary_key || self.has_default || self.nullable)
    }
}

/// Columns of one table, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnSchema>,
}

impl TableSchema {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column. A column with the same name replaces the earlier one
    /// in place.
    #[must_use]
    pub fn with_column(mut self, column: ColumnSchema) -> Self {
        if let Some(existing) = self.columns.iter_mut().find(|c| c.name == column.name) {
            *existing = column;
        } else {
            self.columns.push(column);
        }
        self
    }

    /// Reflect the schema of a Sea-ORM entity.
    ///
    /// Nullability and defaults come from each column's `ColumnDef`
    /// (`Option<T>` fields are nullable, `#[sea_orm(default_value = ..)]`
    /// sets a default); primary key membership comes from the entity's
    /// `PrimaryKey` enum.
    ///
    /// Column names are the database names. A field whose column is renamed
    /// with `#[sea_orm(column_name = ..)]`, or whose serde name differs from
    /// its column, will not line up with the model's serde output; declare
    /// such a schema by hand instead.
    #[must_use]
    pub fn from_entity<E: EntityTrait>() -> Self {
        let primary_keys: Vec<String> = E::PrimaryKey::iter()
            .map(|key| key.into_column().as_str().to_owned())
            .collect();

        let columns = E::Column::iter()
            .map(|column| {
                let def = column.def();
                let name = column.as_str().to_owned();
                ColumnSchema {
                    primary_key: primary_keys.contains(&name),
                    nullable: def.is_null(),
                    has_default: def.get_column_default().is_some(),
                    name,
                }
            })
            .collect();

        Self {
            name: E::default().table_name().to_owned(),
            columns,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Columns every write payload must supply
    pub fn required_columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|c| c.is_required())
    }

    /// `table.column`, the form used in error messages
    #[must_use]
    pub fn qualified_name(&self, column: &ColumnSchema) -> String {
        format!("{}.{}", self.name, column.name)
    }
}

impl fmt::Display for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
