use chrono::{DateTime, Utc};
use sandcrate::Resource;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "machine")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub hostname: String,
    pub operating_system: String,
    pub description: String,
    pub cloud_id: Option<i32>,
    #[sea_orm(default_value = false)]
    pub is_running: bool,
    pub launched_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cloud_entity::Entity",
        from = "Column::CloudId",
        to = "super::cloud_entity::Column::Id"
    )]
    Cloud,
}

impl Related<super::cloud_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cloud.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

sandcrate::serializable_model!(Model => Entity);

impl Resource for Model {
    const RESOURCE_NAME_SINGULAR: &'static str = "machine";
    const RESOURCE_NAME_PLURAL: &'static str = "machines";
}
