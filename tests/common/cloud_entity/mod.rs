use sandcrate::Resource;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cloud")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::machine_entity::Entity")]
    Machines,
}

impl Related<super::machine_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Machines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

sandcrate::serializable_model!(Model => Entity);

impl Resource for Model {
    const RESOURCE_NAME_SINGULAR: &'static str = "cloud";
    const RESOURCE_NAME_PLURAL: &'static str = "clouds";
}
