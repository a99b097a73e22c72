//! User entity for SeaORM.

use sea_orm::entity::prelude::*;

use chirp_core::ports::UserRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub identity: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from the SeaORM model to the port record.
impl From<Model> for UserRecord {
    fn from(model: Model) -> Self {
        Self {
            identity: model.identity,
            name: model.name,
        }
    }
}
