//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;

use chirp_core::ports::PostRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub author: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_time: i64,
    pub modified_time: Option<i64>,
    pub parent: Option<String>,
    pub link: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Author",
        to = "super::user::Column::Identity",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from the SeaORM model to the port record.
impl From<Model> for PostRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author: model.author,
            content: model.content,
            created_time: model.created_time,
            modified_time: model.modified_time,
            parent: model.parent,
            link: model.link,
        }
    }
}
