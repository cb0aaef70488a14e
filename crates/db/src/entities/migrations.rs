//! `SeaORM` Entity for the migrations tracking table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "migrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub filename: String,
    pub executed_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for migrun_core::MigrationRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            filename: model.filename,
            executed_at: model.executed_at,
        }
    }
}
