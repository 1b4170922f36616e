use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sites")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub description: String,
    pub address: String,
    pub postal_code: i32,
    pub town: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub altitude_m: i16,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::entities::Entity",
        from = "Column::OwnerId",
        to = "super::entities::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::stations::Entity")]
    Stations,
    #[sea_orm(has_many = "super::archives::Entity")]
    Archives,
}

impl Related<super::entities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::stations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stations.def()
    }
}

impl Related<super::archives::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Archives.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
