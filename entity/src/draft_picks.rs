//! SeaORM Entity for the draft_picks table.
//! One row per card selected during a live draft session.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::draft_picks::Model)]
#[sea_orm(schema_name = "dynasty_cube", table_name = "draft_picks")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = Uuid)]
    pub id: Id,

    /// Draft session this pick belongs to
    pub session_id: String,

    /// 1-based position of this pick within its session
    pub pick_number: i32,

    /// External card identity, used for duplicate detection across the league
    pub card_id: String,

    pub card_name: String,

    pub card_set: String,

    pub rarity: String,

    pub image_url: String,

    #[schema(value_type = Uuid)]
    pub team_id: Id,

    pub team_name: String,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
