use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub alt_title: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub price_per_day: i64,
    pub currency: String,
    pub city: String,
    pub country: Option<String>,
    pub available: bool,
    pub is_active: bool,
    pub last_bump_time: DateTime<Utc>,
    pub trial_ends_on: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
