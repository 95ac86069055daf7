use crate::entities::listing_entity as listings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Listing {
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

impl Listing {
    pub fn is_visible(&self) -> bool {
        self.available && self.is_active
    }

    pub fn apply_ranking(&mut self, ranking: ListingRanking) {
        self.is_active = ranking.is_active;
        self.last_bump_time = ranking.last_bump_time;
        self.trial_ends_on = ranking.trial_ends_on;
    }
}

impl From<listings::Model> for Listing {
    fn from(m: listings::Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            title: m.title,
            alt_title: m.alt_title,
            description: m.description,
            category: m.category,
            price_per_day: m.price_per_day,
            currency: m.currency,
            city: m.city,
            country: m.country,
            available: m.available,
            is_active: m.is_active,
            last_bump_time: m.last_bump_time,
            trial_ends_on: m.trial_ends_on,
            created_at: m.created_at,
        }
    }
}

/// The fields the bump scheduler is allowed to mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingRanking {
    pub is_active: bool,
    pub last_bump_time: DateTime<Utc>,
    pub trial_ends_on: Option<DateTime<Utc>>,
}

/// A listing that has passed validation but has no id yet.
#[derive(Debug, Clone)]
pub struct NewListing {
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
    pub last_bump_time: DateTime<Utc>,
    pub trial_ends_on: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NewListing {
    pub fn into_listing(self, id: i64) -> Listing {
        Listing {
            id,
            owner_id: self.owner_id,
            title: self.title,
            alt_title: self.alt_title,
            description: self.description,
            category: self.category,
            price_per_day: self.price_per_day,
            currency: self.currency,
            city: self.city,
            country: self.country,
            available: self.available,
            is_active: true,
            last_bump_time: self.last_bump_time,
            trial_ends_on: self.trial_ends_on,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublishListingRequest {
    #[schema(example = 1)]
    pub owner_id: i64,
    #[schema(example = "Tractor John Deere 5075E")]
    pub title: String,
    #[schema(example = "Tractor Agrícola John Deere 5075E")]
    pub alt_title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "heavy")]
    pub category: String,
    #[schema(example = 250)]
    pub price_per_day: i64,
    #[schema(example = "EUR")]
    pub currency: Option<String>,
    #[schema(example = "Madrid")]
    pub city: String,
    #[schema(example = "España")]
    pub country: Option<String>,
    /// Publish as the owner's one-off trial listing instead of against the plan quota
    #[serde(default)]
    pub trial: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublishListingResponse {
    pub listing: Listing,
    pub ads_published: u32,
    pub remaining: Option<u32>,
}
