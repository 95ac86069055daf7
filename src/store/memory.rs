use super::{MarketplaceStore, PublishClaim, next_counter};
use crate::entities::PlanId;
use crate::error::{AppError, AppResult};
use crate::models::{Listing, ListingRanking, NewListing, NewUser, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    listings: BTreeMap<i64, Listing>,
    next_user_id: i64,
    next_listing_id: i64,
}

/// Process-local store; clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with existing records, keeping their ids.
    pub fn with_data(users: Vec<User>, listings: Vec<Listing>) -> Self {
        let next_user_id = users.iter().map(|u| u.id).max().unwrap_or(0);
        let next_listing_id = listings.iter().map(|l| l.id).max().unwrap_or(0);
        let tables = Tables {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            listings: listings.into_iter().map(|l| (l.id, l)).collect(),
            next_user_id,
            next_listing_id,
        };
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

#[async_trait]
impl MarketplaceStore for MemoryStore {
    async fn list_listings(&self) -> AppResult<Vec<Listing>> {
        Ok(self.tables.read().await.listings.values().cloned().collect())
    }

    async fn find_listing(&self, id: i64) -> AppResult<Option<Listing>> {
        Ok(self.tables.read().await.listings.get(&id).cloned())
    }

    async fn update_listing_ranking(&self, id: i64, ranking: ListingRanking) -> AppResult<()> {
        if let Some(listing) = self.tables.write().await.listings.get_mut(&id) {
            listing.apply_ranking(ranking);
        }
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_user(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }
        tables.next_user_id += 1;
        let user = user.into_user(tables.next_user_id);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_subscription(
        &self,
        user_id: i64,
        plan: PlanId,
        subscribed_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
        stored.plan = plan;
        stored.subscribed_at = Some(subscribed_at);
        stored.ads_published = 0;
        Ok(())
    }

    async fn publish_listing(
        &self,
        claim: PublishClaim,
        listing: NewListing,
    ) -> AppResult<Listing> {
        let mut tables = self.tables.write().await;
        let owner_id = listing.owner_id;
        let stored = tables
            .users
            .get_mut(&owner_id)
            .ok_or_else(|| AppError::NotFound(format!("User {owner_id} not found")))?;
        match claim {
            PublishClaim::Quota { expected } => {
                if stored.ads_published != expected {
                    return Err(AppError::Conflict(
                        "listing counter changed concurrently, retry the publish".into(),
                    ));
                }
                stored.ads_published = next_counter(expected)?;
            }
            PublishClaim::Trial => {
                if stored.has_used_trial {
                    return Err(AppError::Conflict(
                        "the trial listing was claimed by another request".into(),
                    ));
                }
                stored.has_used_trial = true;
            }
        }

        tables.next_listing_id += 1;
        let listing = listing.into_listing(tables.next_listing_id);
        tables.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }
}
