//! Persistence boundary for users and listings.
//!
//! Services never touch a database handle directly; they receive a
//! [`SharedStore`] and go through [`MarketplaceStore`]. Two backends exist:
//! PostgreSQL through sea-orm ([`DatabaseStore`]) and a process-local
//! [`MemoryStore`] used for tests and database-less deployments.

pub mod database;
pub mod memory;

pub use database::DatabaseStore;
pub use memory::MemoryStore;

use crate::entities::PlanId;
use crate::error::{AppError, AppResult};
use crate::models::{Listing, ListingRanking, NewListing, NewUser, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// What a publish consumes from its owner's allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishClaim {
    /// Counts against the plan quota. `expected` is the `ads_published`
    /// value the quota check was made against; the store writes
    /// `expected + 1`.
    Quota { expected: u32 },
    /// Uses the owner's single trial; `has_used_trial` must still be false.
    Trial,
}

#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    /// All listings in insertion (id) order.
    async fn list_listings(&self) -> AppResult<Vec<Listing>>;

    async fn find_listing(&self, id: i64) -> AppResult<Option<Listing>>;

    /// Writes the scheduler-owned fields of one listing. Unknown ids are ignored.
    async fn update_listing_ranking(&self, id: i64, ranking: ListingRanking) -> AppResult<()>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    async fn find_user(&self, id: i64) -> AppResult<Option<User>>;

    async fn insert_user(&self, user: NewUser) -> AppResult<User>;

    /// Moves a user to `plan` and restarts `ads_published` from zero.
    /// The trial flag is left untouched.
    async fn update_subscription(
        &self,
        user_id: i64,
        plan: PlanId,
        subscribed_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Applies `claim` to the listing's owner and inserts the listing as one
    /// unit. Only the claimed field is written, so concurrent plan changes
    /// survive.
    ///
    /// Fails with `AppError::Conflict` when the claim no longer holds: the
    /// stored counter moved away from `expected`, or the trial was already
    /// taken by another request.
    async fn publish_listing(
        &self,
        claim: PublishClaim,
        listing: NewListing,
    ) -> AppResult<Listing>;
}

pub type SharedStore = Arc<dyn MarketplaceStore>;

/// Counter value after one more quota-counted publish.
pub(crate) fn next_counter(expected: u32) -> AppResult<u32> {
    expected
        .checked_add(1)
        .ok_or_else(|| AppError::InternalError("listing counter overflow".into()))
}
