use crate::error::AppResult;
use crate::models::{Listing, ListingRanking, Plan};
use crate::services::PlanCatalog;
use crate::store::SharedStore;
use crate::utils::SharedClock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// What one pass did to one listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpOutcome {
    Unchanged,
    Expired(ListingRanking),
    Bumped(ListingRanking),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BumpReport {
    pub scanned: u64,
    pub expired: u64,
    pub bumped: u64,
}

impl BumpReport {
    pub fn changed(&self) -> bool {
        self.expired > 0 || self.bumped > 0
    }
}

/// Decides the fate of a single listing at `now`.
///
/// Trial expiry is checked first and ends processing for the listing. A
/// listing without a known plan, or whose plan has no bump cadence, is left
/// alone.
pub fn evaluate(listing: &Listing, plan: Option<&Plan>, now: DateTime<Utc>) -> BumpOutcome {
    if !listing.is_active {
        return BumpOutcome::Unchanged;
    }

    if let Some(trial_ends_on) = listing.trial_ends_on
        && now >= trial_ends_on
    {
        return BumpOutcome::Expired(ListingRanking {
            is_active: false,
            last_bump_time: listing.last_bump_time,
            trial_ends_on: None,
        });
    }

    let Some(interval) = plan.and_then(Plan::bump_interval) else {
        return BumpOutcome::Unchanged;
    };
    match listing.last_bump_time.checked_add_signed(interval) {
        Some(due) if now >= due => BumpOutcome::Bumped(ListingRanking {
            is_active: true,
            last_bump_time: now,
            trial_ends_on: listing.trial_ends_on,
        }),
        _ => BumpOutcome::Unchanged,
    }
}

#[derive(Clone)]
pub struct BumpScheduler {
    store: SharedStore,
    catalog: PlanCatalog,
    clock: SharedClock,
}

impl BumpScheduler {
    pub fn new(store: SharedStore, catalog: PlanCatalog, clock: SharedClock) -> Self {
        Self {
            store,
            catalog,
            clock,
        }
    }

    /// Runs one pass over every listing: expires elapsed trials and refreshes
    /// `last_bump_time` where the owner's plan cadence has elapsed.
    pub async fn run_pass(&self) -> AppResult<BumpReport> {
        let now = self.clock.now();
        let owners: HashMap<i64, _> = self
            .store
            .list_users()
            .await?
            .into_iter()
            .map(|u| (u.id, u.plan))
            .collect();

        let mut report = BumpReport::default();
        for listing in self.store.list_listings().await? {
            report.scanned += 1;
            let plan = owners
                .get(&listing.owner_id)
                .and_then(|plan_id| self.catalog.get(*plan_id));

            match evaluate(&listing, plan, now) {
                BumpOutcome::Unchanged => {}
                BumpOutcome::Expired(ranking) => {
                    log::debug!("Trial listing {} expired", listing.id);
                    self.store.update_listing_ranking(listing.id, ranking).await?;
                    report.expired += 1;
                }
                BumpOutcome::Bumped(ranking) => {
                    self.store.update_listing_ranking(listing.id, ranking).await?;
                    report.bumped += 1;
                }
            }
        }
        Ok(report)
    }
}
