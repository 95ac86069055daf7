use crate::error::{AppError, AppResult};
use crate::models::{
    NewListing, Plan, PublishEligibility, PublishListingRequest, PublishListingResponse, User,
};
use crate::services::PlanCatalog;
use crate::store::{PublishClaim, SharedStore, next_counter};
use crate::utils::SharedClock;
use crate::utils::validation::{
    CATEGORY_MAX_LEN, CITY_MAX_LEN, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN, optional_text,
    required_text, validate_price,
};
use chrono::{DateTime, Duration, Utc};

#[derive(Clone)]
pub struct QuotaGate {
    store: SharedStore,
    catalog: PlanCatalog,
    clock: SharedClock,
    trial_duration: Duration,
}

impl QuotaGate {
    pub fn new(
        store: SharedStore,
        catalog: PlanCatalog,
        clock: SharedClock,
        trial_hours: u32,
    ) -> Self {
        Self {
            store,
            catalog,
            clock,
            trial_duration: Duration::hours(i64::from(trial_hours)),
        }
    }

    /// Compares the user's published count with the plan quota.
    pub fn evaluate(user: &User, plan: &Plan) -> PublishEligibility {
        let can_publish = plan.allows_publish(user.ads_published);
        let reason = (!can_publish).then(|| {
            format!(
                "Reached the {} plan limit ({}/{})",
                plan.display_name,
                user.ads_published,
                plan.posting_quota.unwrap_or_default()
            )
        });
        PublishEligibility {
            can_publish,
            plan: plan.id,
            plan_name: plan.display_name.clone(),
            ads_published: user.ads_published,
            posting_quota: plan.posting_quota,
            remaining: plan.remaining(user.ads_published),
            reason,
        }
    }

    async fn load_user(&self, user_id: i64) -> AppResult<User> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
    }

    pub async fn check_eligibility(&self, user_id: i64) -> AppResult<PublishEligibility> {
        let user = self.load_user(user_id).await?;
        let plan = self.catalog.require(user.plan)?;
        Ok(Self::evaluate(&user, plan))
    }

    /// Publishes a listing for `req.owner_id`.
    ///
    /// Regular publishes must pass the quota check and bump `ads_published`
    /// by one. A trial publish skips the quota, leaves the counter alone and
    /// consumes the owner's single trial.
    pub async fn publish(&self, req: PublishListingRequest) -> AppResult<PublishListingResponse> {
        let user = self.load_user(req.owner_id).await?;
        let plan = self.catalog.require(user.plan)?;
        let now = self.clock.now();
        let trial = req.trial;

        let (claim, ads_published, trial_ends_on) = if trial {
            if user.has_used_trial {
                return Err(AppError::ValidationError(
                    "the trial listing has already been used".into(),
                ));
            }
            let ends_on = now.checked_add_signed(self.trial_duration).ok_or_else(|| {
                AppError::ConfigError("trial duration overflows the calendar".into())
            })?;
            (PublishClaim::Trial, user.ads_published, Some(ends_on))
        } else {
            let eligibility = Self::evaluate(&user, plan);
            if !eligibility.can_publish {
                return Err(AppError::QuotaExceeded {
                    plan: plan.display_name.clone(),
                    published: user.ads_published,
                    quota: plan.posting_quota.unwrap_or_default(),
                });
            }
            let expected = user.ads_published;
            (
                PublishClaim::Quota { expected },
                next_counter(expected)?,
                None,
            )
        };

        let draft = build_listing(req, now, trial_ends_on)?;
        let listing = self.store.publish_listing(claim, draft).await?;

        log::info!(
            "User {} published listing {} on plan {} ({} published{})",
            user.id,
            listing.id,
            plan.id,
            ads_published,
            if trial { ", trial" } else { "" }
        );

        Ok(PublishListingResponse {
            listing,
            ads_published,
            remaining: plan.remaining(ads_published),
        })
    }
}

fn build_listing(
    req: PublishListingRequest,
    now: DateTime<Utc>,
    trial_ends_on: Option<DateTime<Utc>>,
) -> AppResult<NewListing> {
    Ok(NewListing {
        owner_id: req.owner_id,
        title: required_text("title", &req.title, TITLE_MAX_LEN)?,
        alt_title: optional_text(req.alt_title.as_deref(), TITLE_MAX_LEN),
        description: optional_text(req.description.as_deref(), DESCRIPTION_MAX_LEN),
        category: required_text("category", &req.category, CATEGORY_MAX_LEN)?.to_lowercase(),
        price_per_day: validate_price(req.price_per_day)?,
        currency: optional_text(req.currency.as_deref(), 8).unwrap_or_else(|| "EUR".into()),
        city: required_text("city", &req.city, CITY_MAX_LEN)?,
        country: optional_text(req.country.as_deref(), CITY_MAX_LEN),
        available: true,
        last_bump_time: now,
        trial_ends_on,
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PlanId;
    use crate::services::fixtures::{t0, user};
    use crate::store::{MarketplaceStore, MemoryStore};
    use crate::utils::ManualClock;
    use std::sync::Arc;

    fn gate(store: &MemoryStore) -> QuotaGate {
        QuotaGate::new(
            Arc::new(store.clone()),
            PlanCatalog::builtin(),
            Arc::new(ManualClock::new(t0())),
            72,
        )
    }

    fn request(owner_id: i64, title: &str) -> PublishListingRequest {
        PublishListingRequest {
            owner_id,
            title: title.into(),
            alt_title: None,
            description: Some("Perfect for weekend jobs".into()),
            category: "Tools".into(),
            price_per_day: 40,
            currency: None,
            city: "Sevilla".into(),
            country: Some("España".into()),
            trial: false,
        }
    }

    #[tokio::test]
    async fn test_publish_under_quota_increments_by_one() {
        let mut owner = user(1, PlanId::Bronze);
        owner.ads_published = 3;
        let store = MemoryStore::with_data(vec![owner], vec![]);

        let resp = gate(&store).publish(request(1, "Taladro")).await.unwrap();
        assert_eq!(resp.ads_published, 4);
        assert_eq!(resp.remaining, Some(1));
        assert_eq!(resp.listing.last_bump_time, t0());
        assert_eq!(resp.listing.category, "tools");
        assert_eq!(resp.listing.currency, "EUR");
        assert!(resp.listing.is_active);
        assert_eq!(store.find_user(1).await.unwrap().unwrap().ads_published, 4);
        assert_eq!(store.list_listings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_at_quota_rejected() {
        let mut owner = user(1, PlanId::Bronze);
        owner.ads_published = 5;
        let store = MemoryStore::with_data(vec![owner], vec![]);

        let err = gate(&store).publish(request(1, "Taladro")).await.unwrap_err();
        match err {
            AppError::QuotaExceeded {
                plan,
                published,
                quota,
            } => {
                assert_eq!(plan, "Bronze");
                assert_eq!(published, 5);
                assert_eq!(quota, 5);
            }
            other => panic!("expected quota error, got {other:?}"),
        }
        assert_eq!(store.find_user(1).await.unwrap().unwrap().ads_published, 5);
        assert!(store.list_listings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_free_plan_allows_exactly_one() {
        let store = MemoryStore::with_data(vec![user(1, PlanId::Free)], vec![]);
        let gate = gate(&store);
        assert!(gate.publish(request(1, "First")).await.is_ok());
        assert!(matches!(
            gate.publish(request(1, "Second")).await,
            Err(AppError::QuotaExceeded { .. })
        ));
    }

    #[tokio::test]
    async fn test_gold_is_unbounded() {
        let mut owner = user(1, PlanId::Gold);
        owner.ads_published = 10_000;
        let store = MemoryStore::with_data(vec![owner], vec![]);
        let resp = gate(&store).publish(request(1, "Tractor")).await.unwrap();
        assert_eq!(resp.ads_published, 10_001);
        assert_eq!(resp.remaining, None);
    }

    #[tokio::test]
    async fn test_trial_publish_bypasses_quota_once() {
        let mut owner = user(1, PlanId::Free);
        owner.ads_published = 1;
        let store = MemoryStore::with_data(vec![owner], vec![]);
        let gate = gate(&store);

        let mut req = request(1, "Mini elevador");
        req.trial = true;
        let resp = gate.publish(req).await.unwrap();
        assert_eq!(resp.ads_published, 1);
        assert_eq!(
            resp.listing.trial_ends_on,
            Some(t0() + Duration::hours(72))
        );
        assert!(store.find_user(1).await.unwrap().unwrap().has_used_trial);

        let mut again = request(1, "Another trial");
        again.trial = true;
        assert!(matches!(
            gate.publish(again).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_stale_regular_publish_keeps_trial_used() {
        let store = MemoryStore::with_data(vec![user(1, PlanId::Bronze)], vec![]);
        let gate = gate(&store);
        let snapshot = store.find_user(1).await.unwrap().unwrap();

        let mut trial = request(1, "Mini elevador");
        trial.trial = true;
        gate.publish(trial).await.unwrap();

        // a regular publish that read the user before the trial landed
        let draft = build_listing(request(1, "Taladro"), t0(), None).unwrap();
        store
            .publish_listing(
                PublishClaim::Quota {
                    expected: snapshot.ads_published,
                },
                draft,
            )
            .await
            .unwrap();

        let stored = store.find_user(1).await.unwrap().unwrap();
        assert!(stored.has_used_trial);
        assert_eq!(stored.ads_published, 1);

        let mut again = request(1, "Another trial");
        again.trial = true;
        assert!(gate.publish(again).await.is_err());
    }

    #[tokio::test]
    async fn test_publish_after_plan_change_keeps_new_plan() {
        let store = MemoryStore::with_data(vec![user(1, PlanId::Free)], vec![]);
        let snapshot = store.find_user(1).await.unwrap().unwrap();
        store.update_subscription(1, PlanId::Gold, t0()).await.unwrap();

        let draft = build_listing(request(1, "Tractor"), t0(), None).unwrap();
        store
            .publish_listing(
                PublishClaim::Quota {
                    expected: snapshot.ads_published,
                },
                draft,
            )
            .await
            .unwrap();

        let stored = store.find_user(1).await.unwrap().unwrap();
        assert_eq!(stored.plan, PlanId::Gold);
        assert_eq!(stored.ads_published, 1);
    }

    #[tokio::test]
    async fn test_trial_end_past_calendar_is_an_error() {
        let store = MemoryStore::with_data(vec![user(1, PlanId::Free)], vec![]);
        let gate = QuotaGate::new(
            Arc::new(store.clone()),
            PlanCatalog::builtin(),
            Arc::new(ManualClock::new(t0())),
            u32::MAX,
        );
        let mut req = request(1, "Velero");
        req.trial = true;
        assert!(matches!(
            gate.publish(req).await,
            Err(AppError::ConfigError(_))
        ));
        let stored = store.find_user(1).await.unwrap().unwrap();
        assert!(!stored.has_used_trial);
        assert!(store.list_listings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_listing_rejected_without_side_effects() {
        let store = MemoryStore::with_data(vec![user(1, PlanId::Silver)], vec![]);
        let mut req = request(1, "<>");
        req.price_per_day = 40;
        assert!(matches!(
            gate(&store).publish(req).await,
            Err(AppError::ValidationError(_))
        ));
        let mut pricey = request(1, "Yate");
        pricey.price_per_day = 50_000;
        assert!(gate(&store).publish(pricey).await.is_err());
        assert_eq!(store.find_user(1).await.unwrap().unwrap().ads_published, 0);
    }

    #[tokio::test]
    async fn test_unknown_owner() {
        let store = MemoryStore::new();
        assert!(matches!(
            gate(&store).publish(request(7, "Taladro")).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            gate(&store).check_eligibility(7).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_check_eligibility() {
        let mut owner = user(1, PlanId::Silver);
        owner.ads_published = 20;
        let store = MemoryStore::with_data(vec![owner, user(2, PlanId::Silver)], vec![]);
        let gate = gate(&store);

        let full = gate.check_eligibility(1).await.unwrap();
        assert!(!full.can_publish);
        assert_eq!(full.remaining, Some(0));
        assert!(full.reason.unwrap().contains("20/20"));

        let fresh = gate.check_eligibility(2).await.unwrap();
        assert!(fresh.can_publish);
        assert_eq!(fresh.remaining, Some(20));
        assert!(fresh.reason.is_none());
    }
}
