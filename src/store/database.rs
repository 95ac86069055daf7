use super::{MarketplaceStore, PublishClaim, next_counter};
use crate::entities::{PlanId, listing_entity as listings, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::{Listing, ListingRanking, NewListing, NewUser, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct DatabaseStore {
    pool: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

fn counter(value: u32) -> AppResult<i32> {
    i32::try_from(value)
        .map_err(|_| AppError::ValidationError("listing counter out of range".into()))
}

#[async_trait]
impl MarketplaceStore for DatabaseStore {
    async fn list_listings(&self) -> AppResult<Vec<Listing>> {
        let models = listings::Entity::find()
            .order_by_asc(listings::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_listing(&self, id: i64) -> AppResult<Option<Listing>> {
        Ok(listings::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .map(Into::into))
    }

    async fn update_listing_ranking(&self, id: i64, ranking: ListingRanking) -> AppResult<()> {
        listings::Entity::update_many()
            .col_expr(listings::Column::IsActive, Expr::value(ranking.is_active))
            .col_expr(
                listings::Column::LastBumpTime,
                Expr::value(ranking.last_bump_time),
            )
            .col_expr(
                listings::Column::TrialEndsOn,
                Expr::value(ranking.trial_ends_on),
            )
            .filter(listings::Column::Id.eq(id))
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_user(&self, id: i64) -> AppResult<Option<User>> {
        Ok(users::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .map(Into::into))
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let taken = users::Entity::find()
            .filter(users::Column::Email.eq(user.email.clone()))
            .one(&self.pool)
            .await?
            .is_some();
        if taken {
            return Err(AppError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }

        let model = users::ActiveModel {
            name: Set(user.name),
            email: Set(user.email),
            city: Set(user.city),
            plan: Set(user.plan),
            has_used_trial: Set(false),
            ads_published: Set(0),
            subscribed_at: Set(None),
            created_at: Set(user.created_at),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(model.into())
    }

    async fn update_subscription(
        &self,
        user_id: i64,
        plan: PlanId,
        subscribed_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let res = users::Entity::update_many()
            .col_expr(users::Column::Plan, plan.as_enum())
            .col_expr(users::Column::SubscribedAt, Expr::value(Some(subscribed_at)))
            .col_expr(users::Column::AdsPublished, Expr::value(0))
            .filter(users::Column::Id.eq(user_id))
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("User {user_id} not found")));
        }
        Ok(())
    }

    async fn publish_listing(
        &self,
        claim: PublishClaim,
        listing: NewListing,
    ) -> AppResult<Listing> {
        let txn = self.pool.begin().await?;

        // 乐观更新：只写入本次占用的字段，并以读取时的值作为条件
        let update = users::Entity::update_many().filter(users::Column::Id.eq(listing.owner_id));
        let (update, conflict) = match claim {
            PublishClaim::Quota { expected } => (
                update
                    .col_expr(
                        users::Column::AdsPublished,
                        Expr::value(counter(next_counter(expected)?)?),
                    )
                    .filter(users::Column::AdsPublished.eq(counter(expected)?)),
                "listing counter changed concurrently, retry the publish",
            ),
            PublishClaim::Trial => (
                update
                    .col_expr(users::Column::HasUsedTrial, Expr::value(true))
                    .filter(users::Column::HasUsedTrial.eq(false)),
                "the trial listing was claimed by another request",
            ),
        };
        let res = update.exec(&txn).await?;
        if res.rows_affected == 0 {
            txn.rollback().await?;
            let exists = users::Entity::find_by_id(listing.owner_id)
                .one(&self.pool)
                .await?
                .is_some();
            return Err(if exists {
                AppError::Conflict(conflict.into())
            } else {
                AppError::NotFound(format!("User {} not found", listing.owner_id))
            });
        }

        let model = listings::ActiveModel {
            owner_id: Set(listing.owner_id),
            title: Set(listing.title),
            alt_title: Set(listing.alt_title),
            description: Set(listing.description),
            category: Set(listing.category),
            price_per_day: Set(listing.price_per_day),
            currency: Set(listing.currency),
            city: Set(listing.city),
            country: Set(listing.country),
            available: Set(listing.available),
            is_active: Set(true),
            last_bump_time: Set(listing.last_bump_time),
            trial_ends_on: Set(listing.trial_ends_on),
            created_at: Set(listing.created_at),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(model.into())
    }
}
