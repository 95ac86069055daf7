use crate::entities::PlanId;
use crate::error::{AppError, AppResult};
use crate::models::{ChangePlanRequest, Plan, PlanUsageResponse, User};
use crate::services::PlanCatalog;
use crate::store::SharedStore;
use crate::utils::SharedClock;

#[derive(Clone)]
pub struct SubscriptionService {
    store: SharedStore,
    catalog: PlanCatalog,
    clock: SharedClock,
}

impl SubscriptionService {
    pub fn new(store: SharedStore, catalog: PlanCatalog, clock: SharedClock) -> Self {
        Self {
            store,
            catalog,
            clock,
        }
    }

    pub fn list_plans(&self) -> Vec<Plan> {
        self.catalog.all().to_vec()
    }

    pub fn get_plan(&self, plan_id: PlanId) -> AppResult<Plan> {
        self.catalog
            .get(plan_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Plan {plan_id} not found")))
    }

    pub fn usage(user: &User, plan: &Plan) -> PlanUsageResponse {
        let usage_percentage = match plan.posting_quota {
            Some(0) => 100.0,
            Some(quota) => (f64::from(user.ads_published) / f64::from(quota) * 100.0).min(100.0),
            None => 0.0,
        };
        PlanUsageResponse {
            plan: plan.clone(),
            ads_used: user.ads_published,
            ads_remaining: plan.remaining(user.ads_published),
            usage_percentage,
        }
    }

    async fn load_user(&self, user_id: i64) -> AppResult<User> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
    }

    pub async fn plan_info(&self, user_id: i64) -> AppResult<PlanUsageResponse> {
        let user = self.load_user(user_id).await?;
        let plan = self.catalog.require(user.plan)?;
        Ok(Self::usage(&user, plan))
    }

    /// Moves the user to another plan. The published counter restarts from
    /// zero under the new plan.
    pub async fn change_plan(
        &self,
        user_id: i64,
        req: ChangePlanRequest,
    ) -> AppResult<PlanUsageResponse> {
        let mut user = self.load_user(user_id).await?;
        let new_plan = self
            .catalog
            .get(req.plan)
            .ok_or_else(|| AppError::ValidationError(format!("plan {} does not exist", req.plan)))?;
        if user.plan == new_plan.id {
            return Err(AppError::ValidationError(format!(
                "user is already on the {} plan",
                new_plan.display_name
            )));
        }

        let old_plan = user.plan;
        let now = self.clock.now();
        self.store.update_subscription(user_id, new_plan.id, now).await?;
        user.plan = new_plan.id;
        user.subscribed_at = Some(now);
        user.ads_published = 0;

        log::info!("User {user_id} moved from plan {old_plan} to {}", new_plan.id);
        Ok(Self::usage(&user, new_plan))
    }
}
