use crate::entities::PlanId;
use crate::error::{AppError, AppResult};
use crate::models::{CreateUserRequest, NewUser, User};
use crate::services::PlanCatalog;
use crate::store::SharedStore;
use crate::utils::SharedClock;
use crate::utils::validation::{CITY_MAX_LEN, NAME_MAX_LEN, required_text, validate_email};

#[derive(Clone)]
pub struct UserService {
    store: SharedStore,
    catalog: PlanCatalog,
    clock: SharedClock,
}

impl UserService {
    pub fn new(store: SharedStore, catalog: PlanCatalog, clock: SharedClock) -> Self {
        Self {
            store,
            catalog,
            clock,
        }
    }

    pub async fn register(&self, req: CreateUserRequest) -> AppResult<User> {
        let plan = req.plan.unwrap_or(PlanId::Free);
        if self.catalog.get(plan).is_none() {
            return Err(AppError::ValidationError(format!(
                "plan {plan} does not exist"
            )));
        }

        let new_user = NewUser {
            name: required_text("name", &req.name, NAME_MAX_LEN)?,
            email: validate_email(&req.email)?,
            city: required_text("city", &req.city, CITY_MAX_LEN)?,
            plan,
            created_at: self.clock.now(),
        };
        let user = self.store.insert_user(new_user).await?;
        log::info!("Registered user {} on plan {}", user.id, user.plan);
        Ok(user)
    }

    pub async fn get_user(&self, user_id: i64) -> AppResult<User> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::t0;
    use crate::store::MemoryStore;
    use crate::utils::ManualClock;
    use std::sync::Arc;

    fn service() -> UserService {
        UserService::new(
            Arc::new(MemoryStore::new()),
            PlanCatalog::builtin(),
            Arc::new(ManualClock::new(t0())),
        )
    }

    fn request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: " Ahmed Mohamed ".into(),
            email: email.into(),
            city: "Madrid".into(),
            plan: None,
        }
    }

    #[tokio::test]
    async fn test_register_defaults_to_free() {
        let service = service();
        let user = service.register(request("Ahmed@RH.com")).await.unwrap();
        assert_eq!(user.plan, PlanId::Free);
        assert_eq!(user.name, "Ahmed Mohamed");
        assert_eq!(user.email, "ahmed@rh.com");
        assert_eq!(user.created_at, t0());
        assert!(!user.has_used_trial);
        assert_eq!(service.get_user(user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let service = service();
        assert!(matches!(
            service.register(request("not-an-email")).await,
            Err(AppError::ValidationError(_))
        ));
        let mut nameless = request("x@rh.com");
        nameless.name = "   ".into();
        assert!(service.register(nameless).await.is_err());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = service();
        service.register(request("juan@rh.com")).await.unwrap();
        assert!(matches!(
            service.register(request("JUAN@rh.com")).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        assert!(matches!(
            service().get_user(3).await,
            Err(AppError::NotFound(_))
        ));
    }
}
