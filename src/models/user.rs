use crate::entities::{PlanId, user_entity as users};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub city: String,
    pub plan: PlanId,
    pub has_used_trial: bool,
    pub ads_published: u32,
    pub subscribed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(m: users::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            city: m.city,
            plan: m.plan,
            has_used_trial: m.has_used_trial,
            ads_published: u32::try_from(m.ads_published).unwrap_or(0),
            subscribed_at: m.subscribed_at,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub city: String,
    pub plan: PlanId,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            city: self.city,
            plan: self.plan,
            has_used_trial: false,
            ads_published: 0,
            subscribed_at: None,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Carlos García")]
    pub name: String,
    #[schema(example = "carlos@rh.com")]
    pub email: String,
    #[schema(example = "Barcelona")]
    pub city: String,
    pub plan: Option<PlanId>,
}
