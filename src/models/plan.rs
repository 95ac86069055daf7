use crate::entities::PlanId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A subscription tier as offered in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Plan {
    pub id: PlanId,
    pub display_name: String,
    /// Monthly price in cents
    pub price_cents: i64,
    /// Maximum simultaneously published listings; `None` means unbounded
    pub posting_quota: Option<u32>,
    /// Hours between automatic bumps; `None` means listings are never re-bumped
    pub bump_interval_hours: Option<u32>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

impl Plan {
    pub fn is_unbounded(&self) -> bool {
        self.posting_quota.is_none()
    }

    pub fn allows_publish(&self, ads_published: u32) -> bool {
        match self.posting_quota {
            Some(quota) => ads_published < quota,
            None => true,
        }
    }

    pub fn remaining(&self, ads_published: u32) -> Option<u32> {
        self.posting_quota
            .map(|quota| quota.saturating_sub(ads_published))
    }

    pub fn bump_interval(&self) -> Option<chrono::Duration> {
        self.bump_interval_hours
            .map(|h| chrono::Duration::hours(i64::from(h)))
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlanUsageResponse {
    pub plan: Plan,
    pub ads_used: u32,
    pub ads_remaining: Option<u32>,
    pub usage_percentage: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChangePlanRequest {
    #[schema(example = "silver")]
    pub plan: PlanId,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublishEligibility {
    pub can_publish: bool,
    pub plan: PlanId,
    pub plan_name: String,
    pub ads_published: u32,
    pub posting_quota: Option<u32>,
    pub remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(quota: Option<u32>) -> Plan {
        Plan {
            id: PlanId::Bronze,
            display_name: "Bronze".into(),
            price_cents: 500,
            posting_quota: quota,
            bump_interval_hours: Some(24),
            features: vec![],
            color: String::new(),
            icon: String::new(),
        }
    }

    #[test]
    fn test_limited_quota() {
        let p = plan(Some(5));
        assert!(p.allows_publish(4));
        assert!(!p.allows_publish(5));
        assert!(!p.allows_publish(6));
        assert_eq!(p.remaining(3), Some(2));
        assert_eq!(p.remaining(9), Some(0));
    }

    #[test]
    fn test_unbounded_quota() {
        let p = plan(None);
        assert!(p.is_unbounded());
        assert!(p.allows_publish(u32::MAX));
        assert_eq!(p.remaining(1000), None);
    }

    #[test]
    fn test_bump_interval() {
        assert_eq!(plan(None).bump_interval(), Some(chrono::Duration::hours(24)));
    }
}
