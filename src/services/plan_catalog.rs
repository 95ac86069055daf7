use crate::entities::PlanId;
use crate::error::{AppError, AppResult};
use crate::models::Plan;
use std::collections::HashSet;
use std::sync::Arc;

/// Immutable table of subscription tiers, loaded once at startup.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Arc<Vec<Plan>>,
}

fn features(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl PlanCatalog {
    /// Free, Bronze, Silver and Gold with their default quotas and bump cadence.
    pub fn builtin() -> Self {
        let plans = vec![
            Plan {
                id: PlanId::Free,
                display_name: "Free".into(),
                price_cents: 0,
                posting_quota: Some(1),
                bump_interval_hours: None,
                features: features(&["One listing", "Email support"]),
                color: "#6c757d".into(),
                icon: "🆓".into(),
            },
            Plan {
                id: PlanId::Bronze,
                display_name: "Bronze".into(),
                price_cents: 500,
                posting_quota: Some(5),
                bump_interval_hours: Some(24),
                features: features(&["Up to 5 listings", "Daily bump", "Email support"]),
                color: "#cd7f32".into(),
                icon: "🥉".into(),
            },
            Plan {
                id: PlanId::Silver,
                display_name: "Silver".into(),
                price_cents: 1500,
                posting_quota: Some(20),
                bump_interval_hours: Some(12),
                features: features(&[
                    "Up to 20 listings",
                    "Bump every 12 hours",
                    "Basic view reports",
                ]),
                color: "#c0c0c0".into(),
                icon: "🥈".into(),
            },
            Plan {
                id: PlanId::Gold,
                display_name: "Gold".into(),
                price_cents: 3000,
                posting_quota: None,
                bump_interval_hours: Some(1),
                features: features(&[
                    "Unlimited listings",
                    "Hourly bump",
                    "Featured on the home page",
                    "Phone support",
                ]),
                color: "#ffd700".into(),
                icon: "🥇".into(),
            },
        ];
        Self {
            plans: Arc::new(plans),
        }
    }

    /// Builds a catalog from configuration. Each tier may appear once and the
    /// free tier must exist since new users start on it.
    pub fn from_plans(plans: Vec<Plan>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for plan in &plans {
            if !seen.insert(plan.id) {
                return Err(AppError::ConfigError(format!(
                    "plan {} is defined more than once",
                    plan.id
                )));
            }
            if plan.price_cents < 0 {
                return Err(AppError::ConfigError(format!(
                    "plan {} has a negative price",
                    plan.id
                )));
            }
        }
        if !seen.contains(&PlanId::Free) {
            return Err(AppError::ConfigError(
                "plan catalog must include the free tier".into(),
            ));
        }
        Ok(Self {
            plans: Arc::new(plans),
        })
    }

    pub fn get(&self, id: PlanId) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == id)
    }

    /// Like [`get`](Self::get) but for code paths where a missing tier is a
    /// deployment mistake rather than a data problem.
    pub fn require(&self, id: PlanId) -> AppResult<&Plan> {
        self.get(id)
            .ok_or_else(|| AppError::ConfigError(format!("plan {id} is not in the catalog")))
    }

    pub fn all(&self) -> &[Plan] {
        &self.plans
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = PlanCatalog::builtin();
        assert_eq!(catalog.all().len(), 4);
        assert_eq!(catalog.get(PlanId::Free).unwrap().posting_quota, Some(1));
        assert_eq!(catalog.get(PlanId::Bronze).unwrap().posting_quota, Some(5));
        assert_eq!(catalog.get(PlanId::Silver).unwrap().posting_quota, Some(20));
        let gold = catalog.get(PlanId::Gold).unwrap();
        assert!(gold.is_unbounded());
        assert_eq!(gold.bump_interval_hours, Some(1));
    }

    #[test]
    fn test_from_plans_rejects_duplicates() {
        let free = PlanCatalog::builtin().get(PlanId::Free).cloned().unwrap();
        let err = PlanCatalog::from_plans(vec![free.clone(), free]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_from_plans_requires_free() {
        let gold = PlanCatalog::builtin().get(PlanId::Gold).cloned().unwrap();
        assert!(PlanCatalog::from_plans(vec![gold]).is_err());
    }

    #[test]
    fn test_require_missing_plan() {
        let free = PlanCatalog::builtin().get(PlanId::Free).cloned().unwrap();
        let catalog = PlanCatalog::from_plans(vec![free]).unwrap();
        assert!(catalog.get(PlanId::Silver).is_none());
        assert!(matches!(
            catalog.require(PlanId::Silver),
            Err(AppError::ConfigError(_))
        ));
    }
}
