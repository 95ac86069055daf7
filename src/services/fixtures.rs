//! Builders shared by service and handler tests.

use crate::entities::PlanId;
use crate::models::{Listing, User};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Fixed reference instant all tests measure from.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
}

pub fn hours_ago(h: i64) -> DateTime<Utc> {
    t0() - Duration::hours(h)
}

pub fn user(id: i64, plan: PlanId) -> User {
    User {
        id,
        name: format!("Owner {id}"),
        email: format!("owner{id}@rh.com"),
        city: "Madrid".into(),
        plan,
        has_used_trial: false,
        ads_published: 0,
        subscribed_at: None,
        created_at: hours_ago(24 * 30),
    }
}

pub fn listing(id: i64, owner_id: i64, title: &str, last_bump_time: DateTime<Utc>) -> Listing {
    Listing {
        id,
        owner_id,
        title: title.into(),
        alt_title: None,
        description: None,
        category: "tools".into(),
        price_per_day: 15,
        currency: "EUR".into(),
        city: "Madrid".into(),
        country: Some("España".into()),
        available: true,
        is_active: true,
        last_bump_time,
        trial_ends_on: None,
        created_at: hours_ago(24 * 7),
    }
}
