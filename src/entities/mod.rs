pub mod listings;
pub mod users;

pub use listings as listing_entity;
pub use users as user_entity;
pub use users::PlanId;
