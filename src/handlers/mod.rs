pub mod admin;
pub mod listings;
pub mod plans;
pub mod users;

pub use admin::admin_config;
pub use listings::listing_config;
pub use plans::plan_config;
pub use users::user_config;

use actix_web::web;

/// Every route served under the versioned API prefix.
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(plan_config)
        .configure(user_config)
        .configure(listing_config)
        .configure(admin_config);
}
