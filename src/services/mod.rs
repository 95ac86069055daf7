pub mod bump_scheduler;
pub mod plan_catalog;
pub mod quota_gate;
pub mod search_ranker;
pub mod subscription_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod fixtures;

pub use bump_scheduler::*;
pub use plan_catalog::*;
pub use quota_gate::*;
pub use search_ranker::*;
pub use subscription_service::*;
pub use user_service::*;
