pub mod common;
pub mod listing;
pub mod pagination;
pub mod plan;
pub mod search;
pub mod user;

pub use common::*;
pub use listing::*;
pub use pagination::*;
pub use plan::*;
pub use search::*;
pub use user::*;
