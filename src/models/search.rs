use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Free text matched against title, alternate title and category
    pub q: Option<String>,
    /// Substring of the listing city
    pub city: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// Upper bound on price per day
    pub max_price: Option<i64>,
    /// Page number, starting at 1. Without `page` and `per_page` every
    /// match is returned on a single page.
    pub page: Option<u32>,
    /// Results per page (1-100, default 20 once paging is requested)
    pub per_page: Option<u32>,
}
