use crate::error::{AppError, AppResult};
use crate::models::{Listing, PaginatedResponse, PaginationParams, SearchQuery};
use crate::store::SharedStore;
use crate::utils::validation::clamp_price;

/// Normalized search filters; text is trimmed and lowercased once up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub query: String,
    pub city: String,
    pub category: Option<String>,
    pub max_price: Option<i64>,
}

fn normalize(text: Option<&str>) -> String {
    text.map(|t| t.trim().to_lowercase()).unwrap_or_default()
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl SearchCriteria {
    pub fn new(query: &str, city: &str) -> Self {
        Self {
            query: normalize(Some(query)),
            city: normalize(Some(city)),
            ..Default::default()
        }
    }

    pub fn from_query(q: &SearchQuery) -> Self {
        Self {
            query: normalize(q.q.as_deref()),
            city: normalize(q.city.as_deref()),
            category: Some(normalize(q.category.as_deref())).filter(|c| !c.is_empty()),
            max_price: q.max_price.map(clamp_price),
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        if !listing.is_visible() {
            return false;
        }

        let matches_query = self.query.is_empty()
            || contains(&listing.title, &self.query)
            || listing
                .alt_title
                .as_deref()
                .is_some_and(|t| contains(t, &self.query))
            || contains(&listing.category, &self.query);
        let matches_city = self.city.is_empty() || contains(&listing.city, &self.city);
        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|c| listing.category.to_lowercase() == c);
        let matches_price = self
            .max_price
            .is_none_or(|max| listing.price_per_day <= max);

        matches_query && matches_city && matches_category && matches_price
    }
}

/// Keeps matching listings and orders them by most recent bump first.
/// `sort_by` is stable, so equal timestamps keep their incoming order.
pub fn rank(listings: Vec<Listing>, criteria: &SearchCriteria) -> Vec<Listing> {
    let mut results: Vec<Listing> = listings
        .into_iter()
        .filter(|l| criteria.matches(l))
        .collect();
    results.sort_by(|a, b| b.last_bump_time.cmp(&a.last_bump_time));
    results
}

#[derive(Clone)]
pub struct SearchRanker {
    store: SharedStore,
}

impl SearchRanker {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Ranked matches. Paging applies only when `page` or `per_page` is given.
    pub async fn search(&self, query: &SearchQuery) -> AppResult<PaginatedResponse<Listing>> {
        let criteria = SearchCriteria::from_query(query);
        let ranked = rank(self.store.list_listings().await?, &criteria);
        if query.page.is_none() && query.per_page.is_none() {
            let total = ranked.len() as i64;
            return Ok(PaginatedResponse::new(ranked, 1, total.max(1), total));
        }
        let params = PaginationParams::new(query.page, query.per_page);
        Ok(params.paginate(ranked))
    }

    pub async fn get_listing(&self, id: i64) -> AppResult<Listing> {
        self.store
            .find_listing(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Listing {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{hours_ago, listing};
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn catalogue() -> Vec<Listing> {
        let mut tractor = listing(1, 1, "Tractor John Deere", hours_ago(2));
        tractor.alt_title = Some("Tractor Agrícola".into());
        tractor.category = "heavy".into();
        tractor.price_per_day = 250;

        let mut drill = listing(2, 2, "Taladro Bosch GSB 18V", hours_ago(25));
        drill.city = "Barcelona".into();

        let mut tesla = listing(3, 3, "Tesla Model 3", hours_ago(1));
        tesla.category = "car".into();
        tesla.city = "Valencia".into();
        tesla.price_per_day = 80;

        let mut tent = listing(4, 4, "Carpa para eventos", hours_ago(10));
        tent.category = "events".into();
        tent.city = "Sevilla".into();
        tent.available = false;

        let mut expired = listing(5, 4, "Mini elevador", hours_ago(0));
        expired.city = "Sevilla".into();
        expired.is_active = false;

        vec![tractor, drill, tesla, tent, expired]
    }

    fn ids(listings: &[Listing]) -> Vec<i64> {
        listings.iter().map(|l| l.id).collect()
    }

    #[test]
    fn test_empty_search_orders_by_last_bump() {
        let results = rank(catalogue(), &SearchCriteria::new("", ""));
        assert_eq!(ids(&results), vec![3, 1, 2]);
    }

    #[test]
    fn test_hidden_listings_never_returned() {
        let results = rank(catalogue(), &SearchCriteria::new("", "sevilla"));
        assert!(results.is_empty());
    }

    #[test]
    fn test_query_is_case_insensitive_and_trimmed() {
        let results = rank(catalogue(), &SearchCriteria::new("  TESLA ", ""));
        assert_eq!(ids(&results), vec![3]);
    }

    #[test]
    fn test_query_matches_alt_title_and_category() {
        assert_eq!(
            ids(&rank(catalogue(), &SearchCriteria::new("agrícola", ""))),
            vec![1]
        );
        assert_eq!(
            ids(&rank(catalogue(), &SearchCriteria::new("tools", ""))),
            vec![2]
        );
    }

    #[test]
    fn test_city_substring() {
        let results = rank(catalogue(), &SearchCriteria::new("", "barce"));
        assert_eq!(ids(&results), vec![2]);
    }

    #[test]
    fn test_ties_keep_store_order() {
        let same = hours_ago(3);
        let listings = vec![
            listing(1, 1, "A", same),
            listing(2, 1, "B", hours_ago(1)),
            listing(3, 1, "C", same),
            listing(4, 1, "D", same),
        ];
        let results = rank(listings, &SearchCriteria::default());
        assert_eq!(ids(&results), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_category_and_price_filters() {
        let criteria = SearchCriteria::from_query(&SearchQuery {
            category: Some(" CAR ".into()),
            max_price: Some(100),
            ..Default::default()
        });
        assert_eq!(ids(&rank(catalogue(), &criteria)), vec![3]);

        let cheap = SearchCriteria::from_query(&SearchQuery {
            max_price: Some(-20),
            ..Default::default()
        });
        assert_eq!(cheap.max_price, Some(0));
        assert!(rank(catalogue(), &cheap).is_empty());
    }

    #[tokio::test]
    async fn test_search_paginates_ranked_results() {
        let store = MemoryStore::with_data(vec![], catalogue());
        let ranker = SearchRanker::new(Arc::new(store));
        let page = ranker
            .search(&SearchQuery {
                page: Some(2),
                per_page: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(ids(&page.data), vec![2]);
    }

    #[tokio::test]
    async fn test_unpaged_search_returns_every_match() {
        let listings = (1..=30)
            .map(|id| listing(id, 1, &format!("Bicicleta {id}"), hours_ago(id)))
            .collect();
        let ranker = SearchRanker::new(Arc::new(MemoryStore::with_data(vec![], listings)));

        let all = ranker.search(&SearchQuery::default()).await.unwrap();
        assert_eq!(all.data.len(), 30);
        assert_eq!(all.total, 30);
        assert_eq!(all.total_pages, 1);
        assert_eq!(all.data.first().map(|l| l.id), Some(1));
        assert_eq!(all.data.last().map(|l| l.id), Some(30));

        let first = ranker
            .search(&SearchQuery {
                page: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(first.data.len(), 20);
        assert_eq!(first.total_pages, 2);
    }

    #[tokio::test]
    async fn test_get_listing() {
        let ranker = SearchRanker::new(Arc::new(MemoryStore::with_data(vec![], catalogue())));
        // lookups by id are not filtered by visibility
        assert_eq!(ranker.get_listing(5).await.unwrap().title, "Mini elevador");
        assert!(matches!(
            ranker.get_listing(42).await,
            Err(AppError::NotFound(_))
        ));
    }
}
