use crate::models::*;
use crate::services::{QuotaGate, SearchRanker};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/listings",
    tag = "listings",
    params(SearchQuery),
    responses(
        (status = 200, description = "Visible listings, most recently bumped first")
    )
)]
pub async fn search_listings(
    search_ranker: web::Data<SearchRanker>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    match search_ranker.search(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/listings/{id}",
    tag = "listings",
    params(("id" = i64, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing", body = Listing),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get_listing(
    search_ranker: web::Data<SearchRanker>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match search_ranker.get_listing(path.into_inner()).await {
        Ok(listing) => Ok(HttpResponse::Ok().json(ApiResponse::success(listing))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/listings",
    tag = "listings",
    request_body = PublishListingRequest,
    responses(
        (status = 201, description = "Listing published", body = PublishListingResponse),
        (status = 400, description = "Invalid listing or trial already used"),
        (status = 403, description = "Plan quota exceeded"),
        (status = 404, description = "Owner not found"),
        (status = 409, description = "Concurrent publish, retry")
    )
)]
pub async fn publish_listing(
    quota_gate: web::Data<QuotaGate>,
    request: web::Json<PublishListingRequest>,
) -> Result<HttpResponse> {
    match quota_gate.publish(request.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Created().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn listing_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/listings")
            .route("", web::get().to(search_listings))
            .route("", web::post().to(publish_listing))
            .route("/{id}", web::get().to(get_listing)),
    );
}
