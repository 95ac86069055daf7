use crate::models::*;
use crate::services::{QuotaGate, SubscriptionService, UserService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    user_service: web::Data<UserService>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse> {
    match user_service.register(request.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Created().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User record", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match user_service.get_user(path.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}/subscription",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Current plan and usage", body = PlanUsageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_subscription(
    subscription_service: web::Data<SubscriptionService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match subscription_service.plan_info(path.into_inner()).await {
        Ok(info) => Ok(HttpResponse::Ok().json(ApiResponse::success(info))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/users/{id}/subscription",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = ChangePlanRequest,
    responses(
        (status = 200, description = "Plan changed", body = PlanUsageResponse),
        (status = 400, description = "Unknown plan or already on it"),
        (status = 404, description = "User not found")
    )
)]
pub async fn change_subscription(
    subscription_service: web::Data<SubscriptionService>,
    path: web::Path<i64>,
    request: web::Json<ChangePlanRequest>,
) -> Result<HttpResponse> {
    match subscription_service
        .change_plan(path.into_inner(), request.into_inner())
        .await
    {
        Ok(info) => Ok(HttpResponse::Ok().json(ApiResponse::success(info))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}/eligibility",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Whether the user may publish another listing", body = PublishEligibility),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_eligibility(
    quota_gate: web::Data<QuotaGate>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match quota_gate.check_eligibility(path.into_inner()).await {
        Ok(eligibility) => Ok(HttpResponse::Ok().json(ApiResponse::success(eligibility))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(create_user))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}/subscription", web::get().to(get_subscription))
            .route("/{id}/subscription", web::post().to(change_subscription))
            .route("/{id}/eligibility", web::get().to(get_eligibility)),
    );
}
