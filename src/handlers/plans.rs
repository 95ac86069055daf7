use crate::entities::PlanId;
use crate::error::AppError;
use crate::models::*;
use crate::services::SubscriptionService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/plans",
    tag = "plans",
    responses(
        (status = 200, description = "Subscription catalog", body = Vec<Plan>)
    )
)]
pub async fn list_plans(subscription_service: web::Data<SubscriptionService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(subscription_service.list_plans())))
}

#[utoipa::path(
    get,
    path = "/plans/{plan_id}",
    tag = "plans",
    params(
        ("plan_id" = String, Path, description = "free, bronze, silver or gold")
    ),
    responses(
        (status = 200, description = "Plan details", body = Plan),
        (status = 400, description = "Unknown plan identifier"),
        (status = 404, description = "Plan not offered")
    )
)]
pub async fn get_plan(
    subscription_service: web::Data<SubscriptionService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let plan_id = match path.parse::<PlanId>() {
        Ok(id) => id,
        Err(msg) => return Ok(AppError::ValidationError(msg).error_response()),
    };
    match subscription_service.get_plan(plan_id) {
        Ok(plan) => Ok(HttpResponse::Ok().json(ApiResponse::success(plan))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn plan_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/plans")
            .route("", web::get().to(list_plans))
            .route("/{plan_id}", web::get().to(get_plan)),
    );
}
