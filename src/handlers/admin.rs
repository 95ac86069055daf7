use crate::models::ApiResponse;
use crate::services::{BumpReport, BumpScheduler};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/admin/bumps/run",
    tag = "admin",
    responses(
        (status = 200, description = "Bump pass finished", body = BumpReport),
        (status = 500, description = "Pass aborted by a storage error")
    )
)]
pub async fn run_bumps(bump_scheduler: web::Data<BumpScheduler>) -> Result<HttpResponse> {
    match bump_scheduler.run_pass().await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            report,
            "Bump pass finished",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/admin").route("/bumps/run", web::post().to(run_bumps)));
}
