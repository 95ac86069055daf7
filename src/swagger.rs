use actix_web::web;
use utoipa::OpenApi;

use crate::entities::PlanId;
use crate::handlers;
use crate::models::*;
use crate::services::BumpReport;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::plans::list_plans,
        handlers::plans::get_plan,
        handlers::users::create_user,
        handlers::users::get_user,
        handlers::users::get_subscription,
        handlers::users::change_subscription,
        handlers::users::get_eligibility,
        handlers::listings::search_listings,
        handlers::listings::get_listing,
        handlers::listings::publish_listing,
        handlers::admin::run_bumps,
    ),
    components(
        schemas(
            PlanId,
            Plan,
            PlanUsageResponse,
            ChangePlanRequest,
            PublishEligibility,
            User,
            CreateUserRequest,
            Listing,
            PublishListingRequest,
            PublishListingResponse,
            BumpReport,
            ApiError,
        )
    ),
    tags(
        (name = "plans", description = "Subscription catalog API"),
        (name = "users", description = "User and subscription API"),
        (name = "listings", description = "Listing search and publishing API"),
        (name = "admin", description = "Maintenance API"),
    ),
    info(
        title = "RentHub Backend API",
        version = "0.1.0",
        description = "Listing ranking and subscription quota REST API"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    use utoipa_swagger_ui::SwaggerUi;

    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/plans",
            "/plans/{plan_id}",
            "/users",
            "/users/{id}",
            "/users/{id}/subscription",
            "/users/{id}/eligibility",
            "/listings",
            "/listings/{id}",
            "/admin/bumps/run",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
