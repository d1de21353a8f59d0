use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::subscription::create_subscription,
        handlers::subscription::get_subscription,
        handlers::subscription::update_subscription,
        handlers::subscription::list_subscriptions,
        handlers::subscription::delete_subscription,
        handlers::subscription::get_total_price,
    ),
    components(
        schemas(
            SubscriptionPayload,
            SubscriptionResponse,
            TotalPriceResponse,
        )
    ),
    tags(
        (name = "subscriptions", description = "User subscription API"),
    ),
    info(
        title = "User Subscription API",
        version = "1.0.0",
        description = "Tracks user subscriptions and their monthly cost"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
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
