use crate::error::AppError;
use crate::models::*;
use crate::services::SubscriptionService;
use actix_web::{HttpResponse, ResponseError, Result, web};

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("invalid request body: {err}")).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("invalid query string: {err}")).into()
    })
}

#[utoipa::path(
    post,
    path = "/api/user",
    tag = "subscriptions",
    request_body = SubscriptionPayload,
    responses(
        (status = 204, description = "Subscription created"),
        (status = 400, description = "Invalid or empty body"),
        (status = 500, description = "Storage error")
    )
)]
pub async fn create_subscription(
    service: web::Data<SubscriptionService>,
    payload: web::Json<SubscriptionPayload>,
) -> Result<HttpResponse> {
    let new = match payload.into_inner().into_new_subscription() {
        Ok(new) => new,
        Err(e) => return Ok(e.error_response()),
    };

    match service.create(new).await {
        Ok(_) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/user/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "User id (UUID v4)")),
    responses(
        (status = 200, description = "Latest subscription of the user", body = SubscriptionResponse),
        (status = 400, description = "Missing user id"),
        (status = 404, description = "No subscription for the user")
    )
)]
pub async fn get_subscription(
    service: web::Data<SubscriptionService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.find_latest(&path.into_inner()).await {
        Ok(sub) => Ok(HttpResponse::Ok().json(sub)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/user/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "User id (UUID v4)")),
    request_body = SubscriptionPayload,
    responses(
        (status = 200, description = "Merged subscription", body = SubscriptionResponse),
        (status = 400, description = "Missing user id, invalid body or user id change"),
        (status = 404, description = "No subscription for the user"),
        (status = 500, description = "Storage error")
    )
)]
pub async fn update_subscription(
    service: web::Data<SubscriptionService>,
    path: web::Path<String>,
    payload: web::Json<SubscriptionPayload>,
) -> Result<HttpResponse> {
    match service.update(&path.into_inner(), payload.into_inner()).await {
        Ok(sub) => Ok(HttpResponse::Ok().json(sub)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/user",
    tag = "subscriptions",
    responses(
        (status = 200, description = "All subscriptions ordered by id", body = [SubscriptionResponse]),
        (status = 500, description = "Storage error")
    )
)]
pub async fn list_subscriptions(service: web::Data<SubscriptionService>) -> Result<HttpResponse> {
    match service.list().await {
        Ok(subs) => Ok(HttpResponse::Ok().json(subs)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "User id (UUID v4)")),
    responses(
        (status = 204, description = "All subscriptions of the user removed"),
        (status = 400, description = "Missing user id"),
        (status = 500, description = "Storage error")
    )
)]
pub async fn delete_subscription(
    service: web::Data<SubscriptionService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.delete(&path.into_inner()).await {
        Ok(_) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/total-price",
    tag = "subscriptions",
    params(TotalPriceQuery),
    responses(
        (status = 200, description = "Sum of monthly prices in the window", body = TotalPriceResponse),
        (status = 400, description = "Missing or malformed date"),
        (status = 500, description = "Storage error")
    )
)]
pub async fn get_total_price(
    service: web::Data<SubscriptionService>,
    query: web::Query<TotalPriceQuery>,
) -> Result<HttpResponse> {
    let params = match TotalPriceParams::try_from(query.into_inner()) {
        Ok(params) => params,
        Err(e) => return Ok(e.error_response()),
    };

    match service.total_price(&params).await {
        Ok(total_price) => Ok(HttpResponse::Ok().json(TotalPriceResponse { total_price })),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api")
                .route("/user", web::post().to(create_subscription))
                .route("/user", web::get().to(list_subscriptions))
                .route("/user/{id}", web::get().to(get_subscription))
                .route("/user/{id}", web::put().to(update_subscription))
                .route("/user/{id}", web::delete().to(delete_subscription))
                .route("/total-price", web::get().to(get_total_price)),
        );
}
