use crate::{
    database::{parse_id, DocumentStore},
    models::{Banner, CreateBannerRequest, UpdateBannerRequest},
    services::banner_service,
    utils::AppError,
};
use actix_web::{web, HttpResponse};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/banners",
    tag = "Banners",
    responses((status = 200, description = "All banners", body = [Banner]))
)]
pub async fn list_banners(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /banners");
    Ok(HttpResponse::Ok().json(banner_service::list_banners(store.get_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/banners/active",
    tag = "Banners",
    responses(
        (status = 200, description = "The banner shown to end users", body = Banner),
        (status = 404, description = "No banner is active")
    )
)]
pub async fn get_active_banner(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    log::info!("📣 GET /banners/active");
    let banner = banner_service::active_banner(store.get_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Active banner".to_string()))?;
    Ok(HttpResponse::Ok().json(banner))
}

#[utoipa::path(
    get,
    path = "/banners/{id}",
    tag = "Banners",
    params(("id" = String, Path, description = "Banner key")),
    responses(
        (status = 200, description = "Banner", body = Banner),
        (status = 404, description = "Banner not found")
    )
)]
pub async fn get_banner(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /banners/{}", path);
    let banner = banner_service::get_banner(store.get_ref(), parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(banner))
}

#[utoipa::path(
    post,
    path = "/banners",
    tag = "Banners",
    request_body = CreateBannerRequest,
    responses((status = 201, description = "Banner created inactive", body = Banner))
)]
pub async fn create_banner(
    store: web::Data<dyn DocumentStore>,
    request: web::Json<CreateBannerRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🆕 POST /banners - {}", request.title);
    let banner = banner_service::create_banner(store.get_ref(), request.into_inner()).await?;
    Ok(HttpResponse::Created().json(banner))
}

#[utoipa::path(
    patch,
    path = "/banners/{id}/active",
    tag = "Banners",
    params(("id" = String, Path, description = "Banner key")),
    responses(
        (status = 200, description = "Banner is now the only active one", body = Banner),
        (status = 404, description = "Banner not found, nothing changed")
    )
)]
pub async fn activate_banner(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🚩 PATCH /banners/{}/active", path);
    let id = parse_id(&path)?;

    banner_service::activate(store.get_ref(), id).await?;
    let banner = banner_service::get_banner(store.get_ref(), id).await?;

    log::info!("✅ Banner {} activated", path);
    Ok(HttpResponse::Ok().json(banner))
}

#[utoipa::path(
    patch,
    path = "/banners/{id}",
    tag = "Banners",
    params(("id" = String, Path, description = "Banner key")),
    request_body = UpdateBannerRequest,
    responses(
        (status = 200, description = "Updated banner", body = Banner),
        (status = 404, description = "Banner not found")
    )
)]
pub async fn update_banner(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
    request: web::Json<UpdateBannerRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("✏️ PATCH /banners/{}", path);
    let banner = banner_service::update_banner(store.get_ref(), parse_id(&path)?, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(banner))
}

#[utoipa::path(
    delete,
    path = "/banners/{id}",
    tag = "Banners",
    params(("id" = String, Path, description = "Banner key")),
    responses(
        (status = 200, description = "Banner deleted"),
        (status = 404, description = "Banner not found")
    )
)]
pub async fn delete_banner(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️ DELETE /banners/{}", path);
    banner_service::delete_banner(store.get_ref(), parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Banner deleted successfully" })))
}
