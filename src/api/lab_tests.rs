use crate::{
    database::{parse_id, DocumentStore},
    models::{LabTest, UpdateLabTestRequest},
    services::lab_test_service,
    utils::AppError,
};
use actix_web::{web, HttpResponse};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/tests",
    tag = "Tests",
    responses((status = 200, description = "Test catalog", body = [LabTest]))
)]
pub async fn list_tests(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /tests");
    Ok(HttpResponse::Ok().json(lab_test_service::list_tests(store.get_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/tests/{id}",
    tag = "Tests",
    params(("id" = String, Path, description = "Test key")),
    responses(
        (status = 200, description = "Test", body = LabTest),
        (status = 404, description = "Test not found")
    )
)]
pub async fn get_test(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /tests/{}", path);
    let test = lab_test_service::get_test(store.get_ref(), parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(test))
}

#[utoipa::path(
    post,
    path = "/tests",
    tag = "Tests",
    request_body = LabTest,
    responses(
        (status = 201, description = "Test created", body = LabTest),
        (status = 400, description = "Invalid price")
    )
)]
pub async fn create_test(
    store: web::Data<dyn DocumentStore>,
    request: web::Json<LabTest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🧪 POST /tests - {}", request.name);
    let test = lab_test_service::create_test(store.get_ref(), request.into_inner()).await?;
    Ok(HttpResponse::Created().json(test))
}

#[utoipa::path(
    patch,
    path = "/tests/{id}",
    tag = "Tests",
    params(("id" = String, Path, description = "Test key")),
    request_body = UpdateLabTestRequest,
    responses(
        (status = 200, description = "Updated test", body = LabTest),
        (status = 404, description = "Test not found")
    )
)]
pub async fn update_test(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
    request: web::Json<UpdateLabTestRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("✏️ PATCH /tests/{}", path);
    let test = lab_test_service::update_test(store.get_ref(), parse_id(&path)?, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(test))
}

#[utoipa::path(
    delete,
    path = "/tests/{id}",
    tag = "Tests",
    params(("id" = String, Path, description = "Test key")),
    responses(
        (status = 200, description = "Test deleted"),
        (status = 404, description = "Test not found")
    )
)]
pub async fn delete_test(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️ DELETE /tests/{}", path);
    lab_test_service::delete_test(store.get_ref(), parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Test deleted successfully" })))
}
