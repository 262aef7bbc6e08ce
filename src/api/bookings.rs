use crate::{
    database::{parse_id, DocumentStore},
    models::{Booking, BookingQuery, CreateBookingRequest, SubmitResultRequest, UpdateBookingStatusRequest},
    services::{booking_service, Claims},
    utils::AppError,
};
use actix_web::{http::header, web, HttpResponse};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created as pending", body = Booking),
        (status = 404, description = "Test not found")
    )
)]
pub async fn create_booking(
    store: web::Data<dyn DocumentStore>,
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📅 POST /bookings - {} books {}", request.email, request.test_id);
    let booking = booking_service::create_booking(store.get_ref(), request.into_inner()).await?;

    log::info!("✅ Booking created: {}", booking.id);
    Ok(HttpResponse::Created().json(booking))
}

#[utoipa::path(
    get,
    path = "/bookings",
    tag = "Bookings",
    params(("email" = Option<String>, Query, description = "Only bookings of this email")),
    responses((status = 200, description = "Bookings", body = [Booking]))
)]
pub async fn list_bookings(
    store: web::Data<dyn DocumentStore>,
    query: web::Query<BookingQuery>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /bookings - email: {}", query.email.as_deref().unwrap_or("*"));
    let bookings = booking_service::list_bookings(store.get_ref(), query.email.as_deref()).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking key")),
    responses(
        (status = 200, description = "Booking", body = Booking),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /bookings/{}", path);
    let booking = booking_service::get_booking(store.get_ref(), parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(booking))
}

#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking key")),
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "Updated booking", body = Booking),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn update_booking_status(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
    request: web::Json<UpdateBookingStatusRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔄 PATCH /bookings/{} - {}", path, request.status);
    let booking = booking_service::update_status(store.get_ref(), parse_id(&path)?, request.status).await?;
    Ok(HttpResponse::Ok().json(booking))
}

#[utoipa::path(
    patch,
    path = "/bookings/{id}/result",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking key")),
    request_body = SubmitResultRequest,
    responses(
        (status = 200, description = "Result attached, booking delivered", body = Booking),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn submit_result(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
    request: web::Json<SubmitResultRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📨 PATCH /bookings/{}/result", path);
    let booking =
        booking_service::submit_result(store.get_ref(), parse_id(&path)?, request.into_inner().test_result_url)
            .await?;
    Ok(HttpResponse::Ok().json(booking))
}

#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking key")),
    responses(
        (status = 200, description = "Booking deleted"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn delete_booking(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️ DELETE /bookings/{}", path);
    booking_service::delete_booking(store.get_ref(), parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Booking deleted successfully" })))
}

#[utoipa::path(
    get,
    path = "/test-results/{id}/download",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking key")),
    responses(
        (status = 200, description = "PDF result sheet (application/pdf attachment)"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Booking or its user not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_result(
    store: web::Data<dyn DocumentStore>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("📄 GET /test-results/{}/download (by {})", path, claims.email);
    let report = booking_service::result_report(store.get_ref(), parse_id(&path)?).await?;

    log::info!("✅ PDF generated for test result {}", path);
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((header::CONTENT_DISPOSITION, content_disposition(&report.file_name)))
        .body(report.bytes))
}

/// `attachment` disposition with an ASCII fallback name and the exact name
/// percent-encoded in `filename*`.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}
