use crate::{
    database::{parse_id, DocumentStore},
    models::{Recommendation, UpdateRecommendationRequest},
    services::recommendation_service,
    utils::AppError,
};
use actix_web::{web, HttpResponse};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/recommendations",
    tag = "Recommendations",
    responses((status = 200, description = "All recommendations", body = [Recommendation]))
)]
pub async fn list_recommendations(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /recommendations");
    Ok(HttpResponse::Ok().json(recommendation_service::list_recommendations(store.get_ref()).await?))
}

pub async fn get_recommendation(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /recommendations/{}", path);
    let recommendation = recommendation_service::get_recommendation(store.get_ref(), parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(recommendation))
}

#[utoipa::path(
    post,
    path = "/recommendations",
    tag = "Recommendations",
    request_body = Recommendation,
    responses((status = 201, description = "Recommendation created", body = Recommendation))
)]
pub async fn create_recommendation(
    store: web::Data<dyn DocumentStore>,
    request: web::Json<Recommendation>,
) -> Result<HttpResponse, AppError> {
    log::info!("💡 POST /recommendations - {}", request.title);
    let recommendation =
        recommendation_service::create_recommendation(store.get_ref(), request.into_inner()).await?;
    Ok(HttpResponse::Created().json(recommendation))
}

pub async fn update_recommendation(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
    request: web::Json<UpdateRecommendationRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("✏️ PATCH /recommendations/{}", path);
    let recommendation =
        recommendation_service::update_recommendation(store.get_ref(), parse_id(&path)?, request.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(recommendation))
}

pub async fn delete_recommendation(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️ DELETE /recommendations/{}", path);
    recommendation_service::delete_recommendation(store.get_ref(), parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Recommendation deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::TestState;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_recommendation_crud() {
        let state = TestState::new();
        let app = test::init_service(state.app()).await;

        let req = test::TestRequest::post()
            .uri("/recommendations")
            .set_json(json!({ "title": "Drink water", "description": "Two litres a day" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        let id = created["_id"].as_str().unwrap().to_string();

        let req = test::TestRequest::patch()
            .uri(&format!("/recommendations/{}", id))
            .set_json(json!({ "title": "Drink more water" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["title"], "Drink more water");
        assert_eq!(updated["description"], "Two litres a day");

        let req = test::TestRequest::patch()
            .uri(&format!("/recommendations/{}", id))
            .set_json(json!({}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::delete()
            .uri(&format!("/recommendations/{}", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri(&format!("/recommendations/{}", id)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
