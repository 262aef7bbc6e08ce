use crate::{
    database::{DocumentStore, RECOMMENDATIONS},
    models::{Recommendation, Record, UpdateRecommendationRequest},
    services::records,
    utils::AppError,
};
use mongodb::bson::{doc, oid::ObjectId, Document};

const ENTITY: &str = "Recommendation";

pub async fn list_recommendations(store: &dyn DocumentStore) -> Result<Vec<Record<Recommendation>>, AppError> {
    records::list(store, RECOMMENDATIONS, doc! {}).await
}

pub async fn get_recommendation(
    store: &dyn DocumentStore,
    id: ObjectId,
) -> Result<Record<Recommendation>, AppError> {
    records::get(store, RECOMMENDATIONS, id, ENTITY).await
}

pub async fn create_recommendation(
    store: &dyn DocumentStore,
    recommendation: Recommendation,
) -> Result<Record<Recommendation>, AppError> {
    records::create(store, RECOMMENDATIONS, recommendation).await
}

pub async fn update_recommendation(
    store: &dyn DocumentStore,
    id: ObjectId,
    request: UpdateRecommendationRequest,
) -> Result<Record<Recommendation>, AppError> {
    let mut update_doc = Document::new();

    if let Some(title) = request.title { update_doc.insert("title", title); }
    if let Some(description) = request.description { update_doc.insert("description", description); }
    if let Some(image) = request.image { update_doc.insert("image", image); }

    records::update(store, RECOMMENDATIONS, id, update_doc, ENTITY).await
}

pub async fn delete_recommendation(store: &dyn DocumentStore, id: ObjectId) -> Result<(), AppError> {
    records::delete(store, RECOMMENDATIONS, id, ENTITY).await
}
