use crate::{
    database::{DocumentStore, TESTS},
    models::{LabTest, Record, UpdateLabTestRequest},
    services::records,
    utils::AppError,
};
use mongodb::bson::{doc, oid::ObjectId, Document};

const ENTITY: &str = "Test";

pub async fn list_tests(store: &dyn DocumentStore) -> Result<Vec<Record<LabTest>>, AppError> {
    records::list(store, TESTS, doc! {}).await
}

pub async fn get_test(store: &dyn DocumentStore, id: ObjectId) -> Result<Record<LabTest>, AppError> {
    records::get(store, TESTS, id, ENTITY).await
}

pub async fn create_test(store: &dyn DocumentStore, test: LabTest) -> Result<Record<LabTest>, AppError> {
    validate_price(test.price)?;
    records::create(store, TESTS, test).await
}

pub async fn update_test(
    store: &dyn DocumentStore,
    id: ObjectId,
    request: UpdateLabTestRequest,
) -> Result<Record<LabTest>, AppError> {
    let mut update_doc = Document::new();

    if let Some(name) = request.name { update_doc.insert("name", name); }
    if let Some(price) = request.price {
        validate_price(price)?;
        update_doc.insert("price", price);
    }
    if let Some(description) = request.description { update_doc.insert("description", description); }
    if let Some(image) = request.image { update_doc.insert("image", image); }
    if let Some(date) = request.date { update_doc.insert("date", date); }
    if let Some(slots) = request.slots { update_doc.insert("slots", slots); }

    records::update(store, TESTS, id, update_doc, ENTITY).await
}

pub async fn delete_test(store: &dyn DocumentStore, id: ObjectId) -> Result<(), AppError> {
    records::delete(store, TESTS, id, ENTITY).await
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(AppError::InvalidRequest(format!("price must be a non-negative number, got {}", price)))
    }
}
