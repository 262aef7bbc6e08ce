// Shared single-document operations used by every entity service.

use crate::{
    database::DocumentStore,
    models::{to_document, Record},
    utils::AppError,
};
use mongodb::bson::{oid::ObjectId, Document};
use serde::{de::DeserializeOwned, Serialize};

pub async fn list<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    filter: Document,
) -> Result<Vec<Record<T>>, AppError> {
    store
        .find_by_filter(collection, filter)
        .await?
        .into_iter()
        .map(Record::from_document)
        .collect()
}

pub async fn get<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: ObjectId,
    entity: &str,
) -> Result<Record<T>, AppError> {
    let document = store
        .find_by_id(collection, id)
        .await?
        .ok_or_else(|| AppError::NotFound(entity.to_string()))?;
    Record::from_document(document)
}

pub async fn create<T: Serialize + DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    value: T,
) -> Result<Record<T>, AppError> {
    let id = store.insert(collection, to_document(&value)?).await?;
    Ok(Record {
        id: id.to_hex(),
        data: value,
    })
}

/// `$set` of `fields`, then re-reads the document.
pub async fn update<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: ObjectId,
    fields: Document,
    entity: &str,
) -> Result<Record<T>, AppError> {
    if fields.is_empty() {
        return Err(AppError::InvalidRequest("No fields to update".to_string()));
    }

    let outcome = store.update_fields(collection, id, fields).await?;
    if outcome.matched == 0 {
        return Err(AppError::NotFound(entity.to_string()));
    }
    get(store, collection, id, entity).await
}

pub async fn delete(
    store: &dyn DocumentStore,
    collection: &str,
    id: ObjectId,
    entity: &str,
) -> Result<(), AppError> {
    match store.delete_by_id(collection, id).await? {
        0 => Err(AppError::NotFound(entity.to_string())),
        _ => Ok(()),
    }
}
