use crate::utils::AppError;
use mongodb::bson::{self, Document};
use serde::{de::DeserializeOwned, Serialize};

/// A stored entity together with its key.
///
/// Serializes as the entity's own fields plus `_id` as a hex string, which is
/// the shape the web client reads.
#[derive(Debug, Clone, Serialize)]
pub struct Record<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T: DeserializeOwned> Record<T> {
    pub fn from_document(document: Document) -> Result<Self, AppError> {
        let id = document
            .get_object_id("_id")
            .map_err(|e| AppError::StoreFailure(format!("Document without ObjectId key: {}", e)))?;
        let data = bson::from_document(document)?;
        Ok(Self {
            id: id.to_hex(),
            data,
        })
    }
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Document, AppError> {
    Ok(bson::to_document(value)?)
}
