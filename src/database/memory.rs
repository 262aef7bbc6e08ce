use super::{DocumentStore, UpdateOutcome, UNIQUE_FIELDS};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local document store.
///
/// Supports the subset of the query language the services use: top-level
/// equality and `$ne`. Unique fields from [`UNIQUE_FIELDS`] are enforced on
/// insert and update, mirroring the indexes the MongoDB adapter creates.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(field, expected)| {
        let actual = document.get(field);
        match expected {
            Bson::Document(operator) if operator.contains_key("$ne") => actual != operator.get("$ne"),
            _ => actual == Some(expected),
        }
    })
}

fn id_of(document: &Document) -> Option<ObjectId> {
    document.get_object_id("_id").ok()
}

/// Rejects `candidate` when it shares a unique field value with another
/// document of the collection (`skip` excludes the document being updated).
fn check_unique(
    collection: &str,
    documents: &[Document],
    candidate: &Document,
    skip: Option<ObjectId>,
) -> Result<(), AppError> {
    for (unique_collection, field) in UNIQUE_FIELDS {
        if *unique_collection != collection {
            continue;
        }
        let Some(value) = candidate.get(*field) else {
            continue;
        };
        let clash = documents
            .iter()
            .filter(|existing| skip.is_none() || id_of(existing) != skip)
            .any(|existing| existing.get(*field) == Some(value));
        if clash {
            return Err(AppError::Duplicate("Document".to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|d| id_of(d) == Some(id)))
            .cloned())
    }

    async fn find_by_filter(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| matches(d, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|d| matches(d, &filter)))
            .cloned())
    }

    async fn insert(&self, collection: &str, mut document: Document) -> Result<ObjectId, AppError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();
        check_unique(collection, documents, &document, None)?;

        let id = ObjectId::new();
        document.insert("_id", id);
        documents.push(document);
        Ok(id)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, AppError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(UpdateOutcome::default());
        };
        check_unique(collection, documents, &fields, Some(id))?;

        let Some(document) = documents.iter_mut().find(|d| id_of(d) == Some(id)) else {
            return Ok(UpdateOutcome::default());
        };

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(apply_set(document, &fields)),
        })
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateOutcome, AppError> {
        let mut collections = self.collections.write().await;
        let mut outcome = UpdateOutcome::default();
        if let Some(documents) = collections.get_mut(collection) {
            for document in documents.iter_mut().filter(|d| matches(d, &filter)) {
                outcome.matched += 1;
                outcome.modified += u64::from(apply_set(document, &fields));
            }
        }
        Ok(outcome)
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64, AppError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = documents.len();
        documents.retain(|d| id_of(d) != Some(id));
        Ok((before - documents.len()) as u64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Applies a `$set` and reports whether any value actually changed.
fn apply_set(document: &mut Document, fields: &Document) -> bool {
    let mut changed = false;
    for (key, value) in fields {
        if document.get(key) != Some(value) {
            document.insert(key.clone(), value.clone());
            changed = true;
        }
    }
    changed
}
