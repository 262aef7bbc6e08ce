//! Document store abstraction.
//!
//! Services only talk to [`DocumentStore`]; the server picks the MongoDB
//! adapter when a connection string is configured and falls back to the
//! in-memory adapter otherwise.

mod memory;
mod mongo;

pub use memory::InMemoryStore;
pub use mongo::MongoDB;

use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};

pub const USERS: &str = "user";
pub const BANNERS: &str = "banner";
pub const TESTS: &str = "test";
pub const BOOKINGS: &str = "booking";
pub const RECOMMENDATIONS: &str = "recommendation";

/// Fields that must be unique within their collection.
pub const UNIQUE_FIELDS: &[(&str, &str)] = &[(USERS, "email")];

/// Result of a field-set update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>, AppError>;

    /// Documents matching `filter`, in insertion order.
    async fn find_by_filter(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError>;

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, AppError>;

    /// Inserts `document` and returns the generated key. Any `_id` already
    /// present in `document` is discarded.
    async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId, AppError>;

    /// `$set` of `fields` on the document with key `id`.
    async fn update_fields(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, AppError>;

    /// `$set` of `fields` on every document matching `filter`.
    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateOutcome, AppError>;

    /// Returns the number of deleted documents (0 or 1).
    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64, AppError>;

    async fn ping(&self) -> Result<(), AppError>;

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, AppError> {
        self.find_by_filter(collection, doc! {}).await
    }
}

/// Parses a path key into an `ObjectId`.
pub fn parse_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidRequest(format!("Invalid id '{}'", raw)))
}
