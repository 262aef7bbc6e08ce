use super::{DocumentStore, UpdateOutcome, BANNERS, BOOKINGS, UNIQUE_FIELDS};
use crate::utils::AppError;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some("health-track-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    async fn ensure_indexes(&self) -> Result<(), AppError> {
        log::info!("🔧 Creating database indexes...");

        for (collection, field) in UNIQUE_FIELDS {
            let index = IndexModel::builder()
                .keys(index_keys(field))
                .options(IndexOptions::builder().unique(true).build())
                .build();

            match self.collection(collection).create_index(index).await {
                Ok(_) => log::info!("   ✅ Unique index ready: {}({})", collection, field),
                Err(e) => {
                    // Existing duplicates make the unique index impossible; the
                    // service-level check still rejects new ones.
                    log::warn!("   ⚠️  Could not create unique index {}({}): {}", collection, field, e)
                }
            }
        }

        let lookups = [(BOOKINGS, "email"), (BANNERS, "active")];
        for (collection, field) in lookups {
            let index = IndexModel::builder().keys(index_keys(field)).build();
            match self.collection(collection).create_index(index).await {
                Ok(_) => log::info!("   ✅ Index ready: {}({})", collection, field),
                Err(e) => log::debug!("   ℹ️  Index {}({}) skipped: {}", collection, field, e),
            }
        }

        log::info!("✅ Database indexes ready");
        Ok(())
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

fn index_keys(field: &str) -> Document {
    let mut keys = Document::new();
    keys.insert(field, 1);
    keys
}

#[async_trait]
impl DocumentStore for MongoDB {
    async fn find_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>, AppError> {
        Ok(self.collection(collection).find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_filter(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
        let cursor = self.collection(collection).find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, AppError> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn insert(&self, collection: &str, mut document: Document) -> Result<ObjectId, AppError> {
        document.remove("_id");
        let result = self.collection(collection).insert_one(document).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::StoreFailure("Inserted document has no ObjectId".to_string()))
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, AppError> {
        let result = self
            .collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        fields: Document,
    ) -> Result<UpdateOutcome, AppError> {
        let result = self
            .collection(collection)
            .update_many(filter, doc! { "$set": fields })
            .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64, AppError> {
        let result = self.collection(collection).delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
