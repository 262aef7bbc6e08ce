//! Banners and the single-active-banner rule.
//!
//! Activation writes the target first and only then switches the other
//! banners off. An unknown target therefore fails before anything changes,
//! and whichever activation runs its second step last leaves only its own
//! banner on, so at most one banner is active once writes settle. Two
//! activations racing can transiently both clear each other and leave none
//! active, which is tolerated. If the switch-off step fails the target is
//! switched back off before the error is returned.

use crate::{
    database::{DocumentStore, BANNERS},
    models::{Banner, CreateBannerRequest, Record, UpdateBannerRequest},
    services::records,
    utils::AppError,
};
use mongodb::bson::{doc, oid::ObjectId, Document};

const ENTITY: &str = "Banner";

pub async fn list_banners(store: &dyn DocumentStore) -> Result<Vec<Record<Banner>>, AppError> {
    records::list(store, BANNERS, doc! {}).await
}

pub async fn get_banner(store: &dyn DocumentStore, id: ObjectId) -> Result<Record<Banner>, AppError> {
    records::get(store, BANNERS, id, ENTITY).await
}

/// The banner currently shown to end users, if any.
pub async fn active_banner(store: &dyn DocumentStore) -> Result<Option<Record<Banner>>, AppError> {
    store
        .find_one(BANNERS, doc! { "active": true })
        .await?
        .map(Record::from_document)
        .transpose()
}

pub async fn create_banner(
    store: &dyn DocumentStore,
    request: CreateBannerRequest,
) -> Result<Record<Banner>, AppError> {
    records::create(store, BANNERS, Banner::from(request)).await
}

/// Updates content fields. The `active` flag is never written here.
pub async fn update_banner(
    store: &dyn DocumentStore,
    id: ObjectId,
    request: UpdateBannerRequest,
) -> Result<Record<Banner>, AppError> {
    let mut update_doc = Document::new();

    if let Some(title) = request.title { update_doc.insert("title", title); }
    if let Some(description) = request.description { update_doc.insert("description", description); }
    if let Some(image) = request.image { update_doc.insert("image", image); }
    if let Some(coupon_code) = request.coupon_code { update_doc.insert("couponCode", coupon_code); }
    if let Some(discount_rate) = request.discount_rate { update_doc.insert("discountRate", discount_rate); }

    records::update(store, BANNERS, id, update_doc, ENTITY).await
}

pub async fn delete_banner(store: &dyn DocumentStore, id: ObjectId) -> Result<(), AppError> {
    records::delete(store, BANNERS, id, ENTITY).await
}

/// Makes `id` the only active banner. Calling it again for the banner that
/// is already active succeeds without changes.
///
/// If the other banners cannot be switched off, the target is switched back
/// off before the error is returned, so a failed call does not leave two
/// banners active.
pub async fn activate(store: &dyn DocumentStore, id: ObjectId) -> Result<(), AppError> {
    let activated = store.update_fields(BANNERS, id, doc! { "active": true }).await?;
    if activated.matched == 0 {
        return Err(AppError::NotFound(ENTITY.to_string()));
    }

    let deactivated = match store
        .update_many(
            BANNERS,
            doc! { "_id": { "$ne": id }, "active": true },
            doc! { "active": false },
        )
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("❌ Banner {} activation failed while switching others off: {}", id, e);
            if let Err(rollback) = store.update_fields(BANNERS, id, doc! { "active": false }).await {
                log::error!("❌ Could not switch banner {} back off: {}", id, rollback);
            }
            return Err(e);
        }
    };

    log::debug!(
        "🎯 Banner {} active ({} other banner(s) switched off)",
        id,
        deactivated.modified
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;
    use std::sync::Arc;

    fn banner(title: &str) -> CreateBannerRequest {
        CreateBannerRequest {
            title: title.to_string(),
            description: None,
            image: None,
            coupon_code: Some(format!("{}-10", title)),
            discount_rate: Some(10.0),
        }
    }

    async fn seed(store: &InMemoryStore, count: usize) -> Vec<ObjectId> {
        let mut ids = Vec::new();
        for i in 0..count {
            let created = create_banner(store, banner(&format!("banner-{}", i))).await.unwrap();
            ids.push(ObjectId::parse_str(&created.id).unwrap());
        }
        ids
    }

    async fn active_ids(store: &InMemoryStore) -> Vec<String> {
        list_banners(store)
            .await
            .unwrap()
            .into_iter()
            .filter(|b| b.data.active)
            .map(|b| b.id)
            .collect()
    }

    #[tokio::test]
    async fn test_new_banners_start_inactive() {
        let store = InMemoryStore::new();
        seed(&store, 2).await;

        assert!(active_ids(&store).await.is_empty());
        assert!(active_banner(&store).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_activate_second_then_third() {
        let store = InMemoryStore::new();
        let ids = seed(&store, 3).await;

        activate(&store, ids[1]).await.unwrap();
        assert_eq!(active_ids(&store).await, vec![ids[1].to_hex()]);

        activate(&store, ids[2]).await.unwrap();
        assert_eq!(active_ids(&store).await, vec![ids[2].to_hex()]);
        assert_eq!(active_banner(&store).await.unwrap().unwrap().id, ids[2].to_hex());
    }

    #[tokio::test]
    async fn test_activate_is_idempotent() {
        let store = InMemoryStore::new();
        let ids = seed(&store, 2).await;

        activate(&store, ids[0]).await.unwrap();
        activate(&store, ids[0]).await.unwrap();

        assert_eq!(active_ids(&store).await, vec![ids[0].to_hex()]);
    }

    #[tokio::test]
    async fn test_activate_unknown_banner_changes_nothing() {
        let store = InMemoryStore::new();
        let ids = seed(&store, 2).await;
        activate(&store, ids[0]).await.unwrap();

        let result = activate(&store, ObjectId::new()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(active_ids(&store).await, vec![ids[0].to_hex()]);
    }

    #[tokio::test]
    async fn test_at_most_one_active_after_every_call() {
        let store = InMemoryStore::new();
        let ids = seed(&store, 4).await;
        let sequence = [0, 3, 3, 1, 2, 0, 1, 1, 3, 2];

        for index in sequence {
            activate(&store, ids[index]).await.unwrap();
            assert_eq!(active_ids(&store).await, vec![ids[index].to_hex()]);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_activations_settle_on_at_most_one() {
        let store = Arc::new(InMemoryStore::new());
        let ids = seed(&store, 5).await;

        for _ in 0..20 {
            let handles: Vec<_> = ids
                .iter()
                .map(|id| {
                    let store = Arc::clone(&store);
                    let id = *id;
                    tokio::spawn(async move { activate(store.as_ref(), id).await })
                })
                .collect();

            for handle in handles {
                handle.await.unwrap().unwrap();
            }
            assert!(active_ids(&store).await.len() <= 1);
        }
    }

    #[tokio::test]
    async fn test_update_banner_never_touches_active_flag() {
        let store = InMemoryStore::new();
        let ids = seed(&store, 1).await;
        activate(&store, ids[0]).await.unwrap();

        let updated = update_banner(
            &store,
            ids[0],
            UpdateBannerRequest {
                title: Some("Winter".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.data.title, "Winter");
        assert!(updated.data.active);
    }

    /// Store whose multi-document update always fails.
    struct FailingUpdateMany {
        inner: InMemoryStore,
    }

    #[async_trait::async_trait]
    impl DocumentStore for FailingUpdateMany {
        async fn find_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>, AppError> {
            self.inner.find_by_id(collection, id).await
        }

        async fn find_by_filter(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
            self.inner.find_by_filter(collection, filter).await
        }

        async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, AppError> {
            self.inner.find_one(collection, filter).await
        }

        async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId, AppError> {
            self.inner.insert(collection, document).await
        }

        async fn update_fields(
            &self,
            collection: &str,
            id: ObjectId,
            fields: Document,
        ) -> Result<crate::database::UpdateOutcome, AppError> {
            self.inner.update_fields(collection, id, fields).await
        }

        async fn update_many(
            &self,
            _collection: &str,
            _filter: Document,
            _fields: Document,
        ) -> Result<crate::database::UpdateOutcome, AppError> {
            Err(AppError::StoreFailure("connection reset".to_string()))
        }

        async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<u64, AppError> {
            self.inner.delete_by_id(collection, id).await
        }

        async fn ping(&self) -> Result<(), AppError> {
            self.inner.ping().await
        }
    }

    #[tokio::test]
    async fn test_failed_switch_off_leaves_target_inactive() {
        let store = FailingUpdateMany { inner: InMemoryStore::new() };
        let ids = seed(&store.inner, 2).await;
        // First banner made active directly; activate() cannot succeed on this store.
        store
            .update_fields(BANNERS, ids[0], doc! { "active": true })
            .await
            .unwrap();

        let result = activate(&store, ids[1]).await;

        assert!(matches!(result, Err(AppError::StoreFailure(_))));
        assert_eq!(active_ids(&store.inner).await, vec![ids[0].to_hex()]);
    }

    #[tokio::test]
    async fn test_delete_missing_banner() {
        let store = InMemoryStore::new();
        let result = delete_banner(&store, ObjectId::new()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
