use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use thiserror::Error;

use crate::models::{Coffee, DeleteOutcome, InsertOutcome, UpdateOutcome};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("duplicate _id: {0}")]
    DuplicateKey(String),
}

/// The coffee collection. One call per HTTP request; implementations own
/// their consistency.
#[async_trait]
pub trait CoffeeStore: Send + Sync {
    /// Every record, in whatever order the backend yields them.
    async fn list(&self) -> Result<Vec<Coffee>, StoreError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Coffee>, StoreError>;

    /// Inserts `coffee` verbatim. An `_id` is assigned when the document
    /// has none.
    async fn insert(&self, coffee: Coffee) -> Result<InsertOutcome, StoreError>;

    /// `$set`s `fields` on the record with `id`, creating it if absent.
    async fn upsert_fields(
        &self,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, StoreError>;

    async fn delete(&self, id: ObjectId) -> Result<DeleteOutcome, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    /// Releases connections. Called once after the server stops.
    async fn shutdown(&self) {}
}
