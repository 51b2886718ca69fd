//! Process-local coffee store for tests and local development.

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use crate::models::{Coffee, DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::services::store::{CoffeeStore, StoreError};

/// Keeps records in insertion order. Mirrors MongoDB's `$set`/upsert
/// counting so responses look the same as with the real backend.
pub struct InMemoryCoffeeStore {
    coffees: RwLock<Vec<Coffee>>,
    available: bool,
}

impl InMemoryCoffeeStore {
    pub fn new() -> Self {
        Self {
            coffees: RwLock::new(Vec::new()),
            available: true,
        }
    }

    /// A store whose every operation fails, standing in for an unreachable
    /// database.
    pub fn unavailable() -> Self {
        Self {
            coffees: RwLock::new(Vec::new()),
            available: false,
        }
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "in-memory store is marked unavailable".to_string(),
            ))
        }
    }
}

impl Default for InMemoryCoffeeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn has_id(coffee: &Coffee, id: &Bson) -> bool {
    coffee.get("_id") == Some(id)
}

#[async_trait]
impl CoffeeStore for InMemoryCoffeeStore {
    async fn list(&self) -> Result<Vec<Coffee>, StoreError> {
        self.ensure_available()?;
        Ok(self.coffees.read().await.clone())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Coffee>, StoreError> {
        self.ensure_available()?;
        let id = Bson::ObjectId(id);
        Ok(self
            .coffees
            .read()
            .await
            .iter()
            .find(|coffee| has_id(coffee, &id))
            .cloned())
    }

    async fn insert(&self, coffee: Coffee) -> Result<InsertOutcome, StoreError> {
        self.ensure_available()?;
        let id = coffee
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));

        let mut coffees = self.coffees.write().await;
        if coffees.iter().any(|existing| has_id(existing, &id)) {
            return Err(StoreError::DuplicateKey(id.to_string()));
        }

        // `_id` always leads, as MongoDB stores it.
        let mut stored = doc! { "_id": id.clone() };
        for (key, value) in coffee {
            if key != "_id" {
                stored.insert(key, value);
            }
        }
        coffees.push(stored);

        Ok(InsertOutcome { inserted_id: id })
    }

    async fn upsert_fields(
        &self,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        self.ensure_available()?;
        let id = Bson::ObjectId(id);
        let mut coffees = self.coffees.write().await;

        if let Some(existing) = coffees.iter_mut().find(|coffee| has_id(coffee, &id)) {
            let mut modified = false;
            for (key, value) in fields {
                if existing.get(&key) != Some(&value) {
                    existing.insert(key, value);
                    modified = true;
                }
            }
            return Ok(UpdateOutcome {
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_id: None,
            });
        }

        let mut stored = doc! { "_id": id.clone() };
        for (key, value) in fields {
            stored.insert(key, value);
        }
        coffees.push(stored);

        Ok(UpdateOutcome {
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id),
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<DeleteOutcome, StoreError> {
        self.ensure_available()?;
        let id = Bson::ObjectId(id);
        let mut coffees = self.coffees.write().await;

        match coffees.iter().position(|coffee| has_id(coffee, &id)) {
            Some(index) => {
                coffees.remove(index);
                Ok(DeleteOutcome { deleted_count: 1 })
            }
            None => Ok(DeleteOutcome { deleted_count: 0 }),
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.ensure_available()
    }
}
