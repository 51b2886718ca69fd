use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{ClientOptions, ServerApi, ServerApiVersion, UpdateOptions},
    Client as MongoClient, Collection, Database,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;

use crate::config::MongoConfig;
use crate::models::{Coffee, DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::services::store::{CoffeeStore, StoreError};

#[derive(Clone)]
pub struct CoffeeDb {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl CoffeeDb {
    /// Builds the client. The driver connects lazily, so this only fails on
    /// a bad connection string or SRV lookup; use `health_check` to probe
    /// the deployment.
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        let host = config.display_host();
        tracing::info!(host = %host, "Connecting to MongoDB");

        let uri = config.connection_uri()?;
        let mut options = ClientOptions::parse(uri.expose_secret())
            .await
            .map_err(|e| {
                tracing::error!("Failed to parse MongoDB connection string for {}: {}", host, e);
                AppError::from(e)
            })?;
        options.app_name = Some("coffee-service".to_string());

        if config.strict_api {
            options.server_api = Some(
                ServerApi::builder()
                    .version(ServerApiVersion::V1)
                    .strict(true)
                    .deprecation_errors(true)
                    .build(),
            );
        }

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client for {}: {}", host, e);
            AppError::from(e)
        })?;
        let db = client.database(&config.database);
        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "MongoDB client ready"
        );

        Ok(Self {
            client,
            db,
            collection: config.collection.clone(),
        })
    }

    pub fn coffees(&self) -> Collection<Document> {
        self.db.collection(&self.collection)
    }
}

#[async_trait]
impl CoffeeStore for CoffeeDb {
    async fn list(&self) -> Result<Vec<Coffee>, StoreError> {
        let cursor = self.coffees().find(None, None).await?;
        let coffees: Vec<Coffee> = cursor.try_collect().await?;
        Ok(coffees)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Coffee>, StoreError> {
        Ok(self.coffees().find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert(&self, coffee: Coffee) -> Result<InsertOutcome, StoreError> {
        let result = self.coffees().insert_one(coffee, None).await?;
        Ok(InsertOutcome {
            inserted_id: result.inserted_id,
        })
    }

    async fn upsert_fields(
        &self,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        let options = UpdateOptions::builder().upsert(true).build();
        let result = self
            .coffees()
            .update_one(doc! { "_id": id }, doc! { "$set": fields }, options)
            .await?;

        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id,
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<DeleteOutcome, StoreError> {
        let result = self.coffees().delete_one(doc! { "_id": id }, None).await?;
        Ok(DeleteOutcome {
            deleted_count: result.deleted_count,
        })
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::from(e)
            })?;
        Ok(())
    }

    async fn shutdown(&self) {
        tracing::info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }
}
