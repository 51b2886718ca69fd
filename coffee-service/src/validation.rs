use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::de::DeserializeOwned;

use crate::error::CoffeeError;

/// Parses a path identifier. Only 24 hexadecimal characters are accepted.
pub fn parse_coffee_id(raw: &str) -> Result<ObjectId, CoffeeError> {
    if raw.len() != 24 || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CoffeeError::InvalidId(raw.to_string()));
    }
    ObjectId::parse_str(raw).map_err(|_| CoffeeError::InvalidId(raw.to_string()))
}

/// JSON body extractor that rejects with a `CoffeeError` instead of axum's
/// plain-text rejection.
pub struct CoffeeJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for CoffeeJson<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = CoffeeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| CoffeeError::InvalidBody(e.body_text()))?;

        Ok(CoffeeJson(value))
    }
}
