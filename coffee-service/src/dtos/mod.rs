pub mod coffee;

use serde::Serialize;

pub use coffee::{
    bson_to_json, document_to_json, json_to_document, DeleteCoffeeResponse, InsertCoffeeResponse,
    UpdateCoffeeRequest, UpdateCoffeeResponse,
};

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
