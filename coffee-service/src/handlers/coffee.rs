use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::dtos::{
    document_to_json, json_to_document, DeleteCoffeeResponse, InsertCoffeeResponse,
    UpdateCoffeeRequest, UpdateCoffeeResponse,
};
use crate::error::{CoffeeError, StorageAction};
use crate::startup::AppState;
use crate::validation::{parse_coffee_id, CoffeeJson};

pub async fn index() -> &'static str {
    "Coffee making server is running!"
}

#[tracing::instrument(skip(state))]
pub async fn list_coffees(State(state): State<AppState>) -> Result<Json<Vec<Value>>, CoffeeError> {
    let coffees = state
        .store
        .list()
        .await
        .map_err(CoffeeError::storage(StorageAction::Retrieve))?;

    tracing::debug!(count = coffees.len(), "Listed coffees");
    Ok(Json(coffees.into_iter().map(document_to_json).collect()))
}

#[tracing::instrument(skip(state))]
pub async fn get_coffee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, CoffeeError> {
    let id = parse_coffee_id(&id)?;

    let coffee = state
        .store
        .find_by_id(id)
        .await
        .map_err(CoffeeError::storage(StorageAction::Retrieve))?
        .ok_or(CoffeeError::NotFound)?;

    Ok(Json(document_to_json(coffee)))
}

/// Replaces the seven coffee fields, creating the record when `id` has none.
///
/// The identifier is checked before the body so a bad id always reports as
/// such.
#[tracing::instrument(skip(state, body))]
pub async fn update_coffee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<CoffeeJson<Value>, CoffeeError>,
) -> Result<Json<UpdateCoffeeResponse>, CoffeeError> {
    let id = parse_coffee_id(&id)?;
    let CoffeeJson(body) = body?;
    let fields = UpdateCoffeeRequest::from_body(body)?.into_set_document(state.category_field);

    let outcome = state
        .store
        .upsert_fields(id, fields)
        .await
        .map_err(CoffeeError::storage(StorageAction::Update))?;

    tracing::info!(
        coffee_id = %id,
        matched = outcome.matched_count,
        modified = outcome.modified_count,
        upserted = outcome.upserted_id.is_some(),
        "Updated coffee"
    );
    Ok(Json(outcome.into()))
}

#[tracing::instrument(skip(state, body))]
pub async fn create_coffee(
    State(state): State<AppState>,
    CoffeeJson(body): CoffeeJson<Value>,
) -> Result<(StatusCode, Json<InsertCoffeeResponse>), CoffeeError> {
    tracing::info!(coffee = %body, "Adding new coffee");
    let coffee = json_to_document(body)?;

    let outcome = state
        .store
        .insert(coffee)
        .await
        .map_err(CoffeeError::storage(StorageAction::Add))?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}

#[tracing::instrument(skip(state))]
pub async fn delete_coffee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteCoffeeResponse>, CoffeeError> {
    let id = parse_coffee_id(&id)?;

    let outcome = state
        .store
        .delete(id)
        .await
        .map_err(CoffeeError::storage(StorageAction::Delete))?;

    if outcome.deleted_count == 0 {
        return Err(CoffeeError::NotFound);
    }

    tracing::info!(coffee_id = %id, "Deleted coffee");
    Ok(Json(outcome.into()))
}
