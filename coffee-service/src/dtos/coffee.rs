use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::CoffeeError;
use crate::models::{CategoryField, DeleteOutcome, InsertOutcome, UpdateOutcome};

/// Body of `PUT /coffee/:id`. Every field is free-form; a missing field is
/// written as `null`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCoffeeRequest {
    pub name: Option<Value>,
    pub chef: Option<Value>,
    pub taste: Option<Value>,
    pub photo: Option<Value>,
    pub supplier: Option<Value>,
    pub category: Option<Value>,
    pub details: Option<Value>,
}

impl UpdateCoffeeRequest {
    /// Reads the update fields from a request body. Only JSON objects are
    /// accepted; unknown keys are ignored.
    pub fn from_body(value: Value) -> Result<Self, CoffeeError> {
        match value {
            Value::Object(map) => serde_json::from_value(Value::Object(map))
                .map_err(|e| CoffeeError::InvalidBody(e.to_string())),
            other => Err(not_an_object(&other)),
        }
    }

    /// Builds the `$set` document for the update.
    pub fn into_set_document(self, category_field: CategoryField) -> Document {
        let mut fields = Document::new();
        fields.insert("name", value_or_null(self.name));
        fields.insert("chef", value_or_null(self.chef));
        fields.insert("taste", value_or_null(self.taste));
        fields.insert("photo", value_or_null(self.photo));
        fields.insert("supplier", value_or_null(self.supplier));
        fields.insert(category_field.as_str(), value_or_null(self.category));
        fields.insert("details", value_or_null(self.details));
        fields
    }
}

fn value_or_null(value: Option<Value>) -> Bson {
    value.map(json_to_bson).unwrap_or(Bson::Null)
}

/// Converts a request body into a document to insert. Only JSON objects are
/// accepted.
pub fn json_to_document(value: Value) -> Result<Document, CoffeeError> {
    match value {
        Value::Object(map) => Ok(object_to_document(map)),
        other => Err(not_an_object(&other)),
    }
}

/// Literal JSON to BSON conversion. Extended-JSON keys such as `$oid` or
/// `$date` are stored as ordinary fields, not interpreted.
pub fn json_to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => number_to_bson(&n),
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(items.into_iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(object_to_document(map)),
    }
}

fn object_to_document(map: Map<String, Value>) -> Document {
    map.into_iter()
        .map(|(key, value)| (key, json_to_bson(value)))
        .collect()
}

// Integers outside the i64 range fall back to a double.
fn number_to_bson(n: &Number) -> Bson {
    if let Some(i) = n.as_i64() {
        match i32::try_from(i) {
            Ok(small) => Bson::Int32(small),
            Err(_) => Bson::Int64(i),
        }
    } else {
        Bson::Double(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn not_an_object(value: &Value) -> CoffeeError {
    CoffeeError::InvalidBody(format!(
        "expected a JSON object, got {}",
        json_kind(value)
    ))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Renders a BSON value for a response. ObjectIds become their hex string;
/// everything else uses relaxed extended JSON.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

pub fn document_to_json(doc: Document) -> Value {
    Value::Object(
        doc.into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertCoffeeResponse {
    pub acknowledged: bool,
    pub inserted_id: Value,
}

impl From<InsertOutcome> for InsertCoffeeResponse {
    fn from(outcome: InsertOutcome) -> Self {
        Self {
            acknowledged: true,
            inserted_id: bson_to_json(outcome.inserted_id),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoffeeResponse {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<Value>,
}

impl From<UpdateOutcome> for UpdateCoffeeResponse {
    fn from(outcome: UpdateOutcome) -> Self {
        Self {
            acknowledged: true,
            matched_count: outcome.matched_count,
            modified_count: outcome.modified_count,
            upserted_count: outcome.upserted_count(),
            upserted_id: outcome.upserted_id.map(bson_to_json),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Serialize)]
pub struct DeleteCoffeeResponse {
    pub message: String,
    pub result: DeleteSummary,
}

impl From<DeleteOutcome> for DeleteCoffeeResponse {
    fn from(outcome: DeleteOutcome) -> Self {
        Self {
            message: "Coffee deleted successfully".to_string(),
            result: DeleteSummary {
                acknowledged: true,
                deleted_count: outcome.deleted_count,
            },
        }
    }
}
