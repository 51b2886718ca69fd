//! Coffee records and the summaries returned by storage mutations.
//!
//! Records are schemaless: whatever object a client submits is stored as-is,
//! so a coffee is just a BSON document with an `_id`.

use mongodb::bson::{Bson, Document};

/// A stored coffee record.
pub type Coffee = Document;

/// Field name the update body's `category` is written under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryField {
    #[default]
    Category,
    /// `categorya`, as written by earlier deployments.
    Legacy,
}

impl CategoryField {
    pub fn from_legacy_flag(legacy: bool) -> Self {
        if legacy {
            CategoryField::Legacy
        } else {
            CategoryField::Category
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryField::Category => "category",
            CategoryField::Legacy => "categorya",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertOutcome {
    pub inserted_id: Bson,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
    /// Set when the update created the record.
    pub upserted_id: Option<Bson>,
}

impl UpdateOutcome {
    pub fn upserted_count(&self) -> u64 {
        u64::from(self.upserted_id.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}
