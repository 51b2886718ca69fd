pub mod coffee;

pub use coffee::{CategoryField, Coffee, DeleteOutcome, InsertOutcome, UpdateOutcome};
