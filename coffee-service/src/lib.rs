pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod validation;

pub use error::CoffeeError;
pub use startup::{build_router, AppState, Application};
