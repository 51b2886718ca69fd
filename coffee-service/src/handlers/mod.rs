pub mod coffee;
pub mod health;

pub use coffee::{create_coffee, delete_coffee, get_coffee, index, list_coffees, update_coffee};
pub use health::{health_check, metrics_endpoint, readiness_check};
