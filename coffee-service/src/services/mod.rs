pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::CoffeeDb;
pub use memory::InMemoryCoffeeStore;
pub use metrics::{get_metrics, init_metrics};
pub use store::{CoffeeStore, StoreError};
