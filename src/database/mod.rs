pub mod manager;
pub mod query_builder;
pub mod store;

pub use manager::PgProvider;
pub use store::{PgStore, Scope};
