pub mod coercion;
pub mod config;
pub mod datatypes;
pub mod intersection;
pub mod notify;
pub mod orchestrator;
pub mod schema_cache;
pub mod store;

mod error;
pub use error::ClientError;
pub use error::ClientResult;
pub use error::ValidationError;

#[macro_use]
mod gen_helpers;
