// Service exports
pub mod chat;
pub mod executor;
pub mod policy;
pub mod postgres;
pub mod query_generator;
pub mod sessions;

pub use chat::ChatService;
pub use executor::{ExecutorError, QueryExecution, QueryExecutor, SqlQueryExecutor};
pub use policy::{HttpPolicyClient, PolicyAnswerer, PolicyError};
pub use postgres::{ListingStore, ListingStoreError};
pub use query_generator::{QueryGenerator, QueryGeneratorError};
pub use sessions::{SessionError, SessionHandle, SessionKey, SessionStore};
