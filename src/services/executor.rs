use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use crate::models::{Listing, PreferenceProfile};
use crate::services::postgres::{ListingStore, ListingStoreError};
use crate::services::query_generator::{QueryGenerator, QueryGeneratorError};

/// Errors from turning an enhanced query into listings
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Query generation failed: {0}")]
    Generation(#[from] QueryGeneratorError),

    #[error("Query execution failed: {0}")]
    Execution(#[from] ListingStoreError),
}

/// Listings produced for one enhanced query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryExecution {
    /// The statement that produced `listings`, for transparency in responses
    pub sql: String,
    pub listings: Vec<Listing>,
}

/// Turns an enhanced query into candidate listings
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(
        &self,
        enhanced_query: &str,
        preferences: &PreferenceProfile,
    ) -> Result<QueryExecution, ExecutorError>;
}

/// Generates SQL with a [`QueryGenerator`] and runs it against a [`ListingStore`]
pub struct SqlQueryExecutor {
    generator: QueryGenerator,
    store: Arc<ListingStore>,
}

impl SqlQueryExecutor {
    pub fn new(generator: QueryGenerator, store: Arc<ListingStore>) -> Self {
        Self { generator, store }
    }
}

#[async_trait]
impl QueryExecutor for SqlQueryExecutor {
    async fn execute(
        &self,
        enhanced_query: &str,
        preferences: &PreferenceProfile,
    ) -> Result<QueryExecution, ExecutorError> {
        let sql = self.generator.generate_sql(enhanced_query, preferences).await?;
        let listings = self.store.fetch_listings(&sql).await?;

        Ok(QueryExecution { sql, listings })
    }
}
