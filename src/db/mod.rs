use crate::{
    error::RecommendResult,
    models::{Candidate, OrderFilter, ProductTotal},
};

pub mod sqlite;

pub use sqlite::{DataSource, SqliteOrderHistory};

/// Read-only access to historical order lines
///
/// Implementations answer the two questions the ranking core asks: how often
/// each product appears within a filtered set of orders, and how often it
/// appears overall.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait OrderHistory: Send {
    /// Order-line counts per product within the orders selected by `filter`
    async fn candidate_counts(&mut self, filter: &OrderFilter) -> RecommendResult<Vec<Candidate>>;

    /// Order-line counts per product across every order
    async fn product_totals(&mut self) -> RecommendResult<Vec<ProductTotal>>;
}
