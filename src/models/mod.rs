use serde::{Deserialize, Serialize};

pub mod query;

pub use query::{OrderFilter, RankingMode, RecommendationQuery, RecommenderKind, TimeContext};

/// Product identifier as stored in `products.product_id`
pub type ProductId = i64;

/// A product counted within the filtered order set
///
/// `count` is the number of order lines naming the product, so a product
/// listed twice in one order counts twice.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Candidate {
    pub product_id: ProductId,
    pub product_name: String,
    pub count: i64,
}

/// Total order-line count for one product across the whole dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct ProductTotal {
    pub product_id: ProductId,
    pub total: i64,
}

/// Candidate with the score it is ranked by
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub product_id: ProductId,
    pub product_name: String,
    pub score: f64,
}

/// A single recommended product returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product_id: ProductId,
    pub product_name: String,
}

impl From<ScoredCandidate> for Recommendation {
    fn from(scored: ScoredCandidate) -> Self {
        Self {
            product_id: scored.product_id,
            product_name: scored.product_name,
        }
    }
}
