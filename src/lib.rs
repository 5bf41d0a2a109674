//! Product recommendations from historical order data.
//!
//! Three recommenders share one ranking core: products bought together with a
//! target product, products bought at a given day and hour, or both.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod services;

pub use db::DataSource;
pub use error::{RecommendError, RecommendResult};
pub use models::{RankingMode, Recommendation, TimeContext};
pub use services::{combo_recommend, run_all, similarity_recommend, time_recommend, RunParameters};
