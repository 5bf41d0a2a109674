pub mod ranking;
pub mod recommender;
pub mod runner;

pub use recommender::{combo_recommend, recommend, similarity_recommend, time_recommend};
pub use runner::{run_all, RunParameters};
