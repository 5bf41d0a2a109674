use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Candidate, ProductId, ProductTotal, RankingMode, Recommendation, ScoredCandidate};

/// Indexes overall product counts by product id
pub fn totals_by_product(totals: Vec<ProductTotal>) -> HashMap<ProductId, i64> {
    totals.into_iter().map(|t| (t.product_id, t.total)).collect()
}

/// Attaches the ranking score to each candidate
///
/// `Raw` scores by count. `Proportional` scores by count over the product's
/// overall count; a product with no recorded total is scored against its own
/// count.
pub fn score_candidates(
    candidates: Vec<Candidate>,
    ranking: RankingMode,
    totals: &HashMap<ProductId, i64>,
) -> Vec<ScoredCandidate> {
    candidates
        .into_iter()
        .map(|c| {
            let score = match ranking {
                RankingMode::Raw => c.count as f64,
                RankingMode::Proportional => {
                    let total = match totals.get(&c.product_id) {
                        Some(&total) if total > 0 => total,
                        _ => {
                            tracing::warn!(
                                product_id = c.product_id,
                                "Missing overall count for product, using subset count"
                            );
                            c.count.max(1)
                        }
                    };
                    c.count as f64 / total as f64
                }
            };

            ScoredCandidate {
                product_id: c.product_id,
                product_name: c.product_name,
                score,
            }
        })
        .collect()
}

/// Ordering for ranked candidates, ties broken by ascending product id
fn compare(ranking: RankingMode, a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    let by_score = match ranking {
        RankingMode::Raw => b.score.total_cmp(&a.score),
        RankingMode::Proportional => a.score.total_cmp(&b.score),
    };
    by_score.then_with(|| a.product_id.cmp(&b.product_id))
}

/// True when `product_name` contains `exclusion`, ignoring case
///
/// Folds full Unicode case. SQLite's `LIKE` only folds ASCII, which affects
/// which orders are selected but never which names are excluded.
pub fn is_self_match(product_name: &str, exclusion: &str) -> bool {
    product_name
        .to_lowercase()
        .contains(&exclusion.to_lowercase())
}

/// Sorts, removes self-matches and keeps the first `top_n`
pub fn rank(
    mut scored: Vec<ScoredCandidate>,
    ranking: RankingMode,
    exclusion: &str,
    top_n: usize,
) -> Vec<Recommendation> {
    scored.sort_by(|a, b| compare(ranking, a, b));

    scored
        .into_iter()
        .filter(|c| !is_self_match(&c.product_name, exclusion))
        .take(top_n)
        .map(Recommendation::from)
        .collect()
}
