use std::collections::HashMap;
use std::time::Instant;

use crate::{
    db::{DataSource, OrderHistory},
    error::RecommendResult,
    models::{RankingMode, Recommendation, RecommendationQuery, TimeContext},
    services::ranking,
};

/// Runs one recommendation query against an open order history
///
/// All three recommenders go through here; they differ only in the order
/// filter and ranking mode carried by `query`. Self-matches are removed by
/// `query.product_name` whatever the filter.
pub async fn recommend(
    history: &mut dyn OrderHistory,
    query: &RecommendationQuery,
) -> RecommendResult<Vec<Recommendation>> {
    let start = Instant::now();
    let filter = query.filter()?;

    let candidates = history.candidate_counts(&filter).await?;
    let candidate_count = candidates.len();

    let totals = match query.ranking {
        RankingMode::Proportional if !candidates.is_empty() => {
            ranking::totals_by_product(history.product_totals().await?)
        }
        _ => HashMap::new(),
    };

    let scored = ranking::score_candidates(candidates, query.ranking, &totals);
    let recommendations = ranking::rank(scored, query.ranking, &query.product_name, query.top_n);

    tracing::info!(
        kind = %query.kind,
        candidates = candidate_count,
        returned = recommendations.len(),
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendations computed"
    );

    Ok(recommendations)
}

/// Opens a connection, runs `query`, and closes the connection on every path
pub async fn recommend_from(
    source: &DataSource,
    query: &RecommendationQuery,
) -> RecommendResult<Vec<Recommendation>> {
    let mut history = source.open().await?;
    let result = recommend(&mut history, query).await;
    history.close().await;

    if let Err(e) = &result {
        tracing::error!(kind = %query.kind, error = %e, error_kind = e.kind(), "Recommendation failed");
    }

    result
}

/// Products bought with `product_name` or at the given day and hour
#[tracing::instrument(skip(source))]
pub async fn combo_recommend(
    source: &DataSource,
    product_name: &str,
    time: TimeContext,
    top_n: usize,
    ranking: RankingMode,
) -> RecommendResult<Vec<Recommendation>> {
    recommend_from(
        source,
        &RecommendationQuery::combo(product_name, time, top_n, ranking),
    )
    .await
}

/// Products bought with `product_name`, ranked by raw count
#[tracing::instrument(skip(source))]
pub async fn similarity_recommend(
    source: &DataSource,
    product_name: &str,
    top_n: usize,
) -> RecommendResult<Vec<Recommendation>> {
    recommend_from(source, &RecommendationQuery::similarity(product_name, top_n)).await
}

/// Products bought at the given day and hour
///
/// `product_name` only removes self-matches; it does not select orders.
#[tracing::instrument(skip(source))]
pub async fn time_recommend(
    source: &DataSource,
    product_name: &str,
    time: TimeContext,
    top_n: usize,
    ranking: RankingMode,
) -> RecommendResult<Vec<Recommendation>> {
    recommend_from(
        source,
        &RecommendationQuery::time(product_name, time, top_n, ranking),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockOrderHistory;
    use crate::error::RecommendError;
    use crate::models::{Candidate, OrderFilter, ProductTotal};

    fn candidate(id: i64, name: &str, count: i64) -> Candidate {
        Candidate {
            product_id: id,
            product_name: name.to_string(),
            count,
        }
    }

    #[tokio::test]
    async fn test_similarity_skips_totals_query() {
        let mut history = MockOrderHistory::new();
        history
            .expect_candidate_counts()
            .withf(|filter| {
                *filter
                    == OrderFilter::CoOccurrence {
                        target: "Banana".to_string(),
                    }
            })
            .times(1)
            .returning(|_| Ok(vec![candidate(1, "Banana", 10), candidate(2, "Milk", 6)]));
        history.expect_product_totals().never();

        let query = RecommendationQuery::similarity("Banana", 1);
        let recs = recommend(&mut history, &query).await.unwrap();

        assert_eq!(
            recs,
            vec![Recommendation {
                product_id: 2,
                product_name: "Milk".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_proportional_combo_uses_totals() {
        let time = TimeContext::new(0, 8).unwrap();
        let mut history = MockOrderHistory::new();
        history
            .expect_candidate_counts()
            .withf(move |filter| {
                *filter
                    == OrderFilter::CoOccurrenceOrTime {
                        target: "Target".to_string(),
                        time,
                    }
            })
            .times(1)
            .returning(|_| {
                Ok(vec![
                    candidate(1, "Target", 5),
                    candidate(2, "B", 3),
                    candidate(3, "A", 5),
                ])
            });
        history.expect_product_totals().times(1).returning(|| {
            Ok(vec![
                ProductTotal { product_id: 1, total: 5 },
                ProductTotal { product_id: 2, total: 6 },
                ProductTotal { product_id: 3, total: 50 },
            ])
        });

        let query = RecommendationQuery::combo("Target", time, 3, RankingMode::Proportional);
        let recs = recommend(&mut history, &query).await.unwrap();

        let ids: Vec<i64> = recs.iter().map(|r| r.product_id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_empty_candidates_skip_totals_query() {
        let mut history = MockOrderHistory::new();
        history
            .expect_candidate_counts()
            .times(1)
            .returning(|_| Ok(vec![]));
        history.expect_product_totals().never();

        let query = RecommendationQuery::time(
            "Banana",
            TimeContext::new(0, 8).unwrap(),
            3,
            RankingMode::Proportional,
        );
        let recs = recommend(&mut history, &query).await.unwrap();
        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_query_error_propagates() {
        let mut history = MockOrderHistory::new();
        history
            .expect_candidate_counts()
            .returning(|_| Err(RecommendError::Query(sqlx::Error::RowNotFound)));

        let query = RecommendationQuery::similarity("Banana", 3);
        let err = recommend(&mut history, &query).await.unwrap_err();
        assert!(matches!(err, RecommendError::Query(_)));
    }
}
