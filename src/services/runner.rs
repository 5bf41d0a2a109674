use crate::{
    db::DataSource,
    error::RecommendResult,
    models::{query::DEFAULT_TOP_N, RankingMode, RecommendationQuery, TimeContext},
    report::RecommendationReport,
    services::recommender::recommend_from,
};

/// One parameter set shared by every recommender in a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub product_name: String,
    pub time: TimeContext,
    pub top_n: usize,
    pub ranking: RankingMode,
}

impl RunParameters {
    pub fn new(product_name: impl Into<String>, time: TimeContext) -> Self {
        Self {
            product_name: product_name.into(),
            time,
            top_n: DEFAULT_TOP_N,
            ranking: RankingMode::default(),
        }
    }

    /// Queries in run order: time, similarity, combo
    pub fn queries(&self) -> [RecommendationQuery; 3] {
        [
            RecommendationQuery::time(&self.product_name, self.time, self.top_n, self.ranking),
            RecommendationQuery::similarity(&self.product_name, self.top_n),
            RecommendationQuery::combo(&self.product_name, self.time, self.top_n, self.ranking),
        ]
    }
}

/// Runs all three recommenders for side-by-side inspection
///
/// Stops at the first failure.
pub async fn run_all(
    source: &DataSource,
    params: &RunParameters,
) -> RecommendResult<Vec<RecommendationReport>> {
    tracing::info!(
        product_name = %params.product_name,
        time = %params.time,
        top_n = params.top_n,
        ranking = ?params.ranking,
        "Running all recommenders"
    );

    let mut reports = Vec::with_capacity(3);
    for query in params.queries() {
        let recommendations = recommend_from(source, &query).await?;
        reports.push(RecommendationReport::new(query, recommendations));
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecommenderKind;

    #[test]
    fn test_run_order_and_defaults() {
        let params = RunParameters::new("Banana", TimeContext::new(0, 8).unwrap());
        assert_eq!(params.top_n, 3);
        assert_eq!(params.ranking, RankingMode::Proportional);

        let kinds: Vec<RecommenderKind> = params.queries().iter().map(|q| q.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommenderKind::Time,
                RecommenderKind::Similarity,
                RecommenderKind::Combo
            ]
        );
    }

    #[test]
    fn test_similarity_ignores_run_ranking() {
        let params = RunParameters::new("Banana", TimeContext::new(0, 8).unwrap());
        let queries = params.queries();
        assert_eq!(queries[1].ranking, RankingMode::Raw);
        assert_eq!(queries[2].ranking, RankingMode::Proportional);
    }
}
