//! Console presentation of recommendation results
//!
//! Everything here turns already-computed results into strings; nothing
//! touches the database or writes to stdout.

use serde::{Deserialize, Serialize};

use crate::models::{Recommendation, RecommendationQuery, RecommenderKind};

/// How reports are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Result of one recommender call together with the query that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationReport {
    pub query: RecommendationQuery,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    kind: RecommenderKind,
    product_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    day_of_week: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hour_of_day: Option<u8>,
    top_n: usize,
    recommendations: &'a [Recommendation],
}

impl RecommendationReport {
    pub fn new(query: RecommendationQuery, recommendations: Vec<Recommendation>) -> Self {
        Self {
            query,
            recommendations,
        }
    }

    pub fn render(&self, format: OutputFormat) -> serde_json::Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => self.to_json(),
        }
    }

    /// Header line followed by the result table
    pub fn to_text(&self) -> String {
        format!("{}\n{}", header(&self.query), render_table(&self.recommendations))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&ReportJson {
            kind: self.query.kind,
            product_name: &self.query.product_name,
            day_of_week: self.query.time.map(|t| t.day_of_week()),
            hour_of_day: self.query.time.map(|t| t.hour_of_day()),
            top_n: self.query.top_n,
            recommendations: &self.recommendations,
        })
    }
}

/// Describes the operation and its parameters
pub fn header(query: &RecommendationQuery) -> String {
    let name = &query.product_name;
    match (query.kind, query.time) {
        (RecommenderKind::Similarity, _) => format!("Similar suggestions for {}", name),
        (RecommenderKind::Time, Some(time)) => {
            format!("Time-based suggestions for {}, {}", name, time)
        }
        (RecommenderKind::Combo, Some(time)) => {
            format!("Combined suggestions for {}, {}", name, time)
        }
        (RecommenderKind::Time, None) => format!("Time-based suggestions for {}", name),
        (RecommenderKind::Combo, None) => format!("Combined suggestions for {}", name),
    }
}

/// Two-column table with right-aligned ids
pub fn render_table(recommendations: &[Recommendation]) -> String {
    const ID_HEADER: &str = "product_id";

    if recommendations.is_empty() {
        return "(no recommendations)".to_string();
    }

    let id_width = recommendations
        .iter()
        .map(|r| r.product_id.to_string().len())
        .chain(std::iter::once(ID_HEADER.len()))
        .max()
        .unwrap_or(ID_HEADER.len());

    let mut lines = Vec::with_capacity(recommendations.len() + 1);
    lines.push(format!("{:>width$}  product_name", ID_HEADER, width = id_width));
    for rec in recommendations {
        lines.push(format!(
            "{:>width$}  {}",
            rec.product_id,
            rec.product_name,
            width = id_width
        ));
    }
    lines.join("\n")
}
