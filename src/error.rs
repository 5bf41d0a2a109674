/// Errors surfaced by the recommenders
#[derive(thiserror::Error, Debug)]
pub enum RecommendError {
    /// The data source could not be parsed or opened
    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// A query failed, usually because the expected schema is missing
    #[error("Query error: {0}")]
    Query(#[source] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RecommendError {
    /// Short label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            RecommendError::Connection(_) => "connection",
            RecommendError::Query(_) => "query",
            RecommendError::InvalidInput(_) => "invalid_input",
        }
    }
}

pub type RecommendResult<T> = Result<T, RecommendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_category() {
        let err = RecommendError::Query(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("Query error:"));
        assert_eq!(err.kind(), "query");

        let err = RecommendError::InvalidInput("hour_of_day must be 0-23, got 24".to_string());
        assert_eq!(err.to_string(), "Invalid input: hour_of_day must be 0-23, got 24");
        assert_eq!(err.kind(), "invalid_input");
    }
}
