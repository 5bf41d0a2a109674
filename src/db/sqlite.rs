use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    ConnectOptions, Connection, Sqlite,
};
use std::{path::Path, str::FromStr};

use super::OrderHistory;
use crate::{
    error::{RecommendError, RecommendResult},
    models::{Candidate, OrderFilter, ProductTotal},
};

/// Counts order lines per product over the orders matched by `$predicate`.
///
/// `$joins` attaches to `sop` only the tables the predicate reads: `sp`
/// (products) and/or `so` (orders).
macro_rules! candidate_sql {
    ($joins:literal, $predicate:literal) => {
        concat!(
            "SELECT op.product_id AS product_id, ",
            "COALESCE(p.product_name, '') AS product_name, ",
            "COUNT(op.order_id) AS count ",
            "FROM order_products op ",
            "LEFT JOIN products p ON op.product_id = p.product_id ",
            "WHERE op.order_id IN (",
            "SELECT sop.order_id FROM order_products sop ",
            $joins,
            "WHERE ",
            $predicate,
            ") GROUP BY op.product_id"
        )
    };
}

const CO_OCCURRENCE_SQL: &str = candidate_sql!(
    "LEFT JOIN products sp ON sop.product_id = sp.product_id ",
    "sp.product_name LIKE ? ESCAPE '\\'"
);

const TIME_OF_DAY_SQL: &str = candidate_sql!(
    "LEFT JOIN orders so ON sop.order_id = so.order_id ",
    "so.order_dow = ? AND so.order_hour_of_day = ?"
);

const CO_OCCURRENCE_OR_TIME_SQL: &str = candidate_sql!(
    "LEFT JOIN products sp ON sop.product_id = sp.product_id \
     LEFT JOIN orders so ON sop.order_id = so.order_id ",
    "sp.product_name LIKE ? ESCAPE '\\' OR (so.order_dow = ? AND so.order_hour_of_day = ?)"
);

const PRODUCT_TOTALS_SQL: &str = "SELECT product_id, COUNT(order_id) AS total \
                                  FROM order_products \
                                  GROUP BY product_id";

/// Builds a `LIKE` pattern matching `target` anywhere in a name
///
/// `%`, `_` and `\` in the target are escaped so they match literally.
pub fn contains_pattern(target: &str) -> String {
    let mut pattern = String::with_capacity(target.len() + 2);
    pattern.push('%');
    for c in target.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Connection descriptor for an order-history SQLite database
///
/// Parsing happens up front; a connection is only opened by [`DataSource::open`].
/// The database is always opened read-only and never created.
#[derive(Debug, Clone)]
pub struct DataSource {
    options: SqliteConnectOptions,
}

impl DataSource {
    /// Parses a `sqlite:` URL such as `sqlite://instacart.db`
    pub fn from_url(url: &str) -> RecommendResult<Self> {
        let options = SqliteConnectOptions::from_str(url).map_err(RecommendError::Connection)?;
        Ok(Self::with_options(options))
    }

    /// Points at a database file on disk
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::with_options(SqliteConnectOptions::new().filename(path))
    }

    fn with_options(options: SqliteConnectOptions) -> Self {
        Self {
            options: options.read_only(true).create_if_missing(false),
        }
    }

    /// Opens a fresh connection scoped to one recommendation call
    pub async fn open(&self) -> RecommendResult<SqliteOrderHistory> {
        let conn = self.options.connect().await.map_err(|e| {
            tracing::error!(
                filename = %self.options.get_filename().display(),
                error = %e,
                "Failed to open order database"
            );
            RecommendError::Connection(e)
        })?;

        tracing::debug!(
            filename = %self.options.get_filename().display(),
            "Opened order database"
        );

        Ok(SqliteOrderHistory { conn })
    }
}

/// Order history backed by a single SQLite connection
///
/// Dropping the value releases the connection; [`SqliteOrderHistory::close`]
/// does so explicitly and reports shutdown errors.
pub struct SqliteOrderHistory {
    conn: SqliteConnection,
}

impl SqliteOrderHistory {
    /// Closes the underlying connection
    ///
    /// Failures are logged rather than returned; the connection is gone either way.
    pub async fn close(self) {
        if let Err(e) = self.conn.close().await {
            tracing::warn!(error = %e, "Failed to close order database cleanly");
        }
    }
}

#[async_trait::async_trait]
impl OrderHistory for SqliteOrderHistory {
    async fn candidate_counts(&mut self, filter: &OrderFilter) -> RecommendResult<Vec<Candidate>> {
        let query = match filter {
            OrderFilter::CoOccurrence { target } => {
                sqlx::query_as::<Sqlite, Candidate>(CO_OCCURRENCE_SQL).bind(contains_pattern(target))
            }
            OrderFilter::TimeOfDay { time } => sqlx::query_as::<Sqlite, Candidate>(TIME_OF_DAY_SQL)
                .bind(i64::from(time.day_of_week()))
                .bind(i64::from(time.hour_of_day())),
            OrderFilter::CoOccurrenceOrTime { target, time } => {
                sqlx::query_as::<Sqlite, Candidate>(CO_OCCURRENCE_OR_TIME_SQL)
                    .bind(contains_pattern(target))
                    .bind(i64::from(time.day_of_week()))
                    .bind(i64::from(time.hour_of_day()))
            }
        };

        let rows = query
            .fetch_all(&mut self.conn)
            .await
            .map_err(RecommendError::Query)?;

        tracing::debug!(filter = ?filter, candidates = rows.len(), "Fetched candidate counts");

        Ok(rows)
    }

    async fn product_totals(&mut self) -> RecommendResult<Vec<ProductTotal>> {
        let rows = sqlx::query_as::<Sqlite, ProductTotal>(PRODUCT_TOTALS_SQL)
            .fetch_all(&mut self.conn)
            .await
            .map_err(RecommendError::Query)?;

        tracing::debug!(products = rows.len(), "Fetched product totals");

        Ok(rows)
    }
}
