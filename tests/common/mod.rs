use basket_recs::DataSource;
use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions, Connection};
use tempfile::TempDir;

/// A seeded order database living in a temporary directory
pub struct Fixture {
    _dir: TempDir,
    pub source: DataSource,
}

#[derive(Default)]
pub struct OrderData {
    products: Vec<(i64, String)>,
    orders: Vec<(i64, u8, u8, Vec<i64>)>,
}

impl OrderData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product(mut self, product_id: i64, name: &str) -> Self {
        self.products.push((product_id, name.to_string()));
        self
    }

    /// Adds an order with one line per entry in `lines`; repeats are kept
    pub fn order(mut self, order_id: i64, dow: u8, hour: u8, lines: &[i64]) -> Self {
        self.orders.push((order_id, dow, hour, lines.to_vec()));
        self
    }

    pub async fn build(self) -> Fixture {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("orders.db");

        let mut conn = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .connect()
            .await
            .expect("create database");

        for ddl in [
            "CREATE TABLE orders (order_id INTEGER PRIMARY KEY, order_dow INTEGER, order_hour_of_day INTEGER)",
            "CREATE TABLE products (product_id INTEGER PRIMARY KEY, product_name TEXT)",
            "CREATE TABLE order_products (order_id INTEGER, product_id INTEGER)",
        ] {
            sqlx::query(ddl).execute(&mut conn).await.expect("create table");
        }

        for (product_id, name) in &self.products {
            sqlx::query("INSERT INTO products (product_id, product_name) VALUES (?, ?)")
                .bind(product_id)
                .bind(name)
                .execute(&mut conn)
                .await
                .expect("insert product");
        }

        for (order_id, dow, hour, lines) in &self.orders {
            sqlx::query("INSERT INTO orders (order_id, order_dow, order_hour_of_day) VALUES (?, ?, ?)")
                .bind(order_id)
                .bind(i64::from(*dow))
                .bind(i64::from(*hour))
                .execute(&mut conn)
                .await
                .expect("insert order");

            for product_id in lines {
                sqlx::query("INSERT INTO order_products (order_id, product_id) VALUES (?, ?)")
                    .bind(order_id)
                    .bind(product_id)
                    .execute(&mut conn)
                    .await
                    .expect("insert order line");
            }
        }

        conn.close().await.expect("close seed connection");

        Fixture {
            source: DataSource::from_path(&path),
            _dir: dir,
        }
    }
}
