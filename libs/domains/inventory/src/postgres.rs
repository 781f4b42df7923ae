//! PostgreSQL repositories.
//!
//! Every caller-supplied value is bound as a positional parameter. Only the
//! configured table name and whitelisted column names are part of the SQL text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement, Value};
use tracing::instrument;
use uuid::Uuid;

use crate::error::InventoryResult;
use crate::models::{Product, Rating};
use crate::query::{FilterQuery, product_predicate, rating_predicate};
use crate::repository::{ProductRepository, RatingField, RatingRepository};
use crate::validation::validate;

pub const PRODUCTS_TABLE: &str = "products";
pub const RATINGS_TABLE: &str = "ratings";

const PRODUCT_COLUMNS: &str = r#""id", "name", "price", "weight", "available", "deleted", "created_at", "updated_at", "deleted_at""#;

#[derive(Debug, FromQueryResult)]
struct ProductRow {
    id: String,
    name: String,
    price: i32,
    weight: i32,
    available: bool,
    deleted: bool,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price: row.price,
            weight: row.weight,
            available: row.available,
            deleted: row.deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct AvgRow {
    avg: Option<f64>,
}

fn statement(sql: String, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

fn bound(n: u64) -> Value {
    i64::try_from(n).unwrap_or(i64::MAX).into()
}

/// [`ProductRepository`] over a sea-orm connection.
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
    table: String,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            table: PRODUCTS_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    async fn select(&self, sql: String, values: Vec<Value>) -> InventoryResult<Vec<Product>> {
        let rows = ProductRow::find_by_statement(statement(sql, values))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn count_where(&self, sql: String, values: Vec<Value>) -> InventoryResult<u64> {
        let count = CountRow::find_by_statement(statement(sql, values))
            .one(&self.db)
            .await?
            .map_or(0, |row| row.count);
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create(&self, mut product: Product) -> InventoryResult<String> {
        product.id = Uuid::now_v7().to_string();
        validate(&product)?;

        let sql = format!(
            r#"INSERT INTO {} ("id", "name", "price", "weight", "available") VALUES ($1, $2, $3, $4, $5)"#,
            self.table
        );
        let values = vec![
            product.id.clone().into(),
            product.name.into(),
            product.price.into(),
            product.weight.into(),
            product.available.into(),
        ];
        self.db.execute_raw(statement(sql, values)).await?;

        Ok(product.id)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, id: &str) -> InventoryResult<Option<Product>> {
        let sql = format!(
            r#"SELECT {PRODUCT_COLUMNS} FROM {} WHERE "id" = $1 AND "deleted" = FALSE"#,
            self.table
        );
        let row = ProductRow::find_by_statement(statement(sql, vec![id.into()]))
            .one(&self.db)
            .await?;
        Ok(row.map(Product::from))
    }

    #[instrument(skip(self, product))]
    async fn update(&self, id: &str, product: Product) -> InventoryResult<()> {
        validate(&product)?;

        let sql = format!(
            r#"UPDATE {} SET ("name", "price", "weight", "available", "updated_at") = ($1, $2, $3, $4, CURRENT_TIMESTAMP) WHERE "id" = $5 AND "deleted" = FALSE"#,
            self.table
        );
        let values = vec![
            product.name.into(),
            product.price.into(),
            product.weight.into(),
            product.available.into(),
            id.into(),
        ];
        self.db.execute_raw(statement(sql, values)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> InventoryResult<()> {
        let sql = format!(
            r#"UPDATE {} SET ("deleted", "deleted_at") = (TRUE, CURRENT_TIMESTAMP) WHERE "id" = $1 AND "deleted" = FALSE"#,
            self.table
        );
        self.db
            .execute_raw(statement(sql, vec![id.into()]))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, skip: u64, limit: u64) -> InventoryResult<Vec<Product>> {
        let sql = format!(
            r#"SELECT {PRODUCT_COLUMNS} FROM {} WHERE "deleted" = FALSE ORDER BY "created_at", "id" OFFSET $1 LIMIT $2"#,
            self.table
        );
        self.select(sql, vec![bound(skip), bound(limit)]).await
    }

    #[instrument(skip(self))]
    async fn count(&self) -> InventoryResult<u64> {
        let sql = format!(
            r#"SELECT COUNT(*) AS "count" FROM {} WHERE "deleted" = FALSE"#,
            self.table
        );
        self.count_where(sql, Vec::new()).await
    }

    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &FilterQuery,
        skip: u64,
        limit: u64,
    ) -> InventoryResult<Vec<Product>> {
        let predicate = product_predicate(query, 1);
        let mut sql = format!(
            r#"SELECT {PRODUCT_COLUMNS} FROM {} WHERE "deleted" = FALSE"#,
            self.table
        );
        if !predicate.is_empty() {
            sql.push_str(" AND ");
            sql.push_str(&predicate.sql);
        }

        let mut values = predicate.values;
        sql.push_str(&format!(
            r#" ORDER BY "created_at", "id" OFFSET ${} LIMIT ${}"#,
            values.len() + 1,
            values.len() + 2
        ));
        values.push(bound(skip));
        values.push(bound(limit));

        self.select(sql, values).await
    }

    #[instrument(skip(self))]
    async fn search_count(&self, query: &FilterQuery) -> InventoryResult<u64> {
        let predicate = product_predicate(query, 1);
        let mut sql = format!(
            r#"SELECT COUNT(*) AS "count" FROM {} WHERE "deleted" = FALSE"#,
            self.table
        );
        if !predicate.is_empty() {
            sql.push_str(" AND ");
            sql.push_str(&predicate.sql);
        }
        self.count_where(sql, predicate.values).await
    }
}

/// [`RatingRepository`] over a sea-orm connection.
#[derive(Clone)]
pub struct PgRatingRepository {
    db: DatabaseConnection,
    table: String,
}

impl PgRatingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            table: RATINGS_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

#[async_trait]
impl RatingRepository for PgRatingRepository {
    #[instrument(skip(self, rating), fields(product_id = %rating.product_id))]
    async fn create(&self, mut rating: Rating) -> InventoryResult<String> {
        rating.id = Uuid::now_v7().to_string();
        validate(&rating)?;

        let sql = format!(
            r#"INSERT INTO {} ("id", "product_id", "value") VALUES ($1, $2, $3)"#,
            self.table
        );
        let values = vec![
            rating.id.clone().into(),
            rating.product_id.into(),
            rating.value.into(),
        ];
        self.db.execute_raw(statement(sql, values)).await?;

        Ok(rating.id)
    }

    #[instrument(skip(self))]
    async fn avg(&self, query: &FilterQuery, field: RatingField) -> InventoryResult<f64> {
        // AVG over integers is NUMERIC; cast so it decodes as f64.
        let mut sql = format!(
            r#"SELECT AVG("{}")::float8 AS "avg" FROM {}"#,
            field.column(),
            self.table
        );
        let predicate = rating_predicate(query, 1);
        if !predicate.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate.sql);
        }

        let avg = AvgRow::find_by_statement(statement(sql, predicate.values))
            .one(&self.db)
            .await?
            .and_then(|row| row.avg)
            .unwrap_or(0.0);
        Ok(avg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InventoryError;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};
    use std::collections::BTreeMap;

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn tx(sql: &str, values: Vec<Value>) -> Transaction {
        Transaction::from_sql_and_values(DatabaseBackend::Postgres, sql, values)
    }

    fn product_row(id: &str, name: &str) -> BTreeMap<&'static str, Value> {
        let created: DateTime<Utc> = "2024-05-01T10:00:00Z".parse().unwrap();
        BTreeMap::from([
            ("id", id.into()),
            ("name", name.into()),
            ("price", 100.into()),
            ("weight", 2.into()),
            ("available", true.into()),
            ("deleted", false.into()),
            ("created_at", Some(created).into()),
            ("updated_at", Some(created).into()),
            ("deleted_at", None::<DateTime<Utc>>.into()),
        ])
    }

    fn widget() -> Product {
        Product {
            name: "Widget".to_string(),
            price: 100,
            weight: 1,
            available: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_binds_every_field() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok()])
            .into_connection();
        let repo = PgProductRepository::new(db.clone());

        let id = repo.create(widget()).await.unwrap();
        assert!(Uuid::parse_str(&id).is_ok());

        assert_eq!(
            db.into_transaction_log(),
            vec![tx(
                r#"INSERT INTO products ("id", "name", "price", "weight", "available") VALUES ($1, $2, $3, $4, $5)"#,
                vec![
                    id.into(),
                    "Widget".into(),
                    100.into(),
                    1.into(),
                    true.into()
                ],
            )]
        );
    }

    #[tokio::test]
    async fn test_create_invalid_product_never_reaches_store() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgProductRepository::new(db.clone());

        let err = repo
            .create(Product {
                id: "caller-supplied".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        match err {
            InventoryError::Validation(fields) => {
                assert!(fields.get("id").is_none());
                assert_eq!(fields.get("name").unwrap(), ["is empty"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_name_is_bound_not_interpolated() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok()])
            .into_connection();
        let repo = PgProductRepository::new(db.clone());

        let hostile = "x'); DROP TABLE products; --";
        let id = repo
            .create(Product {
                name: hostile.to_string(),
                ..widget()
            })
            .await
            .unwrap();

        let log = db.into_transaction_log();
        assert_eq!(
            log,
            vec![tx(
                r#"INSERT INTO products ("id", "name", "price", "weight", "available") VALUES ($1, $2, $3, $4, $5)"#,
                vec![
                    id.into(),
                    hostile.into(),
                    100.into(),
                    1.into(),
                    true.into()
                ],
            )]
        );
    }

    #[tokio::test]
    async fn test_fetch_maps_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product_row("p-1", "Widget")]])
            .into_connection();
        let repo = PgProductRepository::new(db.clone());

        let product = repo.fetch("p-1").await.unwrap().unwrap();
        assert_eq!(product.id, "p-1");
        assert_eq!(product.name, "Widget");
        assert_eq!((product.price, product.weight), (100, 2));
        assert!(product.available);
        assert!(!product.deleted);
        assert!(product.deleted_at.is_none());

        assert_eq!(
            db.into_transaction_log(),
            vec![tx(
                &format!(
                    r#"SELECT {PRODUCT_COLUMNS} FROM products WHERE "id" = $1 AND "deleted" = FALSE"#
                ),
                vec!["p-1".into()],
            )]
        );
    }

    #[tokio::test]
    async fn test_fetch_absent_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(repo.fetch("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_is_scoped_to_live_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let repo = PgProductRepository::new(db.clone()).with_table("inventory_products");

        let product = Product {
            id: "p-1".to_string(),
            ..widget()
        };
        // Zero rows affected is still success.
        repo.update("p-1", product).await.unwrap();

        assert_eq!(
            db.into_transaction_log(),
            vec![tx(
                r#"UPDATE inventory_products SET ("name", "price", "weight", "available", "updated_at") = ($1, $2, $3, $4, CURRENT_TIMESTAMP) WHERE "id" = $5 AND "deleted" = FALSE"#,
                vec![
                    "Widget".into(),
                    100.into(),
                    1.into(),
                    true.into(),
                    "p-1".into()
                ],
            )]
        );
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_replacement() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgProductRepository::new(db.clone());

        let err = repo
            .update(
                "p-1",
                Product {
                    id: "p-1".to_string(),
                    price: 0,
                    ..widget()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, InventoryError::Validation(ref f) if f.get("price").is_some()));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_delete_twice_succeeds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                exec_ok(),
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgProductRepository::new(db.clone());

        repo.delete("p-1").await.unwrap();
        repo.delete("p-1").await.unwrap();

        let sql = r#"UPDATE products SET ("deleted", "deleted_at") = (TRUE, CURRENT_TIMESTAMP) WHERE "id" = $1 AND "deleted" = FALSE"#;
        assert_eq!(
            db.into_transaction_log(),
            vec![tx(sql, vec!["p-1".into()]), tx(sql, vec!["p-1".into()])]
        );
    }

    #[tokio::test]
    async fn test_list_binds_offset_and_limit() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product_row("p-1", "A"), product_row("p-2", "B")]])
            .into_connection();
        let repo = PgProductRepository::new(db.clone());

        let products = repo.list(10, 2).await.unwrap();
        assert_eq!(
            products.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            ["p-1", "p-2"]
        );

        assert_eq!(
            db.into_transaction_log(),
            vec![tx(
                &format!(
                    r#"SELECT {PRODUCT_COLUMNS} FROM products WHERE "deleted" = FALSE ORDER BY "created_at", "id" OFFSET $1 LIMIT $2"#
                ),
                vec![10i64.into(), 2i64.into()],
            )]
        );
    }

    #[tokio::test]
    async fn test_search_appends_predicate_before_paging() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product_row("p-1", "Widget")]])
            .into_connection();
        let repo = PgProductRepository::new(db.clone());

        let query = FilterQuery::new().with("weight", 5).with("available", true);
        repo.search(&query, 0, 20).await.unwrap();

        assert_eq!(
            db.into_transaction_log(),
            vec![tx(
                &format!(
                    r#"SELECT {PRODUCT_COLUMNS} FROM products WHERE "deleted" = FALSE AND "weight" <= $1 AND "available" = $2 ORDER BY "created_at", "id" OFFSET $3 LIMIT $4"#
                ),
                vec![5.into(), true.into(), 0i64.into(), 20i64.into()],
            )]
        );
    }

    #[tokio::test]
    async fn test_count_and_search_count() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![BTreeMap::from([("count", Value::from(7i64))])],
                vec![BTreeMap::from([("count", Value::from(2i64))])],
            ])
            .into_connection();
        let repo = PgProductRepository::new(db.clone());

        assert_eq!(repo.count().await.unwrap(), 7);
        let query = FilterQuery::new().with("name", "Wid%");
        assert_eq!(repo.search_count(&query).await.unwrap(), 2);

        assert_eq!(
            db.into_transaction_log(),
            vec![
                tx(
                    r#"SELECT COUNT(*) AS "count" FROM products WHERE "deleted" = FALSE"#,
                    vec![]
                ),
                tx(
                    r#"SELECT COUNT(*) AS "count" FROM products WHERE "deleted" = FALSE AND "name" LIKE $1"#,
                    vec!["Wid%".into()]
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_database_error() {
        // No queued result makes the mock fail the query.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgProductRepository::new(db);

        assert!(matches!(
            repo.count().await,
            Err(InventoryError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_rating_create_binds_values() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok()])
            .into_connection();
        let repo = PgRatingRepository::new(db.clone());

        let id = repo
            .create(Rating {
                product_id: "p-1".to_string(),
                value: 4,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            db.into_transaction_log(),
            vec![tx(
                r#"INSERT INTO ratings ("id", "product_id", "value") VALUES ($1, $2, $3)"#,
                vec![id.into(), "p-1".into(), 4.into()],
            )]
        );
    }

    #[tokio::test]
    async fn test_rating_create_rejects_out_of_range() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgRatingRepository::new(db);

        let err = repo
            .create(Rating {
                product_id: "p-1".to_string(),
                value: 6,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Validation(ref f) if f.get("value").is_some()));
    }

    #[tokio::test]
    async fn test_avg_scoped_by_product() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([("avg", Value::from(Some(3.5f64)))])]])
            .into_connection();
        let repo = PgRatingRepository::new(db.clone());

        let query = FilterQuery::new().with("product_id", "p-1");
        assert_eq!(repo.avg(&query, RatingField::Value).await.unwrap(), 3.5);

        assert_eq!(
            db.into_transaction_log(),
            vec![tx(
                r#"SELECT AVG("value")::float8 AS "avg" FROM ratings WHERE "product_id" = $1"#,
                vec!["p-1".into()],
            )]
        );
    }

    #[tokio::test]
    async fn test_avg_of_no_rows_is_zero() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([("avg", Value::from(None::<f64>))])]])
            .into_connection();
        let repo = PgRatingRepository::new(db.clone());

        assert_eq!(
            repo.avg(&FilterQuery::new(), RatingField::Value)
                .await
                .unwrap(),
            0.0
        );
        assert_eq!(
            db.into_transaction_log(),
            vec![tx(
                r#"SELECT AVG("value")::float8 AS "avg" FROM ratings"#,
                vec![]
            )]
        );
    }
}
