//! Integration tests for the Inventory domain
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - Generated SQL is accepted by the server
//! - Soft-deleted rows stay invisible
//! - Filters and paging select the right rows
//! - Rating averages are computed in the database

use domain_inventory::service::filter_params;
use domain_inventory::*;
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn product(name: String, price: i32, weight: i32, available: bool) -> Product {
    Product {
        name,
        price,
        weight,
        available,
        ..Default::default()
    }
}

fn services(
    db: &TestDatabase,
) -> ProductService<PgProductRepository, PgRatingRepository> {
    let ratings = Arc::new(RatingService::new(PgRatingRepository::new(db.connection())));
    ProductService::new(PgProductRepository::new(db.connection()), ratings)
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_fetch_product() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_and_fetch");

    let name = builder.name("product", "main");
    let id = repo
        .create(product(name.clone(), builder.price(), builder.weight(), true))
        .await
        .unwrap();
    assert_uuid(&id, "product id");

    let fetched = assert_some(repo.fetch(&id).await.unwrap(), "product should exist");
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.name, name);
    assert_eq!(fetched.price, builder.price());
    assert_eq!(fetched.weight, builder.weight());
    assert!(fetched.available);
    assert!(!fetched.deleted);
    assert!(fetched.created_at.is_some());
    assert!(fetched.deleted_at.is_none());
}

#[tokio::test]
async fn test_create_rejects_invalid_product_without_writing() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let err = repo
        .create(product(String::new(), 0, 1, false))
        .await
        .unwrap_err();

    match err {
        InventoryError::Validation(fields) => {
            assert_eq!(fields.get("name"), Some(&["is empty".to_string()][..]));
            assert_eq!(fields.get("price"), Some(&["is required".to_string()][..]));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(db.count_rows("products").await, 0);
}

#[tokio::test]
async fn test_fetch_unknown_id_is_none() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    assert!(repo.fetch("no-such-product").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_overwrites_mutable_fields() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("update_fields");

    let id = repo
        .create(product(builder.name("product", "old"), 10, 1, false))
        .await
        .unwrap();
    let mut stored = repo.fetch(&id).await.unwrap().unwrap();
    stored.name = builder.name("product", "new");
    stored.price = 99;
    stored.available = true;

    repo.update(&id, stored).await.unwrap();

    let fetched = repo.fetch(&id).await.unwrap().unwrap();
    assert_eq!(fetched.name, builder.name("product", "new"));
    assert_eq!(fetched.price, 99);
    assert_eq!(fetched.weight, 1);
    assert!(fetched.available);
}

#[tokio::test]
async fn test_update_unknown_id_is_noop() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let ghost = Product {
        id: "ghost".to_string(),
        ..product("Ghost".to_string(), 1, 1, false)
    };
    repo.update("ghost", ghost).await.unwrap();

    assert_eq!(db.count_rows("products").await, 0);
}

#[tokio::test]
async fn test_soft_delete_hides_row_and_is_idempotent() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("soft_delete");

    let id = repo
        .create(product(builder.name("product", "gone"), 5, 5, true))
        .await
        .unwrap();

    repo.delete(&id).await.unwrap();
    repo.delete(&id).await.unwrap();

    assert!(repo.fetch(&id).await.unwrap().is_none());
    assert_eq!(repo.count().await.unwrap(), 0);
    assert!(repo.list(0, 20).await.unwrap().is_empty());
    // Row is kept, only flagged
    assert_eq!(db.count_rows("products").await, 1);
}

#[tokio::test]
async fn test_list_pages_oldest_first() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("list_pages");

    let mut ids = Vec::new();
    for i in 0..5 {
        let id = repo
            .create(product(builder.name("product", &i.to_string()), 10, 1, true))
            .await
            .unwrap();
        ids.push(id);
    }

    assert_eq!(repo.count().await.unwrap(), 5);

    let page: Vec<String> = repo
        .list(1, 2)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(page, ids[1..3].to_vec());

    assert!(repo.list(5, 2).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_breaks_created_at_ties_by_id() {
    use sea_orm::ConnectionTrait;

    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    db.connection
        .execute_unprepared(
            r#"INSERT INTO products ("id", "name", "price", "weight", "available", "created_at")
               VALUES ('c', 'C', 1, 1, TRUE, '2024-01-01T00:00:00Z'),
                      ('a', 'A', 1, 1, TRUE, '2024-01-01T00:00:00Z'),
                      ('b', 'B', 1, 1, TRUE, '2024-01-01T00:00:00Z')"#,
        )
        .await
        .unwrap();

    let mut seen = Vec::new();
    for skip in 0..3 {
        let page = repo.list(skip, 1).await.unwrap();
        seen.push(page[0].id.clone());
    }
    assert_eq!(seen, vec!["a", "b", "c"]);

    let query = FilterQuery::new().with("available", true);
    let page: Vec<String> = repo
        .search(&query, 1, 2)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(page, vec!["b", "c"]);
}

#[tokio::test]
async fn test_search_combines_filters() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let cheap = repo
        .create(product("Widget small".to_string(), 50, 1, true))
        .await
        .unwrap();
    repo.create(product("Widget large".to_string(), 500, 10, true))
        .await
        .unwrap();
    repo.create(product("Widget hidden".to_string(), 40, 1, false))
        .await
        .unwrap();
    repo.create(product("Gadget".to_string(), 10, 1, true))
        .await
        .unwrap();

    let query = FilterQuery::new()
        .with("name", "Widget%")
        .with("price", 100)
        .with("available", true);

    assert_eq!(repo.search_count(&query).await.unwrap(), 1);
    let found = repo.search(&query, 0, 20).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, cheap);
}

#[tokio::test]
async fn test_search_treats_hostile_name_as_data() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    repo.create(product("Widget".to_string(), 10, 1, true))
        .await
        .unwrap();

    let query = FilterQuery::new().with("name", "x' OR '1'='1");
    assert_eq!(repo.search_count(&query).await.unwrap(), 0);
    assert!(repo.search(&query, 0, 20).await.unwrap().is_empty());
    assert_eq!(db.count_rows("products").await, 1);
}

#[tokio::test]
async fn test_rating_average() {
    let db = TestDatabase::new().await;
    let ratings = PgRatingRepository::new(db.connection());

    let by_product = FilterQuery::new().with("product_id", "p-1");
    assert_close(
        ratings.avg(&by_product, RatingField::Value).await.unwrap(),
        0.0,
        "no ratings",
    );

    for value in [5, 4, 4] {
        let id = ratings
            .create(Rating {
                product_id: "p-1".to_string(),
                value,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_uuid(&id, "rating id");
    }
    ratings
        .create(Rating {
            product_id: "p-2".to_string(),
            value: 1,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_close(
        ratings.avg(&by_product, RatingField::Value).await.unwrap(),
        13.0 / 3.0,
        "p-1 average",
    );
    assert_close(
        ratings
            .avg(&FilterQuery::new(), RatingField::Value)
            .await
            .unwrap(),
        14.0 / 4.0,
        "overall average",
    );
}

#[tokio::test]
async fn test_rating_out_of_range_is_rejected() {
    let db = TestDatabase::new().await;
    let ratings = PgRatingRepository::new(db.connection());

    let result = ratings
        .create(Rating {
            product_id: "p-1".to_string(),
            value: 6,
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(InventoryError::Validation(_))));
    assert_eq!(db.count_rows("ratings").await, 0);
}

#[tokio::test]
async fn test_custom_table_names() {
    let db = TestDatabase::with_schema("inventory_alt").await;
    let repo = PgProductRepository::new(db.connection()).with_table("inventory_alt.products");

    let id = repo
        .create(product("Widget".to_string(), 1, 1, false))
        .await
        .unwrap();

    assert!(repo.fetch(&id).await.unwrap().is_some());
    assert_eq!(db.count_rows("inventory_alt.products").await, 1);
    assert_eq!(db.count_rows("products").await, 0);
}

// ============================================================================
// Service Tests
// ============================================================================

#[tokio::test]
async fn test_service_page_with_query_filters() {
    let db = TestDatabase::new().await;
    let service = services(&db);

    for (name, price) in [("A", 10), ("B", 20), ("C", 300)] {
        service
            .add(product(name.to_string(), price, 1, true))
            .await
            .unwrap();
    }

    let params = filter_params([("price", "100"), ("price", "1"), ("weight", "nope")]);
    let page = service.page(&params, 0, 20).await.unwrap();

    assert_eq!(page.pager.total, 2);
    assert_eq!(page.pager.take, 2);
    let names: Vec<&str> = page.items.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn test_service_patch_keeps_absent_fields() {
    let db = TestDatabase::new().await;
    let service = services(&db);

    let id = service
        .add(product("Widget".to_string(), 100, 7, true))
        .await
        .unwrap();

    let returned = service
        .patch(
            &id,
            ProductPatch {
                price: Some(250),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(returned, id);

    let stored = service.get(&id).await.unwrap();
    assert_eq!(stored.name, "Widget");
    assert_eq!(stored.price, 250);
    assert_eq!(stored.weight, 7);
    assert!(stored.available);
}

#[tokio::test]
async fn test_service_rate_flow() {
    let db = TestDatabase::new().await;
    let service = services(&db);

    let id = service
        .add(product("Widget".to_string(), 100, 1, true))
        .await
        .unwrap();

    service.rate(&id, 5).await.unwrap();
    service.rate(&id, 2).await.unwrap();

    let view = service.view(&id).await.unwrap();
    assert_close(view.avg_rating, 3.5, "average rating");

    let missing = service.rate("missing", 3).await;
    assert!(matches!(missing, Err(InventoryError::NotFound("product"))));
    assert_eq!(db.count_rows("ratings").await, 2);
}
