//! Integration tests for the repository layer
//!
//! The in-memory adapter runs everywhere. The PostgreSQL tests need a
//! database and are ignored by default:
//!
//! ```text
//! DATABASE_URL=postgres://... cargo test -- --ignored
//! ```

use promptdeck_api::domain::repositories::TemplateRepository;
use promptdeck_api::domain::template::{
    Template, TemplateError, TemplateFields, TemplateGateway, TemplatePatch,
};
use promptdeck_api::infrastructure::repositories::{
    InMemoryTemplateRepository, PostgresTemplateRepository,
};
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Set up test database connection pool with migrations applied
async fn setup_test_db() -> PgPool {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for integration tests");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn fields(title: &str, content: &str) -> TemplateFields {
    TemplateFields {
        title: title.to_string(),
        content: content.to_string(),
        variables: BTreeMap::from([("name".to_string(), "Ada".to_string())]),
        ..Default::default()
    }
}

/// Exercises a repository through the gateway; shared by both adapters
async fn gateway_round_trip(repository: Arc<dyn TemplateRepository>) {
    let gateway = TemplateGateway::new(repository);
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let created = gateway
        .create(owner, fields("Greeting", "Hello {{name}}"))
        .await
        .expect("create");
    assert_eq!(created.owner_id(), owner);
    assert_eq!(created.tags(), Some("professional,markdown,assistant"));

    let found = gateway
        .get_by_id(owner, created.id())
        .await
        .expect("get")
        .expect("template exists");
    assert_eq!(found.content(), "Hello {{name}}");
    assert_eq!(found.variables().get("name").map(String::as_str), Some("Ada"));
    assert_eq!(found.resolved(), "Hello Ada");

    // Another user cannot see or touch it
    assert!(gateway.get_by_id(stranger, created.id()).await.unwrap().is_none());
    let result = gateway
        .update(
            stranger,
            created.id(),
            TemplatePatch {
                title: Some("stolen".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert_eq!(result.err(), Some(TemplateError::NotFound));
    assert_eq!(
        gateway.delete(stranger, created.id()).await.err(),
        Some(TemplateError::NotFound)
    );

    let updated = gateway
        .update(
            owner,
            created.id(),
            TemplatePatch {
                description: Some("Says hi".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.title(), "Greeting");
    assert_eq!(updated.description(), Some("Says hi"));
    assert!(updated.updated_at() >= created.updated_at());

    gateway.delete(owner, created.id()).await.expect("delete");
    assert!(gateway.get_by_id(owner, created.id()).await.unwrap().is_none());
}

async fn list_is_most_recent_first(repository: Arc<dyn TemplateRepository>) {
    let gateway = TemplateGateway::new(repository);
    let owner = Uuid::new_v4();

    let first = gateway.create(owner, fields("first", "a")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = gateway.create(owner, fields("second", "b")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    // Touching the older one moves it to the front
    gateway
        .update(
            owner,
            first.id(),
            TemplatePatch {
                content: Some("a2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let ids: Vec<Uuid> = gateway
        .list_by_owner(owner)
        .await
        .unwrap()
        .iter()
        .map(Template::id)
        .collect();
    assert_eq!(ids, vec![first.id(), second.id()]);

    for id in ids {
        gateway.delete(owner, id).await.unwrap();
    }
}

#[tokio::test]
async fn test_in_memory_gateway_round_trip() {
    gateway_round_trip(Arc::new(InMemoryTemplateRepository::new())).await;
}

#[tokio::test]
async fn test_in_memory_list_order() {
    list_is_most_recent_first(Arc::new(InMemoryTemplateRepository::new())).await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_postgres_gateway_round_trip() {
    let pool = setup_test_db().await;
    gateway_round_trip(Arc::new(PostgresTemplateRepository::new(pool))).await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_postgres_list_order() {
    let pool = setup_test_db().await;
    list_is_most_recent_first(Arc::new(PostgresTemplateRepository::new(pool))).await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_postgres_missing_rows() {
    let pool = setup_test_db().await;
    let repo = PostgresTemplateRepository::new(pool);

    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    assert!(repo.delete(Uuid::new_v4()).await.is_err());
    assert!(repo.find_by_owner(Uuid::new_v4()).await.unwrap().is_empty());
}
