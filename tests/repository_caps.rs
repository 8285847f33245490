//! Repository Operation Cap Tests
//!
//! Tests for capped operations:
//! - Bulk create/get/update/delete over the cap fail with CapExceeded
//! - A rejected operation writes nothing
//! - Runtime overrides apply to the next call and reset restores the default

use docquery::{
    CappedOperation, CursorCodec, FilterExpr, FilterOperator, MemoryStore, OperationCap,
    QueryError, Repository, UpdateMode, UpdateOutcome,
};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn numbered(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({"_id": format!("n{:02}", i), "n": i, "status": "open"}))
        .collect()
}

async fn seeded(cap: usize, count: usize) -> Repository<MemoryStore> {
    let repo = Repository::new(
        MemoryStore::new(),
        CursorCodec::new([4u8; 32]),
        OperationCap::new(cap),
    )
    .with_default_limit(cap);
    repo.create_many(numbered(count)).await.unwrap();
    repo
}

fn assert_cap_exceeded(err: QueryError, operation: CappedOperation, cap: usize) {
    assert_eq!(err.code(), "QUERY_CAP_EXCEEDED");
    assert_eq!(err.status_code(), 400);
    assert!(err.to_string().contains(&cap.to_string()));
    match err {
        QueryError::CapExceeded {
            operation: op,
            cap: reported,
        } => {
            assert_eq!(op, operation);
            assert_eq!(reported, cap);
        }
        other => panic!("expected CapExceeded, got {:?}", other),
    }
}

// =============================================================================
// Cap Enforcement Tests
// =============================================================================

/// create_many over the cap inserts nothing.
#[tokio::test]
async fn test_create_many_over_cap() {
    let repo = seeded(5, 0).await;

    let err = repo.create_many(numbered(6)).await.unwrap_err();
    assert_cap_exceeded(err, CappedOperation::Create, 5);
    assert_eq!(repo.count(&FilterExpr::All).await.unwrap(), 0);

    assert_eq!(repo.create_many(numbered(5)).await.unwrap().len(), 5);
}

/// get_many fails when more documents match than the cap.
#[tokio::test]
async fn test_get_many_over_cap() {
    let repo = seeded(5, 5).await;
    repo.cap().set(4);

    let err = repo.get_many(&FilterExpr::All).await.unwrap_err();
    assert_cap_exceeded(err, CappedOperation::Get, 4);

    let few = FilterExpr::condition("n", FilterOperator::Lt, json!(2));
    let docs = repo.get_many(&few).await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["_id"], json!("n00"));
}

/// update_many over the cap modifies nothing.
#[tokio::test]
async fn test_update_many_over_cap() {
    let repo = seeded(5, 5).await;
    repo.cap().set(3);

    let changes = json!({"status": "closed"});
    let err = repo
        .update_many(&FilterExpr::All, &changes, UpdateMode::Merge)
        .await
        .unwrap_err();
    assert_cap_exceeded(err, CappedOperation::Update, 3);

    let closed = FilterExpr::eq("status", json!("closed"));
    assert_eq!(repo.count(&closed).await.unwrap(), 0);

    repo.cap().reset();
    let outcome = repo
        .update_many(&FilterExpr::All, &changes, UpdateMode::Merge)
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome { matched: 5, modified: 5 });
    assert_eq!(repo.count(&closed).await.unwrap(), 5);
}

/// delete_many over the cap deletes nothing.
#[tokio::test]
async fn test_delete_many_over_cap() {
    let repo = seeded(5, 5).await;
    repo.cap().set(2);

    let err = repo.delete_many(&FilterExpr::All).await.unwrap_err();
    assert_cap_exceeded(err, CappedOperation::Delete, 2);
    assert_eq!(repo.count(&FilterExpr::All).await.unwrap(), 5);

    let two = FilterExpr::in_list("n", vec![json!(0), json!(1)]);
    assert_eq!(repo.delete_many(&two).await.unwrap(), 2);
    assert_eq!(repo.count(&FilterExpr::All).await.unwrap(), 3);
}

/// The cap read at call time also bounds page size.
#[tokio::test]
async fn test_cap_bounds_page_limit() {
    let repo = seeded(5, 5).await;
    let request = docquery::PageRequest::new().with_limit(5);

    assert!(repo.paginate(&FilterExpr::All, &request).await.is_ok());

    repo.cap().set(4);
    let err = repo.paginate(&FilterExpr::All, &request).await.unwrap_err();
    assert_eq!(err.to_string(), "Validation failed: limit must be <= 4");
}

/// Clones of the cap handle share the override.
#[tokio::test]
async fn test_shared_cap_handle() {
    let cap = OperationCap::new(10);
    let repo = Repository::new(MemoryStore::new(), CursorCodec::new([4u8; 32]), cap.clone());

    cap.set(1);
    let err = repo.create_many(numbered(2)).await.unwrap_err();
    assert_cap_exceeded(err, CappedOperation::Create, 1);

    cap.reset();
    assert_eq!(repo.cap().get(), 10);
}

// =============================================================================
// Single Document Tests
// =============================================================================

/// Overwrite replaces every field but the identifier.
#[tokio::test]
async fn test_overwrite_update() {
    let repo = seeded(5, 1).await;

    let updated = repo
        .update_by_id("n00", &json!({"status": "archived"}), UpdateMode::Overwrite)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated["_id"], json!("n00"));
    assert_eq!(updated["status"], json!("archived"));
    assert!(updated.get("n").is_none());
}

/// Changing the identifier is a store error.
#[tokio::test]
async fn test_update_rejects_id_change() {
    let repo = seeded(5, 1).await;

    let err = repo
        .update_by_id("n00", &json!({"_id": "other"}), UpdateMode::Merge)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "QUERY_STORE");
    assert_eq!(err.status_code(), 500);
}

/// Duplicate identifiers are rejected.
#[tokio::test]
async fn test_duplicate_id_rejected() {
    let repo = seeded(5, 1).await;

    let err = repo.create_one(json!({"_id": "n00"})).await.unwrap_err();
    assert!(matches!(err, QueryError::Store(_)));
    assert_eq!(repo.count(&FilterExpr::All).await.unwrap(), 1);
}
