//! Filter Query Tests
//!
//! End-to-end tests from query strings to matched documents:
//! - Operator vocabulary against the in-memory store
//! - AND/OR combination via the union flag
//! - Type casting of query values
//! - Rejection of unknown operators and malformed keys

use docquery::{
    CursorCodec, MemoryStore, OperationCap, ParamType, ParamTypes, QueryError, QueryParams,
    Repository,
};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

async fn customers() -> Repository<MemoryStore> {
    let repo = Repository::new(
        MemoryStore::new(),
        CursorCodec::new([2u8; 32]),
        OperationCap::default(),
    );
    repo.create_many(vec![
        json!({"_id": "u1", "name": "Ada", "age": 36, "tags": ["vip"], "profile": {"city": "London"}}),
        json!({"_id": "u2", "name": "Grace", "age": 45, "tags": ["lead", "vip"], "phone": "555-0100"}),
        json!({"_id": "u3", "name": "Linus", "age": 28, "tags": []}),
        json!({"_id": "u4", "name": "Barbara", "age": 52, "tags": ["lead"], "profile": {"city": "Paris"}}),
    ])
    .await
    .unwrap();
    repo
}

async fn matching(query: &str, types: &ParamTypes) -> Result<Vec<String>, QueryError> {
    let repo = customers().await;
    let params = QueryParams::parse_query_string(query, types)?;
    let page = repo.paginate_params(&params).await?;
    Ok(page
        .data
        .iter()
        .map(|doc| doc["_id"].as_str().unwrap().to_string())
        .collect())
}

fn ages() -> ParamTypes {
    ParamTypes::new()
        .with("age[gte]", ParamType::Integer)
        .with("age[lt]", ParamType::Integer)
        .with("age", ParamType::Integer)
}

// =============================================================================
// Operator Tests
// =============================================================================

/// Plain keys are equality; array fields match on membership.
#[tokio::test]
async fn test_equality() {
    let none = ParamTypes::new();
    assert_eq!(matching("name=Ada", &none).await.unwrap(), vec!["u1"]);
    assert_eq!(matching("tags=vip", &none).await.unwrap(), vec!["u1", "u2"]);
    assert_eq!(matching("profile.city=Paris", &none).await.unwrap(), vec!["u4"]);
}

/// Range operators need cast values to compare numerically.
#[tokio::test]
async fn test_range_with_casting() {
    assert_eq!(
        matching("age%5Bgte%5D=36&age%5Blt%5D=50", &ages()).await.unwrap(),
        vec!["u1", "u2"]
    );

    // Uncast, "36" is a string and never compares with numbers
    assert!(matching("age%5Bgte%5D=36", &ParamTypes::new())
        .await
        .unwrap()
        .is_empty());
}

/// in, nin, all, exists and size.
#[tokio::test]
async fn test_list_and_presence_operators() {
    let none = ParamTypes::new();
    assert_eq!(
        matching("name%5Bin%5D=Ada,Linus", &none).await.unwrap(),
        vec!["u1", "u3"]
    );
    assert_eq!(
        matching("name%5Bnin%5D=Ada,Linus", &none).await.unwrap(),
        vec!["u2", "u4"]
    );
    assert_eq!(
        matching("tags%5Ball%5D=vip,lead", &none).await.unwrap(),
        vec!["u2"]
    );
    assert_eq!(matching("phone%5Bexists%5D=true", &none).await.unwrap(), vec!["u2"]);
    assert_eq!(matching("tags%5Bsize%5D=0", &none).await.unwrap(), vec!["u3"]);
}

/// Regex matches string fields.
#[tokio::test]
async fn test_regex() {
    assert_eq!(
        matching("name%5Bregex%5D=%5E%5BAB%5D", &ParamTypes::new())
            .await
            .unwrap(),
        vec!["u1", "u4"]
    );
}

/// Several fields intersect by default and unite with union=true.
#[tokio::test]
async fn test_union_flag() {
    let types = ages();
    assert_eq!(
        matching("tags=lead&age=45", &types).await.unwrap(),
        vec!["u2"]
    );
    assert_eq!(
        matching("tags=lead&age=28&union=true", &types).await.unwrap(),
        vec!["u2", "u3", "u4"]
    );
}

// =============================================================================
// Rejection Tests
// =============================================================================

/// Unknown operators are validation errors, not silently ignored.
#[tokio::test]
async fn test_unknown_operator() {
    let err = matching("age%5Bwhere%5D=1", &ParamTypes::new())
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));
    assert!(err.to_string().contains("where"));
}

/// Malformed keys and operands are validation errors.
#[tokio::test]
async fn test_malformed_filters() {
    let none = ParamTypes::new();
    for query in [
        "age%5Bgt=1",
        "%5Bgt%5D=1",
        "tags%5Bsize%5D=many",
        "phone%5Bexists%5D=maybe",
        "name%5Bregex%5D=(",
    ] {
        let err = matching(query, &none).await.unwrap_err();
        assert!(matches!(err, QueryError::Validation(_)), "query {}", query);
    }
}

/// Cast failures name the offending key.
#[tokio::test]
async fn test_cast_failure() {
    let err = matching("age=old", &ages()).await.unwrap_err();
    assert_eq!(err.to_string(), "Validation failed: age must be an integer");
}
