use pretty_assertions::assert_eq;
use tessera_storage::{
    AttributeValue, ComparisonOp, Item, KeyCondition, KeySchema, MemoryStore, QueryRequest,
    StorageClient, StorageError,
};

fn item(pairs: &[(&str, AttributeValue)]) -> Item {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn s(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_string())
}

fn n(value: i64) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

async fn orders() -> MemoryStore {
    let store = MemoryStore::with_table("orders", KeySchema::partition("customer").with_sort("seq"));
    for (customer, seq, note) in [
        ("ada", 10, "tenth"),
        ("ada", 2, "second"),
        ("ada", 1, "first"),
        ("bob", 1, "other"),
    ] {
        store
            .put(
                "orders",
                item(&[("customer", s(customer)), ("seq", n(seq)), ("note", s(note))]),
            )
            .await
            .unwrap();
    }
    store
}

fn notes(items: &[Item]) -> Vec<&str> {
    items
        .iter()
        .filter_map(|i| i.get("note").and_then(AttributeValue::as_s))
        .collect()
}

// ── Put ──────────────────────────────────────────────────────────

#[tokio::test]
async fn put_replaces_item_with_same_key() {
    let store = MemoryStore::with_table("people", KeySchema::partition("id"));
    store
        .put("people", item(&[("id", s("1")), ("name", s("ada"))]))
        .await
        .unwrap();
    store
        .put("people", item(&[("id", s("1")), ("name", s("grace"))]))
        .await
        .unwrap();

    assert_eq!(store.item_count("people").await, Some(1));
    let all = store.scan("people").await.unwrap();
    assert_eq!(all[0].get("name"), Some(&s("grace")));
}

#[tokio::test]
async fn numerically_equal_keys_share_one_identity() {
    let store = MemoryStore::with_table("people", KeySchema::partition("id"));
    for (spelling, name) in [("1", "ada"), ("1.0", "grace"), ("+1", "joan")] {
        store
            .put(
                "people",
                item(&[("id", AttributeValue::N(spelling.into())), ("name", s(name))]),
            )
            .await
            .unwrap();
    }
    store
        .put("people", item(&[("id", AttributeValue::N("1.5".into()))]))
        .await
        .unwrap();

    assert_eq!(store.item_count("people").await, Some(2));
    let found = store
        .query("people", &QueryRequest::partition("id", 1))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("name"), Some(&s("joan")));
}

#[tokio::test]
async fn put_with_unparsable_number_key_fails_validation() {
    let store = MemoryStore::with_table("people", KeySchema::partition("id"));
    for bad in ["", "one", "NaN"] {
        let err = store
            .put("people", item(&[("id", AttributeValue::N(bad.into()))]))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }
    assert_eq!(store.item_count("people").await, Some(0));
}

#[tokio::test]
async fn put_to_unknown_table_fails() {
    let store = MemoryStore::new();
    let err = store
        .put("nowhere", item(&[("id", s("1"))]))
        .await
        .unwrap_err();
    assert_eq!(err, StorageError::TableNotFound("nowhere".into()));
    assert_eq!(store.item_count("nowhere").await, None);
}

#[tokio::test]
async fn put_without_key_attribute_fails_validation() {
    let store = MemoryStore::with_table("people", KeySchema::partition("id"));
    let err = store
        .put("people", item(&[("name", s("ada"))]))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)));
}

#[tokio::test]
async fn put_with_empty_or_mistyped_key_fails_validation() {
    let store = MemoryStore::with_table("people", KeySchema::partition("id"));
    for bad in [s(""), AttributeValue::Bool(true), AttributeValue::Null] {
        let err = store.put("people", item(&[("id", bad)])).await.unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }
    assert_eq!(store.item_count("people").await, Some(0));
}

#[tokio::test]
async fn create_table_replaces_contents() {
    let store = MemoryStore::new();
    store.create_table("t", KeySchema::partition("id")).await;
    store.put("t", item(&[("id", n(1))])).await.unwrap();
    store.create_table("t", KeySchema::partition("id")).await;
    assert_eq!(store.item_count("t").await, Some(0));
}

// ── Query ────────────────────────────────────────────────────────

#[tokio::test]
async fn query_returns_partition_in_numeric_sort_order() {
    let store = orders().await;
    let items = store
        .query("orders", &QueryRequest::partition("customer", "ada"))
        .await
        .unwrap();
    assert_eq!(notes(&items), vec!["first", "second", "tenth"]);
}

#[tokio::test]
async fn query_applies_sort_condition_and_limit() {
    let store = orders().await;
    let request = QueryRequest::partition("customer", "ada")
        .with_sort(KeyCondition::new("seq", ComparisonOp::Ge, 2))
        .with_limit(1);
    let items = store.query("orders", &request).await.unwrap();
    assert_eq!(notes(&items), vec!["second"]);
}

#[tokio::test]
async fn query_begins_with_on_string_sort_key() {
    let store = MemoryStore::with_table("events", KeySchema::partition("pk").with_sort("sk"));
    for sk in ["user#1", "user#2", "order#1"] {
        store
            .put("events", item(&[("pk", s("p")), ("sk", s(sk))]))
            .await
            .unwrap();
    }
    let request = QueryRequest::partition("pk", "p")
        .with_sort(KeyCondition::new("sk", ComparisonOp::BeginsWith, "user#"));
    let items = store.query("events", &request).await.unwrap();
    let keys: Vec<&str> = items
        .iter()
        .filter_map(|i| i.get("sk").and_then(AttributeValue::as_s))
        .collect();
    assert_eq!(keys, vec!["user#1", "user#2"]);
}

#[tokio::test]
async fn query_with_no_matches_is_empty() {
    let store = orders().await;
    let items = store
        .query("orders", &QueryRequest::partition("customer", "zed"))
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn query_rejects_filter_expression() {
    let store = orders().await;
    let request = QueryRequest::partition("customer", "ada").with_filter("note = :n");
    let err = store.query("orders", &request).await.unwrap_err();
    assert!(matches!(err, StorageError::Unsupported(_)));
}

#[tokio::test]
async fn query_requires_partition_equality_on_key() {
    let store = orders().await;

    let wrong_attr = QueryRequest::partition("note", "first");
    assert!(matches!(
        store.query("orders", &wrong_attr).await,
        Err(StorageError::Validation(_))
    ));

    let mut range = QueryRequest::partition("customer", "ada");
    range.partition.operator = ComparisonOp::Gt;
    assert!(matches!(
        store.query("orders", &range).await,
        Err(StorageError::Validation(_))
    ));

    let wrong_sort = QueryRequest::partition("customer", "ada")
        .with_sort(KeyCondition::equals("note", "first"));
    assert!(matches!(
        store.query("orders", &wrong_sort).await,
        Err(StorageError::Validation(_))
    ));
}

#[tokio::test]
async fn query_unknown_table_fails() {
    let store = MemoryStore::new();
    let err = store
        .query("orders", &QueryRequest::partition("customer", "ada"))
        .await
        .unwrap_err();
    assert_eq!(err, StorageError::TableNotFound("orders".into()));
}

#[tokio::test]
async fn backend_name() {
    assert_eq!(MemoryStore::new().backend_name(), "memory");
}

// ── Comparison operators ─────────────────────────────────────────

#[test]
fn operators_parse_from_symbols() {
    assert_eq!("=".parse::<ComparisonOp>().unwrap(), ComparisonOp::Eq);
    assert_eq!(" <= ".parse::<ComparisonOp>().unwrap(), ComparisonOp::Le);
    assert_eq!(
        "BEGINS_WITH".parse::<ComparisonOp>().unwrap(),
        ComparisonOp::BeginsWith
    );
    assert!(matches!(
        "!=".parse::<ComparisonOp>(),
        Err(StorageError::Validation(_))
    ));
}

#[test]
fn operators_display_as_symbols() {
    for op in [
        ComparisonOp::Eq,
        ComparisonOp::Lt,
        ComparisonOp::Le,
        ComparisonOp::Gt,
        ComparisonOp::Ge,
        ComparisonOp::BeginsWith,
    ] {
        assert_eq!(op.to_string().parse::<ComparisonOp>().unwrap(), op);
    }
}
