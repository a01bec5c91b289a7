//! Behavioural coverage for the in-memory document store.

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

#[fixture]
fn store() -> InMemoryDocumentStore {
    InMemoryDocumentStore::new()
}

async fn seed(store: &InMemoryDocumentStore, docs: Vec<Value>) -> Vec<DocumentId> {
    let mut ids = Vec::new();
    for value in docs {
        let ack = store
            .insert(Collection::Listings, doc(value))
            .await
            .expect("insert");
        ids.push(ack.inserted_id());
    }
    ids
}

fn names(docs: &[Document]) -> Vec<&str> {
    docs.iter()
        .filter_map(|d| d.get("food_name").and_then(Value::as_str))
        .collect()
}

#[rstest]
#[tokio::test]
async fn insert_overwrites_client_identifier(store: InMemoryDocumentStore) {
    let ack = store
        .insert(Collection::Listings, doc(json!({ "_id": "mine", "food_name": "Rice" })))
        .await
        .expect("insert");

    let found = store
        .find_one(Collection::Listings, DocumentFilter::ById(ack.inserted_id()))
        .await
        .expect("find")
        .expect("present");
    assert_eq!(found.get(ID_FIELD), Some(&json!(ack.inserted_id().to_string())));
    assert_eq!(store.len(Collection::Listings).await, 1);
    assert_eq!(store.len(Collection::Requests).await, 0);
}

#[rstest]
#[tokio::test]
async fn sort_places_missing_then_numbers_then_strings(store: InMemoryDocumentStore) {
    seed(
        &store,
        vec![
            json!({ "food_name": "c", "expired_date": "2025-01-02" }),
            json!({ "food_name": "a" }),
            json!({ "food_name": "b", "expired_date": 5 }),
            json!({ "food_name": "d", "expired_date": "2025-01-01" }),
            json!({ "food_name": "e", "expired_date": null }),
        ],
    )
    .await;

    let asc = store
        .find(
            Collection::Listings,
            DocumentFilter::All,
            FindOptions::sorted_by("expired_date", SortOrder::Ascending),
        )
        .await
        .expect("find");
    assert_eq!(names(&asc), ["a", "e", "b", "d", "c"]);

    let desc = store
        .find(
            Collection::Listings,
            DocumentFilter::All,
            FindOptions::sorted_by("expired_date", SortOrder::Descending),
        )
        .await
        .expect("find");
    assert_eq!(names(&desc), ["c", "d", "b", "a", "e"]);
}

#[rstest]
#[case("RI", vec!["Rice", "Fried rice"])]
#[case("bread", vec![])]
#[case(".*", vec![])]
#[tokio::test]
async fn name_search_is_a_literal_case_insensitive_substring(
    store: InMemoryDocumentStore,
    #[case] needle: &str,
    #[case] expected: Vec<&str>,
) {
    seed(
        &store,
        vec![
            json!({ "food_name": "Rice" }),
            json!({ "food_name": "Soup" }),
            json!({ "food_name": "Fried rice" }),
            json!({ "food_name": 7 }),
        ],
    )
    .await;

    let found = store
        .find(
            Collection::Listings,
            DocumentFilter::name_contains("food_name", needle),
            FindOptions::default(),
        )
        .await
        .expect("find");
    assert_eq!(names(&found), expected);
}

#[rstest]
#[tokio::test]
async fn field_equality_follows_dotted_paths(store: InMemoryDocumentStore) {
    seed(
        &store,
        vec![
            json!({ "food_name": "Rice", "donor": { "donor_email": "a@x.io" } }),
            json!({ "food_name": "Soup", "donor": { "donor_email": "b@x.io" } }),
            json!({ "food_name": "Tea", "donor": "a@x.io" }),
        ],
    )
    .await;

    let found = store
        .find(
            Collection::Listings,
            DocumentFilter::field_equals("donor.donor_email", "a@x.io"),
            FindOptions::default(),
        )
        .await
        .expect("find");
    assert_eq!(names(&found), ["Rice"]);
}

#[rstest]
#[tokio::test]
async fn update_merges_top_level_fields_and_counts_changes(store: InMemoryDocumentStore) {
    let ids = seed(
        &store,
        vec![json!({ "food_name": "Rice", "expired_date": "2025-01-01", "qty": 2 })],
    )
    .await;
    let filter = DocumentFilter::ById(ids[0]);

    let ack = store
        .update(
            Collection::Listings,
            filter.clone(),
            doc(json!({ "expired_date": "2025-02-01", "_id": "ignored" })),
        )
        .await
        .expect("update");
    assert_eq!((ack.matched_count(), ack.modified_count()), (1, 1));

    let unchanged = store
        .update(
            Collection::Listings,
            filter.clone(),
            doc(json!({ "expired_date": "2025-02-01" })),
        )
        .await
        .expect("update");
    assert_eq!((unchanged.matched_count(), unchanged.modified_count()), (1, 0));

    let stored = store
        .find_one(Collection::Listings, filter)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(stored.get("expired_date"), Some(&json!("2025-02-01")));
    assert_eq!(stored.get("qty"), Some(&json!(2)));
    assert_eq!(stored.get("food_name"), Some(&json!("Rice")));
    assert_eq!(stored.get(ID_FIELD), Some(&json!(ids[0].to_string())));
}

#[rstest]
#[tokio::test]
async fn update_and_delete_of_missing_document_report_zero(store: InMemoryDocumentStore) {
    let missing = DocumentFilter::ById(DocumentId::generate());
    let ack = store
        .update(Collection::Listings, missing.clone(), doc(json!({ "a": 1 })))
        .await
        .expect("update");
    assert_eq!((ack.matched_count(), ack.modified_count()), (0, 0));

    let deleted = store
        .delete(Collection::Listings, missing)
        .await
        .expect("delete");
    assert_eq!(deleted.deleted_count(), 0);
}

#[rstest]
#[tokio::test]
async fn delete_removes_a_single_match(store: InMemoryDocumentStore) {
    seed(
        &store,
        vec![json!({ "food_name": "Rice" }), json!({ "food_name": "Rice" })],
    )
    .await;

    let ack = store
        .delete(
            Collection::Listings,
            DocumentFilter::field_equals("food_name", "Rice"),
        )
        .await
        .expect("delete");
    assert_eq!(ack.deleted_count(), 1);
    assert_eq!(store.len(Collection::Listings).await, 1);
}

#[rstest]
#[case(json!({ "a": { "b": { "c": 1 } } }), "a.b.c", Some(json!(1)))]
#[case(json!({ "a": { "b": 2 } }), "a.b.c", None)]
#[case(json!({ "a": 1 }), "b", None)]
fn lookup_walks_nested_objects(
    #[case] value: Value,
    #[case] path: &str,
    #[case] expected: Option<Value>,
) {
    let document = doc(value);
    assert_eq!(lookup(&document, path).cloned(), expected);
}
