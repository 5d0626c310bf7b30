use super::*;

fn test_client(base_url: &str) -> FirestoreClient {
    FirestoreClient::with_base_url("test-project", "(default)", None, 30, base_url)
        .expect("client construction should not fail")
}

#[test]
fn collection_url_includes_project_database_and_collection() {
    let client = test_client("https://firestore.googleapis.com/v1");
    let url = client.collection_url("products").unwrap();
    assert_eq!(
        url.as_str(),
        "https://firestore.googleapis.com/v1/projects/test-project/databases/(default)/documents/products"
    );
}

#[test]
fn document_url_appends_the_identifier() {
    let client = test_client("https://firestore.googleapis.com/v1");
    let url = client.document_url("products", "AbC123").unwrap();
    assert_eq!(
        url.as_str(),
        "https://firestore.googleapis.com/v1/projects/test-project/databases/(default)/documents/products/AbC123"
    );
}

#[test]
fn base_url_trailing_slash_is_normalized() {
    let client = test_client("http://localhost:8080/v1/");
    let url = client.collection_url("products").unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost:8080/v1/projects/test-project/databases/(default)/documents/products"
    );
}

#[test]
fn non_default_database_id_is_used_verbatim() {
    let client = FirestoreClient::with_base_url("p", "staging", None, 30, "http://localhost:9000")
        .expect("client construction should not fail");
    let url = client.collection_url("products").unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost:9000/projects/p/databases/staging/documents/products"
    );
}

#[test]
fn with_base_url_rejects_garbage() {
    let result = FirestoreClient::with_base_url("p", "(default)", None, 30, "not a url");
    assert!(
        matches!(result, Err(StoreError::InvalidUrl { .. })),
        "expected InvalidUrl"
    );
}

#[test]
fn document_id_takes_the_last_path_segment() {
    let id = document_id("projects/p/databases/(default)/documents/products/AbC123").unwrap();
    assert_eq!(id, "AbC123");
}

#[test]
fn document_id_rejects_bare_and_empty_names() {
    assert!(matches!(
        document_id("AbC123"),
        Err(StoreError::InvalidDocumentName { .. })
    ));
    assert!(matches!(
        document_id("products/"),
        Err(StoreError::InvalidDocumentName { .. })
    ));
    assert!(matches!(
        document_id(""),
        Err(StoreError::InvalidDocumentName { .. })
    ));
}
