//! Catalog client against a local stub server

mod common;

use books_core::api::{BookCatalog, CatalogClient, ClientConfig};
use books_core::BooksError;
use common::{query_param, volume, volumes, StubServer};
use std::time::Duration;

fn client(server: &StubServer) -> CatalogClient {
    let config = ClientConfig::builder()
        .base_url(format!("{}/", server.base_url))
        .timeout(Duration::from_secs(5))
        .build();
    CatalogClient::new(config).unwrap()
}

#[tokio::test]
async fn test_search_encodes_query_and_maps_volumes() {
    let server = StubServer::start(|_| {
        (
            200,
            volumes(vec![
                volume("v1", "Pride and Prejudice", "Jane Austen"),
                volume("v2", "Emma", "Jane Austen"),
            ]),
        )
    })
    .await;

    let books = client(&server)
        .search_books("inauthor:\"Jane Austen\"", 10)
        .await
        .unwrap();

    assert_eq!(books.len(), 2);
    assert_eq!(books[0].id, "v1");
    assert_eq!(books[0].authors, vec!["Jane Austen".to_string()]);
    assert_eq!(books[1].thumbnail.as_deref(), Some("https://books.example/v2.jpg"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("/volumes?q=inauthor%3A%22Jane%20Austen%22&maxResults=10"));
    assert_eq!(query_param(&requests[0], "q").as_deref(), Some("inauthor:\"Jane Austen\""));
}

#[tokio::test]
async fn test_blank_query_makes_no_request() {
    let server = StubServer::start(|_| (200, volumes(vec![]))).await;

    let books = client(&server).search_books("   ", 10).await.unwrap();
    assert!(books.is_empty());
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_padded_query_is_sent_as_given() {
    let server = StubServer::start(|_| (200, volumes(vec![]))).await;

    client(&server).search_books("  dune ", 5).await.unwrap();

    let requests = server.requests();
    assert_eq!(requests, vec!["/volumes?q=%20%20dune%20&maxResults=5"]);
    assert_eq!(query_param(&requests[0], "q").as_deref(), Some("  dune "));
}

#[tokio::test]
async fn test_missing_items_is_empty_result() {
    let server = StubServer::start(|_| (200, r#"{"kind":"books#volumes","totalItems":0}"#.to_string())).await;

    let books = client(&server).search_books("zzzzqqq", 20).await.unwrap();
    assert!(books.is_empty());
}

#[tokio::test]
async fn test_server_error_is_search_failed() {
    let server = StubServer::start(|_| (500, r#"{"error":"backend"}"#.to_string())).await;

    let err = client(&server).search_books("dune", 20).await.unwrap_err();
    match &err {
        BooksError::SearchFailed { status_code, .. } => assert_eq!(*status_code, Some(500)),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.is_network_error());
}

#[tokio::test]
async fn test_garbage_body_is_search_failed() {
    let server = StubServer::start(|_| (200, "<html>oops</html>".to_string())).await;

    let err = client(&server).search_books("dune", 20).await.unwrap_err();
    assert!(matches!(err, BooksError::SearchFailed { .. }));
}

#[tokio::test]
async fn test_lookup_found_and_not_found() {
    let server = StubServer::start(|target| {
        if target == "/volumes/known" {
            (200, volume("known", "Dune", "Frank Herbert").to_string())
        } else {
            (404, r#"{"error":{"code":404}}"#.to_string())
        }
    })
    .await;
    let client = client(&server);

    let book = client.lookup("known").await.unwrap().unwrap();
    assert_eq!(book.title, "Dune");
    assert_eq!(book.primary_author(), "Frank Herbert");

    assert!(client.lookup("missing").await.unwrap().is_none());
    assert_eq!(server.requests(), vec!["/volumes/known", "/volumes/missing"]);
}

#[tokio::test]
async fn test_lookup_server_error() {
    let server = StubServer::start(|_| (503, String::new())).await;

    let err = client(&server).get_book_by_id("abc").await.unwrap_err();
    assert!(matches!(err, BooksError::BookLookupFailed { status_code: Some(503), .. }));
}

#[tokio::test]
async fn test_unreachable_catalog_is_search_failed() {
    let config = ClientConfig::builder()
        .base_url("http://127.0.0.1:9")
        .timeout(Duration::from_secs(2))
        .build();
    let client = CatalogClient::new(config).unwrap();

    let err = client.search_books("dune", 20).await.unwrap_err();
    assert!(matches!(err, BooksError::SearchFailed { status_code: None, .. }));
}
