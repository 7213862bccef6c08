//! Gateway cache behavior, driven against a mock HTTP endpoint.

use boardline::api::{CacheConfig, MondayClient};
use boardline::BoardlineError;
use std::time::Duration;

fn client_for(server: &mockito::ServerGuard, ttl: Duration) -> MondayClient {
    MondayClient::new(
        server.url(),
        "test-token",
        CacheConfig { ttl, capacity: 16 },
    )
    .expect("client")
}

#[tokio::test]
async fn cached_query_hits_upstream_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"boards":[{"id":"1","name":"Roadmap"}]}}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, Duration::from_secs(10));

    let first = client
        .query_cached("query { boards { id name } }")
        .await
        .expect("first call");
    // Same document, different formatting: must be served from the cache
    let second = client
        .query_cached("query {\n  boards {\n    id\n    name\n  }\n}")
        .await
        .expect("second call");

    assert_eq!(first, second);
    mock.assert_async().await;
}

#[tokio::test]
async fn expired_entry_triggers_a_new_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"boards":[]}}"#)
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server, Duration::from_millis(5));

    client
        .query_cached("query { boards { id name } }")
        .await
        .expect("first call");
    tokio::time::sleep(Duration::from_millis(20)).await;
    client
        .query_cached("query { boards { id name } }")
        .await
        .expect("second call");

    mock.assert_async().await;
}

#[tokio::test]
async fn successful_mutation_clears_cached_reads() {
    let mut server = mockito::Server::new_async().await;
    let read_mock = server
        .mock("POST", "/")
        .match_body(mockito::Matcher::Regex("boards".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"boards":[{"id":"1","name":"Roadmap"}]}}"#)
        .expect(2)
        .create_async()
        .await;
    let write_mock = server
        .mock("POST", "/")
        .match_body(mockito::Matcher::Regex("create_item".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"create_item":{"id":"900"}}}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, Duration::from_secs(60));

    client
        .query_cached("query { boards { id name } }")
        .await
        .expect("warm the cache");
    client
        .create_item("123", "Test Item")
        .await
        .expect("mutation");
    // The cache was cleared by the write, so this must hit upstream again
    client
        .query_cached("query { boards { id name } }")
        .await
        .expect("read after write");

    read_mock.assert_async().await;
    write_mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(401)
        .with_body(r#"{"error_message":"Not authenticated"}"#)
        .create_async()
        .await;

    let client = client_for(&server, Duration::from_secs(10));
    let result = client.query("query { me { name email } }").await;

    assert!(matches!(result, Err(BoardlineError::Auth(_))));
}

#[tokio::test]
async fn graphql_errors_surface_as_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"errors":[{"message":"Field 'bogus' doesn't exist"}]}"#)
        .create_async()
        .await;

    let client = client_for(&server, Duration::from_secs(10));
    let result = client.query("query { bogus }").await;

    match result {
        Err(BoardlineError::Api(message)) => assert!(message.contains("bogus")),
        other => panic!("expected Api error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn uncached_query_always_hits_upstream() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"boards":[]}}"#)
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server, Duration::from_secs(60));
    client.query("query { boards { id name } }").await.expect("first");
    client.query("query { boards { id name } }").await.expect("second");

    mock.assert_async().await;
}
