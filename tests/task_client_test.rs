//! Integration tests for task submission and single-shot result retrieval
//!
//! Runs the client against a wiremock server standing in for the task service.

use serde_json::{json, Value};
use taskq_client::{ClientConfig, ClientError, PollOutcome, TaskClient, TaskId, TaskPayload};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TaskClient {
    TaskClient::new(ClientConfig::with_base_url(server.uri())).unwrap()
}

// ===================================================================================
// SUBMISSION
// ===================================================================================

#[tokio::test]
async fn test_submit_injects_queue_into_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submit_task"))
        .and(body_json(json!({"key1": "value1", "queue": "q"})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"task_id": "abc123"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let task_id = client
        .submit_task(TaskPayload::new().with("key1", "value1"), "q")
        .await;

    assert_eq!(task_id.as_str(), "abc123");
}

#[tokio::test]
async fn test_submit_overwrites_existing_queue_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submit_task"))
        .and(body_json(json!({"value": 5, "queue": "math_queue"})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"task_id": "t-1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let payload = TaskPayload::new().with("value", 5).with("queue", "wrong");
    let task_id = client.submit_task(payload, "math_queue").await;

    assert_eq!(task_id, TaskId::from("t-1"));
}

#[tokio::test]
async fn test_submit_without_task_id_returns_empty_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submit_task"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"status": "queued"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let task_id = client.submit_task(TaskPayload::new(), "q").await;

    assert!(task_id.is_empty());
    assert_eq!(task_id.as_str(), "");
}

#[tokio::test]
async fn test_submit_with_malformed_body_returns_empty_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submit_task"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(client.submit_task(TaskPayload::new(), "q").await.is_empty());
}

#[tokio::test]
async fn test_try_submit_distinguishes_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submit_task"))
        .and(body_json(json!({"queue": "broken"})))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"error": "Failed to publish message after retries"})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/submit_task"))
        .and(body_json(json!({"queue": "garbled"})))
        .respond_with(ResponseTemplate::new(202).set_body_string("not json"))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/submit_task"))
        .and(body_json(json!({"queue": "anonymous"})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    match client.try_submit_task(TaskPayload::new(), "broken").await {
        Err(ClientError::ApiError { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("Failed to publish"));
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }

    assert!(matches!(
        client.try_submit_task(TaskPayload::new(), "garbled").await,
        Err(ClientError::ParseError(_))
    ));

    match client.try_submit_task(TaskPayload::new(), "anonymous").await {
        Err(ClientError::MissingField { field }) => assert_eq!(field, "task_id"),
        other => panic!("Expected MissingField, got {:?}", other),
    }
}

#[tokio::test]
async fn test_try_submit_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = TaskClient::from_base_url(format!("http://{}", addr)).unwrap();
    let err = client
        .try_submit_task(TaskPayload::new(), "q")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::TransportError(_)));
    assert!(err.is_recoverable());
}

// ===================================================================================
// RESULTS
// ===================================================================================

#[tokio::test]
async fn test_get_result_without_wait_makes_one_request() {
    let mock_server = MockServer::start().await;
    let pending = json!({"error": "Result not ready or task not found"});

    Mock::given(method("GET"))
        .and(path("/get_result/abc123"))
        .respond_with(ResponseTemplate::new(404).set_body_json(pending.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body = client.get_result(&TaskId::from("abc123"), false).await;

    assert_eq!(body, pending);
}

#[tokio::test]
async fn test_get_result_without_wait_returns_ready_body_unchanged() {
    let mock_server = MockServer::start().await;
    let ready = json!({"task_id": "abc123", "result": {"text": "SOME TEXT"}});

    Mock::given(method("GET"))
        .and(path("/get_result/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ready.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(client.get_result(&TaskId::from("abc123"), false).await, ready);
}

#[tokio::test]
async fn test_get_result_without_wait_on_malformed_body_returns_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get_result/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{truncated"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(
        client.get_result(&TaskId::from("abc123"), false).await,
        Value::Null
    );
}

#[tokio::test]
async fn test_poll_once_classifies_responses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get_result/ready"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"task_id": "ready", "result": 42})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_result/pending"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not ready"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_result/failing"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    assert_eq!(
        client.poll_once(&TaskId::from("ready")).await.unwrap(),
        PollOutcome::Ready(json!({"task_id": "ready", "result": 42}))
    );
    assert_eq!(
        client.poll_once(&TaskId::from("pending")).await.unwrap(),
        PollOutcome::Pending(json!({"error": "not ready"}))
    );

    let err = client
        .poll_once(&TaskId::from("failing"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ApiError { status: 503, .. }));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_fetch_result_extracts_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get_result/done"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"task_id": "done", "result": {"value": 25}})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_result/waiting"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not ready"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let result = client.fetch_result(&TaskId::from("done")).await.unwrap();
    assert_eq!(result, json!({"value": 25}));

    match client.fetch_result(&TaskId::from("waiting")).await {
        Err(ClientError::MissingField { field }) => assert_eq!(field, "result"),
        other => panic!("Expected MissingField, got {:?}", other),
    }
}

// ===================================================================================
// FILES
// ===================================================================================

#[tokio::test]
async fn test_upload_file_returns_file_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"file_url": "files/clip.mp4"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("clip.mp4");
    std::fs::write(&file_path, b"fake video bytes").unwrap();

    let client = client_for(&mock_server);
    let file_url = client.upload_file(&file_path).await.unwrap();
    assert_eq!(file_url, "files/clip.mp4");

    let requests = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"clip.mp4\""));
    assert!(body.contains("fake video bytes"));
}

#[tokio::test]
async fn test_upload_file_requires_created_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"file_url": "x"})))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("doc.txt");
    std::fs::write(&file_path, b"hello").unwrap();

    let client = client_for(&mock_server);
    let err = client.upload_file(&file_path).await.unwrap_err();
    assert!(matches!(err, ClientError::ApiError { status: 200, .. }));

    let missing = temp_dir.path().join("missing.txt");
    assert!(matches!(
        client.upload_file(&missing).await,
        Err(ClientError::IoError(_))
    ));
}

#[tokio::test]
async fn test_get_file_writes_destination() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get_file"))
        .and(query_param("file_url", "files/result.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"processed".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_file"))
        .and(query_param("file_url", "files/missing.mp4"))
        .respond_with(ResponseTemplate::new(404).set_body_string("File not found"))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let destination = temp_dir.path().join("result.mp4");
    let client = client_for(&mock_server);

    let bytes = client
        .get_file("files/result.mp4", &destination)
        .await
        .unwrap();
    assert_eq!(bytes, b"processed");
    assert_eq!(std::fs::read(&destination).unwrap(), b"processed");

    let other = temp_dir.path().join("missing.mp4");
    let err = client
        .get_file("files/missing.mp4", &other)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ApiError { status: 404, .. }));
    assert!(!other.exists());
}
