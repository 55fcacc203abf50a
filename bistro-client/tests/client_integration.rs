//! Client construction and request plumbing without a live backend

use bistro_client::{ClientConfig, ClientError, HttpClient};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves exactly one canned HTTP response and returns the request head
async fn one_shot(status: &str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let status = status.to_string();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let n = socket.read(&mut buf).await.unwrap();
        let request = String::from_utf8_lossy(&buf[..n]).to_string();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        request
    });
    (format!("http://{addr}/api"), handle)
}

#[test]
fn test_client_creation() {
    let config = ClientConfig::new("http://localhost:8080/api").with_token("secret");
    let client = config.build_http_client().unwrap();
    assert_eq!(client.token(), Some("secret"));
    assert_eq!(client.url("orders/full"), "http://localhost:8080/api/orders/full");
}

#[tokio::test]
async fn test_list_orders_sends_bearer_token() {
    let (base, server) = one_shot(
        "200 OK",
        r#"[{"id":3,"items":[],"tableId":2,"totalWithTax":0.0,"totalWithoutTax":0.0,"status":"PENDING","paid":false}]"#,
    )
    .await;

    let client = HttpClient::new(&ClientConfig::new(base).with_timeout(5))
        .unwrap()
        .with_token("abc");
    let orders = client.list_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].table_id, Some(2));

    let request = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .unwrap()
        .unwrap();
    assert!(request.starts_with("GET /api/orders HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer abc"));
}

#[tokio::test]
async fn test_error_envelope_is_surfaced() {
    let (base, _server) = one_shot(
        "409 Conflict",
        r#"{"code":4002,"message":"Order already paid"}"#,
    )
    .await;

    let client = HttpClient::new(&ClientConfig::new(base)).unwrap();
    let err = client.delete_order(9).await.unwrap_err();
    match err {
        ClientError::Api(app) => {
            assert_eq!(app.code, shared::ErrorCode::OrderAlreadyPaid);
            assert_eq!(app.message, "Order already paid");
        }
        other => panic!("unexpected {other}"),
    }
}

#[tokio::test]
async fn test_upload_requires_configuration() {
    let client = HttpClient::new(&ClientConfig::new("http://localhost:1/api")).unwrap();
    let err = client.upload_asset("pizza.png", vec![1, 2, 3]).await.unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}
