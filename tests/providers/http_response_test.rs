//! HTTP status mapping, sanitization and truncation.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use smartsense::providers::{check_http_response, ProviderError};

async fn serve_once(status_line: &str, body: &str) -> String {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) => panic!("listener should bind: {err}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => panic!("listener should expose local addr: {err}"),
    };

    let status_line_owned = status_line.to_owned();
    let body_owned = body.to_owned();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut read_buf = [0_u8; 1024];
            let _ = socket.read(&mut read_buf).await;

            let response = format!(
                "HTTP/1.1 {status_line_owned}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body_owned}",
                body_owned.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    format!("http://{addr}/")
}

async fn checked(status_line: &str, body: &str) -> Result<String, ProviderError> {
    let url = serve_once(status_line, body).await;
    let response = match reqwest::get(url).await {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };
    check_http_response("test/model", response).await
}

#[tokio::test]
async fn success_returns_body() {
    let body = checked("200 OK", "hello").await.expect("2xx should pass");
    assert_eq!(body, "hello");
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    let err = checked("429 Too Many Requests", "slow down")
        .await
        .expect_err("429 should fail");
    assert!(err.is_rate_limited());
    assert!(matches!(err, ProviderError::RateLimited { ref model } if model == "test/model"));
}

#[tokio::test]
async fn error_body_redacts_api_keys() {
    let raw_key = "sk-or-v1-abcdefghijklmnopqrstuvwxyz123456";
    let err = checked("401 Unauthorized", &format!("invalid key {raw_key}"))
        .await
        .expect_err("401 should fail");

    assert!(!err.is_rate_limited());
    match err {
        ProviderError::HttpStatus { status, body } => {
            assert_eq!(status, 401);
            assert!(!body.contains(raw_key));
            assert!(body.contains("[REDACTED]"));
        }
        other => panic!("expected http status error, got: {other}"),
    }
}

#[tokio::test]
async fn long_error_body_is_truncated() {
    let body = "x".repeat(400);
    let err = checked("500 Internal Server Error", &body)
        .await
        .expect_err("500 should fail");

    match err {
        ProviderError::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert!(body.ends_with("...[truncated]"));
            assert!(body.len() < 400);
        }
        other => panic!("expected http status error, got: {other}"),
    }
}
