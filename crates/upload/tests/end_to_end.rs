//! Full pipeline against a scripted local HTTP server.

use std::time::Duration;

use kobiton_api::ClientConfig;
use kobiton_upload::{PollConfig, UploadError, UploadRequest, UploadSettings, upload_build};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .find_map(|l| {
                    let (k, v) = l.split_once(':')?;
                    k.eq_ignore_ascii_case("content-length")
                        .then(|| v.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serves `script` one connection at a time and returns the request lines.
async fn scripted_server(
    listener: TcpListener,
    script: Vec<(u16, String)>,
) -> tokio::task::JoinHandle<Vec<String>> {
    tokio::spawn(async move {
        let mut seen = Vec::new();
        for (status, body) in script {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            seen.push(request.lines().next().unwrap_or_default().to_string());

            let resp = format!(
                "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        seen
    })
}

fn settings(port: u16) -> UploadSettings {
    UploadSettings {
        client: ClientConfig {
            base_url: format!("http://127.0.0.1:{port}/v1"),
            timeout: Duration::from_secs(5),
        },
        poll: PollConfig {
            max_attempts: 10,
            interval: Duration::from_millis(1),
        },
    }
}

fn build_request(dir: &tempfile::TempDir, name: Option<&str>) -> UploadRequest {
    let path = dir.path().join("Demo.apk");
    std::fs::write(&path, b"apk-bytes").unwrap();
    UploadRequest::new("alice", "secret", path, 12, name.map(Into::into)).unwrap()
}

#[tokio::test]
async fn upload_poll_and_rename() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let script = vec![
        (
            200,
            format!(r#"{{"appPath":"p1","url":"http://127.0.0.1:{port}/storage/p1?sig=1"}}"#),
        ),
        (200, String::new()),
        (200, r#"{"versionId":77,"appId":12}"#.to_string()),
        (404, r#"{"message":"Not Found"}"#.to_string()),
        (200, r#"{"id":77,"state":"OK"}"#.to_string()),
        (200, "{}".to_string()),
    ];
    let server = scripted_server(listener, script).await;

    let dir = tempfile::tempdir().unwrap();
    let req = build_request(&dir, Some("Demo build"));
    let outcome = upload_build(&req, &settings(port)).await.unwrap();

    assert_eq!(outcome.version_id, 77);
    assert_eq!(outcome.app_path, "p1");
    assert_eq!(outcome.renamed_to.as_deref(), Some("Demo build"));

    let seen = server.await.unwrap();
    assert_eq!(
        seen,
        vec![
            "POST /v1/apps/uploadUrl HTTP/1.1",
            "PUT /storage/p1?sig=1 HTTP/1.1",
            "POST /v1/apps HTTP/1.1",
            "GET /v1/app/versions/77 HTTP/1.1",
            "GET /v1/app/versions/77 HTTP/1.1",
            "POST /v1/app/versions/77/rename HTTP/1.1",
        ]
    );
}

#[tokio::test]
async fn storage_error_stops_the_run() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let script = vec![
        (
            200,
            format!(r#"{{"appPath":"p1","url":"http://127.0.0.1:{port}/storage/p1"}}"#),
        ),
        (500, "<Error><Code>InternalError</Code></Error>".to_string()),
    ];
    let server = scripted_server(listener, script).await;

    let dir = tempfile::tempdir().unwrap();
    let req = build_request(&dir, None);
    let err = upload_build(&req, &settings(port)).await.unwrap_err();

    assert!(matches!(err, UploadError::BlobUpload));
    assert_eq!(server.await.unwrap().len(), 2);
}

#[tokio::test]
async fn rejected_credentials_surface_status_and_body() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let script = vec![(401, r#"{"message":"Unauthorized"}"#.to_string())];
    let server = scripted_server(listener, script).await;

    let dir = tempfile::tempdir().unwrap();
    let req = build_request(&dir, Some("ignored"));
    let err = upload_build(&req, &settings(port)).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Unauthorized"));
    assert_eq!(server.await.unwrap().len(), 1);
}
