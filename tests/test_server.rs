//! End-to-end tests over real TCP connections

use std::net::SocketAddr;
use std::sync::Arc;

use courier::files::FileStore;
use courier::server::Router;
use courier::server::listener::{ACCEPT_BACKOFF, serve};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct TestServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<anyhow::Result<()>>,
    dir: TempDir,
}

async fn start() -> TestServer {
    let dir = TempDir::new().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Arc::new(Router::with_store(FileStore::new(dir.path())));
    let (shutdown, signal) = oneshot::channel::<()>();

    let handle = tokio::spawn(serve(listener, router, async move {
        let _ = signal.await;
    }));

    TestServer {
        addr,
        shutdown,
        handle,
        dir,
    }
}

async fn send(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

fn split_response(response: &str) -> (&str, &str) {
    response.split_once("\r\n\r\n").unwrap()
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|line| line.strip_prefix("Content-Length: "))
        .unwrap()
        .parse()
        .unwrap()
}

#[tokio::test]
async fn test_server_welcome() {
    let server = start().await;

    let response = send(server.addr, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert_eq!(
        response,
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 8\r\n\r\nWelcome!"
    );

    server.shutdown.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_content_length_matches_body() {
    let server = start().await;

    let requests = [
        "GET / HTTP/1.1\r\n\r\n",
        "GET /echo/caf%C3%A9 HTTP/1.1\r\n\r\n",
        "GET /echo/日本語/テキスト HTTP/1.1\r\n\r\n",
        "GET /user-agent HTTP/1.1\r\nUser-Agent: Mozilla/5.0 (X11)\r\n\r\n",
        "GET /user-agent HTTP/1.1\r\n\r\n",
        "GET /nonexistent/path HTTP/1.1\r\n\r\n",
        "GET /files/missing.bin HTTP/1.1\r\n\r\n",
        "NONSENSE\r\n\r\n",
    ];

    for request in requests {
        let response = send(server.addr, request).await;
        let (head, body) = split_response(&response);
        assert_eq!(content_length(head), body.len(), "request: {request:?}");
    }

    server.shutdown.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_echo_non_ascii() {
    let server = start().await;

    let response = send(server.addr, "GET /echo/日本語/テキスト HTTP/1.1\r\n\r\n").await;
    let (head, body) = split_response(&response);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(body, "日本語/テキスト");

    server.shutdown.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_user_agent() {
    let server = start().await;

    let response = send(
        server.addr,
        "GET /user-agent HTTP/1.1\r\nHost: localhost\r\nUser-Agent: TestAgent/1.0\r\n\r\n",
    )
    .await;
    assert_eq!(split_response(&response).1, "TestAgent/1.0");

    let response = send(server.addr, "GET /user-agent HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert_eq!(split_response(&response).1, "User-Agent not found");

    server.shutdown.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_file_round_trip() {
    let server = start().await;

    let response = send(
        server.addr,
        "POST /files/foo.txt HTTP/1.1\r\nContent-Type: application/octet-stream\r\nContent-Length: 5\r\n\r\nhello",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 201 Created\r\n"));

    let response = send(server.addr, "GET /files/foo.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(
        response,
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello"
    );
    assert_eq!(
        std::fs::read_to_string(server.dir.path().join("foo.txt")).unwrap(),
        "hello"
    );

    server.shutdown.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_not_found() {
    let server = start().await;

    for path in ["/files/missing.bin", "/nonexistent/path"] {
        let response = send(server.addr, &format!("GET {path} HTTP/1.1\r\n\r\n")).await;
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert_eq!(split_response(&response).1, "Not Found");
    }

    server.shutdown.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_concurrent_posts_same_file() {
    let server = start().await;

    let first = "x".repeat(200);
    let second = "y".repeat(300);

    let mut tasks = Vec::new();
    for body in [first.clone(), second.clone(), first.clone(), second.clone()] {
        let addr = server.addr;
        tasks.push(tokio::spawn(async move {
            let request = format!(
                "POST /files/shared.txt HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
                body.len(),
                body
            );
            send(addr, &request).await
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().starts_with("HTTP/1.1 201 Created\r\n"));
    }

    let stored = std::fs::read_to_string(server.dir.path().join("shared.txt")).unwrap();
    assert!(stored == first || stored == second);

    server.shutdown.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_waits_for_open_connections_on_shutdown() {
    let server = start().await;

    // Connected but silent: the request is only sent after shutdown is signalled
    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    server.shutdown.send(()).unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(!server.handle.is_finished());

    stream.write_all(b"GET /echo/late HTTP/1.1\r\n\r\n").await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    assert!(String::from_utf8(response).unwrap().ends_with("\r\n\r\nlate"));

    server.handle.await.unwrap().unwrap();

    // Listening socket is released
    assert!(TcpStream::connect(server.addr).await.is_err());
}

#[test]
fn test_accept_failures_back_off() {
    assert!(ACCEPT_BACKOFF >= std::time::Duration::from_millis(10));
    assert!(ACCEPT_BACKOFF <= std::time::Duration::from_secs(1));
}
