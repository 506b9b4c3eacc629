//! Loader tests against a throwaway in-process HTTP server: a TCP listener
//! that answers each GET from a canned route table and closes.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use cancionero_core::error::LoadError;
use cancionero_core::fetch::CatalogClient;

type Routes = HashMap<String, (u16, String)>;

/// Serve `routes` on an ephemeral port; unknown paths get a 404.  Returns the
/// base URL.  The task lives for the rest of the test process.
async fn serve(routes: Routes) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };
            let routes = Arc::clone(&routes);
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = sock.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let request = String::from_utf8_lossy(&buf);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or((404, String::new()));
                let reason = if status == 200 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = sock.write_all(response.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

fn ok(body: &str) -> (u16, String) {
    (200, body.to_string())
}

#[tokio::test]
async fn loads_catalog_in_index_order_with_cleaned_bodies() {
    let mut routes = Routes::new();
    routes.insert(
        "/songs/index.json".to_string(),
        ok(r#"[
            { "id": 1, "number": 1, "title": "Alpha", "file": "a.txt" },
            { "id": 2, "number": 2, "title": "Beta", "file": "b.txt" },
            { "id": 3, "number": 3, "title": "Gamma", "file": "g.txt" }
        ]"#),
    );
    routes.insert("/songs/a.txt".to_string(), ok("\u{feff}  cuerpo alfa  \n"));
    routes.insert("/songs/b.txt".to_string(), ok("cuerpo beta\n\nsegunda estrofa\n"));
    routes.insert("/songs/g.txt".to_string(), ok(""));

    let client = CatalogClient::new(&serve(routes).await);
    let songs = client.load().await.expect("catalog should load");

    assert_eq!(songs.len(), 3);
    assert_eq!(
        songs.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![1, 2, 3],
        "catalog must preserve index order"
    );
    assert_eq!(songs[0].body, "cuerpo alfa");
    assert_eq!(songs[1].body, "cuerpo beta\n\nsegunda estrofa");
    assert_eq!(songs[2].body, "");
}

#[tokio::test]
async fn missing_body_degrades_to_empty_string() {
    let mut routes = Routes::new();
    routes.insert(
        "/songs/index.json".to_string(),
        ok(r#"[ { "id": 1, "number": 1, "title": "Alpha", "file": "a.txt" } ]"#),
    );
    // no route for /songs/a.txt -> 404

    let client = CatalogClient::new(&serve(routes).await);
    let songs = client.load().await.expect("body failures are not fatal");

    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].id, 1);
    assert_eq!(songs[0].title, "Alpha");
    assert_eq!(songs[0].body, "");
}

#[tokio::test]
async fn index_http_error_is_fatal() {
    let mut routes = Routes::new();
    routes.insert("/songs/index.json".to_string(), (500, "boom".to_string()));

    let client = CatalogClient::new(&serve(routes).await);
    let err = client.load().await.expect_err("HTTP 500 on the index is fatal");
    assert!(matches!(err, LoadError::IndexStatus(status) if status.as_u16() == 500));
}

#[tokio::test]
async fn absent_index_is_fatal() {
    let client = CatalogClient::new(&serve(Routes::new()).await);
    let err = client.load().await.expect_err("404 on the index is fatal");
    assert!(matches!(err, LoadError::IndexStatus(status) if status.as_u16() == 404));
}

#[tokio::test]
async fn unparsable_index_is_fatal() {
    let mut routes = Routes::new();
    routes.insert("/songs/index.json".to_string(), ok("definitely not json"));

    let client = CatalogClient::new(&serve(routes).await);
    let err = client.load().await.expect_err("bad JSON in the index is fatal");
    assert!(matches!(err, LoadError::IndexParse(_)));
}

#[tokio::test]
async fn unreachable_server_is_fatal() {
    // nothing listens on this port; connection is refused immediately
    let client = CatalogClient::new("http://127.0.0.1:9");
    let err = client.load().await.expect_err("network error on the index is fatal");
    assert!(matches!(err, LoadError::IndexFetch(_)));
}
