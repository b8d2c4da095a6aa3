//! Integration tests for the panel HTTP transport.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tower::ServiceExt;

use webpanel_core::{CheckButton, Page, RadioGroup, Revision, Slider, Span};
use webpanel_protocol::{decode_sync_response, SyncResponse};
use webpanel_server::{PanelServer, ServerConfig};

fn demo_page() -> Page {
    Page::new(
        "Integration",
        vec![
            Span::new("status", "idle").into(),
            Slider::new("s1", 0, 100, 50).into(),
            CheckButton::new("led", "LED", false).into(),
            RadioGroup::new("mode")
                .option("a", "A")
                .option("b", "B")
                .selected("a")
                .into(),
        ],
    )
}

async fn post(app: &Router, form: &str) -> SyncResponse {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    decode_sync_response(std::str::from_utf8(&body).unwrap()).unwrap()
}

#[tokio::test]
async fn test_get_renders_page() {
    let server = PanelServer::new(ServerConfig::default(), demo_page());
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = server.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("<TITLE>Integration</TITLE>"));
    assert!(html.contains("<span id=\"status\">idle</span>"));
    assert!(html.contains("type=\"radio\" name=\"mode\""));
}

#[tokio::test]
async fn test_slider_update() {
    let app = PanelServer::new(ServerConfig::default(), demo_page()).router();
    let response = post(&app, "id=s1&value=75&revision=0").await;

    assert_eq!(response.revision, Revision(1));
    assert_eq!(response.ids(), ["s1"]);
    assert_eq!(
        response.update_for("s1").and_then(|u| u.property("value")),
        Some("75")
    );
}

#[tokio::test]
async fn test_slider_value_is_clamped() {
    let app = PanelServer::new(ServerConfig::default(), demo_page()).router();
    let response = post(&app, "id=s1&value=250&revision=0").await;
    assert_eq!(
        response.update_for("s1").and_then(|u| u.property("value")),
        Some("100")
    );
}

#[tokio::test]
async fn test_radio_selection_updates_siblings() {
    let app = PanelServer::new(ServerConfig::default(), demo_page()).router();
    let response = post(&app, "id=b&value=t&revision=0").await;

    assert_eq!(response.ids(), ["a", "b"]);
    assert_eq!(
        response.update_for("a").and_then(|u| u.property("checked")),
        Some("")
    );
    assert_eq!(
        response.update_for("b").and_then(|u| u.property("checked")),
        Some("true")
    );
}

#[tokio::test]
async fn test_empty_poll() {
    let app = PanelServer::new(ServerConfig::default(), demo_page()).router();
    let first = post(&app, "id=&revision=0").await;
    assert!(first.is_empty());

    let second = post(&app, &format!("id=&revision={}", first.revision)).await;
    assert!(second.is_empty());
    assert_eq!(second.revision, first.revision.next());
}

#[tokio::test]
async fn test_client_ahead_after_restart() {
    let app = PanelServer::new(ServerConfig::default(), demo_page()).router();
    post(&app, "id=s1&value=75.0&revision=0").await;

    // a browser still holding a revision from before a restart
    let response = post(&app, "id=&revision=900").await;
    assert!(response.is_empty());
}

#[tokio::test]
async fn test_clients_converge() {
    let app = PanelServer::new(ServerConfig::default(), demo_page()).router();

    let a = post(&app, "id=led&value=t&revision=0").await;
    assert_eq!(a.ids(), ["led"]);

    // second client last saw revision 0
    let b = post(&app, "id=&revision=0").await;
    assert_eq!(b.ids(), ["led"]);
    assert_eq!(
        b.update_for("led").and_then(|u| u.property("checked")),
        Some("true")
    );

    let a = post(&app, &format!("id=&revision={}", a.revision)).await;
    let b = post(&app, &format!("id=&revision={}", b.revision)).await;
    assert!(a.is_empty());
    assert!(b.is_empty());
}

#[tokio::test]
async fn test_server_side_update_via_handle() {
    let server = PanelServer::new(ServerConfig::default(), demo_page());
    let handle = server.handle();
    let app = server.router();

    let seen = post(&app, "id=&revision=0").await.revision;
    let found = handle
        .update(|page, clock| page.set_text("status", "busy <1>", clock))
        .await;
    assert!(found);

    let response = post(&app, &format!("id=&revision={seen}")).await;
    assert_eq!(
        response.update_for("status").and_then(|u| u.property("innerHTML")),
        Some("busy <1>")
    );
}

#[tokio::test]
async fn test_url_encoded_values() {
    let server = PanelServer::new(
        ServerConfig::default(),
        Page::new("t", vec![Slider::new("fan speed", 0, 10, 0).into()]),
    );
    let app = server.router();
    let response = post(&app, "id=fan%20speed&value=%2B3&revision=0").await;
    assert_eq!(
        response.update_for("fan speed").and_then(|u| u.property("value")),
        Some("3")
    );
}

#[tokio::test]
async fn test_serve_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = PanelServer::new(ServerConfig::default(), demo_page());
    let task = tokio::spawn(server.serve(listener));

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut raw))
        .await
        .expect("response within timeout")
        .unwrap();
    let text = String::from_utf8_lossy(&raw);

    assert!(text.starts_with("HTTP/1.1 200 OK"));
    assert!(text.contains("<FORM autocomplete=\"off\">"));
    task.abort();
}
