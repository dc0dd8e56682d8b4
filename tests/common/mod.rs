#![allow(dead_code)]

use std::convert::Infallible;
use std::net::TcpListener;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;

/// Body every test server answers with.
pub const RESPONSE_BODY: &[u8] = br#"["abc123"]"#;

/// A request as seen by the test server.
#[derive(Debug)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

#[derive(Debug)]
pub struct Part {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decode the multipart/form-data body.
    pub fn parts(&self) -> Vec<Part> {
        let content_type = self.header("content-type").expect("no content-type");
        let boundary = multer::parse_boundary(content_type).unwrap();
        let body = self.body.clone();
        let stream = futures_util::stream::once(async move { Ok::<_, Infallible>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let mut parts = Vec::new();
            while let Some(field) = multipart.next_field().await.unwrap() {
                let name = field.name().unwrap_or_default().to_string();
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(|m| m.to_string());
                let data = field.bytes().await.unwrap().to_vec();
                parts.push(Part {
                    name,
                    filename,
                    content_type,
                    data,
                });
            }
            parts
        })
    }
}

pub struct TestServer {
    rx: mpsc::Receiver<Captured>,
}

impl TestServer {
    /// The first request the server received.
    pub fn captured(self) -> Captured {
        self.rx
            .recv_timeout(Duration::from_secs(10))
            .expect("no request reached the server")
    }
}

#[derive(Clone)]
struct CaptureState {
    tx: Arc<Mutex<mpsc::Sender<Captured>>>,
    status: StatusCode,
}

async fn capture(State(state): State<CaptureState>, request: Request) -> Response {
    let (head, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let captured = Captured {
        method: head.method.to_string(),
        path: head.uri.path().to_string(),
        headers: head.headers,
        body: body.to_vec(),
    };
    let _ = state.tx.lock().unwrap().send(captured);

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        RESPONSE_BODY,
    )
        .into_response()
}

/// Start an axum server on a free port that records every request and
/// answers with `status`. Returns the upload URL.
pub fn spawn_server(status: u16) -> (String, TestServer) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let url = format!("http://{}/upload", listener.local_addr().unwrap());

    let (tx, rx) = mpsc::channel();
    let state = CaptureState {
        tx: Arc::new(Mutex::new(tx)),
        status: StatusCode::from_u16(status).unwrap(),
    };

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            let app = Router::new().fallback(capture).with_state(state);
            axum::serve(listener, app).await.unwrap();
        });
    });

    (url, TestServer { rx })
}

/// An endpoint on a port nothing listens on.
pub fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/upload", addr)
}
