//! In-process HTTP callback receiver shared by the end-to-end tests

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How long `/slow` holds a request before answering
pub const SLOW_RESPONSE: Duration = Duration::from_secs(1);

#[derive(Default)]
pub struct Recorded {
    ok: Mutex<Vec<(String, Vec<u8>)>>,
    fail_hits: AtomicUsize,
    slow_hits: AtomicUsize,
}

impl Recorded {
    /// Bodies received on `/ok/{id}`
    pub fn received_by(&self, id: &str) -> Vec<Vec<u8>> {
        self.ok
            .lock()
            .unwrap()
            .iter()
            .filter(|(who, _)| who == id)
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn ok_count(&self) -> usize {
        self.ok.lock().unwrap().len()
    }

    pub fn fail_hits(&self) -> usize {
        self.fail_hits.load(Ordering::SeqCst)
    }

    pub fn slow_hits(&self) -> usize {
        self.slow_hits.load(Ordering::SeqCst)
    }
}

pub struct Receiver {
    pub base: String,
    pub recorded: Arc<Recorded>,
}

impl Receiver {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

async fn ok(
    State(recorded): State<Arc<Recorded>>,
    Path(id): Path<String>,
    body: Bytes,
) -> StatusCode {
    recorded.ok.lock().unwrap().push((id, body.to_vec()));
    StatusCode::OK
}

async fn fail(State(recorded): State<Arc<Recorded>>) -> StatusCode {
    recorded.fail_hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::SERVICE_UNAVAILABLE
}

async fn slow(State(recorded): State<Arc<Recorded>>) -> StatusCode {
    recorded.slow_hits.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(SLOW_RESPONSE).await;
    StatusCode::OK
}

/// Serve `/ok/{id}`, `/fail` and `/slow` on an ephemeral localhost port
pub async fn spawn_receiver() -> Receiver {
    let recorded = Arc::new(Recorded::default());
    let app = Router::new()
        .route("/ok/{id}", post(ok))
        .route("/fail", post(fail))
        .route("/slow", post(slow))
        .with_state(Arc::clone(&recorded));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Receiver {
        base: format!("http://{}", addr),
        recorded,
    }
}

/// Poll `condition` until it holds or `within` elapses
pub async fn eventually<F: Fn() -> bool>(within: Duration, condition: F) -> bool {
    let deadline = tokio::time::Instant::now() + within;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
