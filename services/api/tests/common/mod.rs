//! Shared helpers for the api integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_lib::config::Config;
use api_lib::web::{self, state::AppState};
use async_trait::async_trait;
use axum::Router;
use itinerary_core::ports::{ensure_prompt, ProviderError, ProviderResult, TextGenerationProvider};
use itinerary_core::relay::ItineraryRelay;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

//=========================================================================================
// Stub Providers
//=========================================================================================

/// Answers every prompt with a fixed prefix and records what it was asked.
#[derive(Default)]
pub struct StubProvider {
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    pub failure: Option<ProviderError>,
}

impl StubProvider {
    pub fn failing(error: ProviderError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerationProvider for StubProvider {
    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        let prompt = ensure_prompt(prompt)?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        tokio::task::yield_now().await;
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(format!("Itinerary: {prompt}")),
        }
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|_| None).expect("default config")
}

pub fn app_with(provider: Arc<StubProvider>, config: Config) -> Router {
    let state = Arc::new(AppState {
        config: Arc::new(config),
        relay: ItineraryRelay::new(provider),
    });
    web::router(state)
}

//=========================================================================================
// Canned Provider Server
//=========================================================================================

/// One request as the canned server saw it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }

    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }
}

/// A local HTTP server that answers every connection with the same reply.
pub struct CannedServer {
    pub base_url: String,
    pub hits: Arc<AtomicUsize>,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl CannedServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> CapturedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one request")
    }
}

/// Serves `body` with `status` (e.g. "200 OK") to every request.
pub async fn serve(status: &'static str, body: &'static str) -> CannedServer {
    start(Some((status, body))).await
}

/// Accepts requests but never answers them.
pub async fn serve_silence() -> CannedServer {
    start(None).await
}

async fn start(reply: Option<(&'static str, &'static str)>) -> CannedServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local test listener");
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let server_hits = hits.clone();
    let server_requests = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let hits = server_hits.clone();
            let requests = server_requests.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                hits.fetch_add(1, Ordering::SeqCst);
                requests.lock().unwrap().push(request);

                match reply {
                    Some((status, body)) => {
                        let response = format!(
                            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{body}",
                            body.len()
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                    None => tokio::time::sleep(Duration::from_secs(30)).await,
                }
            });
        }
    });

    CannedServer {
        base_url: format!("http://{addr}"),
        hits,
        requests,
    }
}

/// Reads one request, including its `Content-Length` body.
async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    let body_start = head_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        head,
        body: buf[body_start..body_start + content_length].to_vec(),
    })
}
