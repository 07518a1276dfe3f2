/*!
Stub HTTP de l'endpoint santé

Démarre un vrai serveur axum sur un port éphémère. Chaque requête sur
/api/health consomme la prochaine réponse scriptée ; quand la file est vide,
la réponse de repli est servie. Compte les hits pour les assertions.
*/

use crate::test_utils::{wait_until, SnapshotBuilder};
use anyhow::Result;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Réponse scriptée servie par le stub
#[derive(Debug, Clone)]
pub enum StubReply {
    /// 200 + corps JSON
    Json(Value),
    /// Statut HTTP sans corps utile
    Status(u16),
    /// 200 + corps brut (pour simuler un JSON invalide)
    Raw(String),
    /// Attend avant de servir la réponse interne
    Delayed(Duration, Box<StubReply>),
}

struct StubInner {
    replies: VecDeque<StubReply>,
    fallback: StubReply,
    hits: usize,
}

pub struct HealthStub {
    addr: SocketAddr,
    inner: Arc<Mutex<StubInner>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl HealthStub {
    /// Démarre le stub ; répond par défaut avec un snapshot sain
    pub async fn start() -> Result<Self> {
        env_logger::try_init().ok();

        let inner = Arc::new(Mutex::new(StubInner {
            replies: VecDeque::new(),
            fallback: StubReply::Json(SnapshotBuilder::new().build()),
            hits: 0,
        }));

        let app = Router::new()
            .route("/api/health", get(serve_reply))
            .with_state(inner.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                rx.await.ok();
            });
            if let Err(e) = server.await {
                log::warn!("⚠️ [STUB] server error: {}", e);
            }
        });

        log::info!("🧪 [STUB] health endpoint on http://{}", addr);
        Ok(Self { addr, inner, shutdown: Some(tx) })
    }

    pub fn url(&self) -> String {
        format!("http://{}/api/health", self.addr)
    }

    /// Ajoute une réponse à la file (FIFO)
    pub fn push_reply(&self, reply: StubReply) -> &Self {
        self.inner.lock().unwrap().replies.push_back(reply);
        self
    }

    /// Remplace la réponse servie quand la file est vide
    pub fn set_fallback(&self, reply: StubReply) {
        self.inner.lock().unwrap().fallback = reply;
    }

    pub fn hits(&self) -> usize {
        self.inner.lock().unwrap().hits
    }

    /// Attend que le stub ait reçu au moins `count` requêtes
    pub async fn wait_for_hits(&self, count: usize, timeout_ms: u64) -> Result<()> {
        let reached = wait_until(timeout_ms, || self.hits() >= count).await;
        if !reached {
            anyhow::bail!("expected {} hits, got {}", count, self.hits());
        }
        Ok(())
    }
}

impl Drop for HealthStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
    }
}

async fn serve_reply(State(inner): State<Arc<Mutex<StubInner>>>) -> Response {
    let reply = {
        let mut inner = inner.lock().unwrap();
        inner.hits += 1;
        let next = inner.replies.pop_front();
        next.unwrap_or_else(|| inner.fallback.clone())
    };
    render(reply).await
}

async fn render(mut reply: StubReply) -> Response {
    // les délais peuvent être imbriqués
    while let StubReply::Delayed(delay, next) = reply {
        tokio::time::sleep(delay).await;
        reply = *next;
    }

    match reply {
        StubReply::Json(body) => axum::Json(body).into_response(),
        StubReply::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, "stubbed failure").into_response()
        }
        StubReply::Raw(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        StubReply::Delayed(..) => unreachable!("delays unwrapped above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replies_then_fallback() {
        let stub = HealthStub::start().await.unwrap();
        stub.push_reply(StubReply::Status(503))
            .push_reply(StubReply::Raw("{not json".into()));

        let client = reqwest::Client::new();
        let first = client.get(stub.url()).send().await.unwrap();
        assert_eq!(first.status().as_u16(), 503);

        let second = client.get(stub.url()).send().await.unwrap();
        assert_eq!(second.text().await.unwrap(), "{not json");

        let third: Value = client.get(stub.url()).send().await.unwrap().json().await.unwrap();
        assert_eq!(third["status"], "active");

        stub.wait_for_hits(3, 1000).await.unwrap();
        assert_eq!(stub.hits(), 3);
    }
}
