use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{Answer, AskRequest};
use crate::core::message::latency_millis;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AskMessage {
    Answered { answer: Answer, latency: Duration },
    Failed(String),
}

/// Why a request did not produce an answer. Never shown to the user; every
/// variant collapses to the same fallback text in the transcript.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("response body is not JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Where requests go and how they authenticate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceTarget {
    pub endpoint: String,
    pub api_key_header: String,
    pub api_key: String,
}

pub struct AskParams {
    pub client: reqwest::Client,
    pub target: ServiceTarget,
    pub prompt: String,
    pub cancel_token: CancellationToken,
    pub request_id: u64,
}

/// Issue one POST and decode the body.
pub async fn ask(
    client: &reqwest::Client,
    target: &ServiceTarget,
    prompt: &str,
) -> Result<Answer, AskError> {
    let request = AskRequest {
        prompt: prompt.to_string(),
    };

    let response = client
        .post(&target.endpoint)
        .header("Content-Type", "application/json")
        .header(target.api_key_header.as_str(), target.api_key.as_str())
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        return Err(AskError::Status { status, body });
    }

    let bytes = response.bytes().await?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(AskError::Decode)?;
    Ok(Answer::from_value(&value))
}

#[derive(Clone)]
pub struct AskService {
    tx: mpsc::UnboundedSender<(AskMessage, u64)>,
}

impl AskService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(AskMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Run the request on a background task and report its settlement tagged
    /// with `request_id`. A cancelled request reports nothing.
    pub fn spawn_request(&self, params: AskParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let AskParams {
                client,
                target,
                prompt,
                cancel_token,
                request_id,
            } = params;

            debug!(
                request_id,
                endpoint = %target.endpoint,
                prompt_len = prompt.len(),
                "issuing request"
            );
            let started = Instant::now();

            tokio::select! {
                result = ask(&client, &target, &prompt) => {
                    let latency = started.elapsed();
                    let message = match result {
                        Ok(answer) => {
                            debug!(
                                request_id,
                                latency_ms = latency_millis(latency),
                                sources = answer.sources.len(),
                                "request settled"
                            );
                            AskMessage::Answered { answer, latency }
                        }
                        Err(err) => {
                            warn!(request_id, error = %err, "request failed");
                            AskMessage::Failed(err.to_string())
                        }
                    };
                    let _ = tx.send((message, request_id));
                }
                _ = cancel_token.cancelled() => {
                    debug!(request_id, "request cancelled");
                }
            }
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: AskMessage, request_id: u64) {
        let _ = self.tx.send((message, request_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}/ask")
    }

    fn target(endpoint: String) -> ServiceTarget {
        ServiceTarget {
            endpoint,
            api_key_header: "x-api-key".into(),
            api_key: "secret".into(),
        }
    }

    #[tokio::test]
    async fn ask_posts_prompt_with_api_key_header() {
        let router = Router::new().route(
            "/ask",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let key = headers
                    .get("x-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({
                    "response": format!("{} / {}", body["prompt"].as_str().unwrap_or_default(), key),
                    "sources": ["doc1"]
                }))
            }),
        );
        let endpoint = serve(router).await;

        let answer = ask(&reqwest::Client::new(), &target(endpoint), "What is RAG?")
            .await
            .expect("answer");

        assert_eq!(answer.text, "What is RAG? / secret");
        assert_eq!(answer.sources, vec!["doc1".to_string()]);
    }

    #[tokio::test]
    async fn ask_treats_error_status_as_failure() {
        let router = Router::new().route(
            "/ask",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Internal Server Error"})),
                )
            }),
        );
        let endpoint = serve(router).await;

        let err = ask(&reqwest::Client::new(), &target(endpoint), "q")
            .await
            .expect_err("status error");

        assert!(matches!(err, AskError::Status { status, .. } if status.as_u16() == 500));
    }

    #[tokio::test]
    async fn ask_rejects_non_json_body() {
        let router = Router::new().route("/ask", post(|| async { "plain text" }));
        let endpoint = serve(router).await;

        let err = ask(&reqwest::Client::new(), &target(endpoint), "q")
            .await
            .expect_err("decode error");

        assert!(matches!(err, AskError::Decode(_)));
    }

    #[tokio::test]
    async fn spawned_request_reports_settlement_with_its_id() {
        let router = Router::new().route("/ask", post(|| async { Json(json!({})) }));
        let endpoint = serve(router).await;
        let (service, mut rx) = AskService::new();

        service.spawn_request(AskParams {
            client: reqwest::Client::new(),
            target: target(endpoint),
            prompt: "hello".into(),
            cancel_token: CancellationToken::new(),
            request_id: 7,
        });

        let (message, request_id) = rx.recv().await.expect("settlement");
        assert_eq!(request_id, 7);
        match message {
            AskMessage::Answered { answer, .. } => {
                assert_eq!(answer.text, crate::core::constants::NO_RESPONSE_FALLBACK);
                assert!(answer.sources.is_empty());
            }
            other => panic!("unexpected settlement: {other:?}"),
        }
    }

    #[tokio::test]
    async fn spawned_request_latency_covers_the_round_trip() {
        let router = Router::new().route(
            "/ask",
            post(|| async {
                tokio::time::sleep(Duration::from_millis(120)).await;
                Json(json!({"response": "ok"}))
            }),
        );
        let endpoint = serve(router).await;
        let (service, mut rx) = AskService::new();

        service.spawn_request(AskParams {
            client: reqwest::Client::new(),
            target: target(endpoint),
            prompt: "hello".into(),
            cancel_token: CancellationToken::new(),
            request_id: 2,
        });

        let (message, _) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("settled in time")
            .expect("settlement");
        match message {
            AskMessage::Answered { latency, .. } => {
                assert!(latency >= Duration::from_millis(120), "latency {latency:?}");
                assert!(latency < Duration::from_secs(5), "latency {latency:?}");
            }
            other => panic!("unexpected settlement: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_reports_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        let (service, mut rx) = AskService::new();

        service.spawn_request(AskParams {
            client: reqwest::Client::new(),
            target: target(format!("http://{addr}/ask")),
            prompt: "hello".into(),
            cancel_token: CancellationToken::new(),
            request_id: 3,
        });

        let (message, request_id) = rx.recv().await.expect("settlement");
        assert_eq!(request_id, 3);
        assert!(matches!(message, AskMessage::Failed(_)));
    }

    #[tokio::test]
    async fn cancelled_request_reports_nothing() {
        let router = Router::new().route(
            "/ask",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"response": "late"}))
            }),
        );
        let endpoint = serve(router).await;
        let (service, mut rx) = AskService::new();
        let token = CancellationToken::new();

        service.spawn_request(AskParams {
            client: reqwest::Client::new(),
            target: target(endpoint),
            prompt: "hello".into(),
            cancel_token: token.clone(),
            request_id: 1,
        });
        token.cancel();
        drop(service);

        assert!(rx.recv().await.is_none());
    }
}
