use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::{AiEndpoint, AiRequest, AiResponse, EndpointError};

/// JSON-over-HTTP endpoint: POSTs `{task, context}` and expects an
/// [`AiResponse`] body, optionally wrapped in a markdown code fence.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: Client,
    url: String,
}

impl HttpEndpoint {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, EndpointError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| EndpointError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AiEndpoint for HttpEndpoint {
    async fn complete(&self, request: &AiRequest) -> Result<AiResponse, EndpointError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| EndpointError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EndpointError::RateLimited);
        }
        if !status.is_success() {
            return Err(EndpointError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| EndpointError::Transport(e.to_string()))?;
        parse_response(&body)
    }
}

/// Parse a response body, tolerating a surrounding ```json fence.
pub(crate) fn parse_response(body: &str) -> Result<AiResponse, EndpointError> {
    let clean = body.replace("```json", "").replace("```", "");
    serde_json::from_str(clean.trim()).map_err(|e| EndpointError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::ai::{AiTask, Confidence};

    const ADVICE: &str = r#"{"reasoning":"r","suggestion":"s","confidence":"high","disclaimer":"d"}"#;

    /// Serve one HTTP request with `status` and `body`, returning the
    /// request body the client sent.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("http://{}/api/ai", listener.local_addr().expect("addr"));
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let request_body = loop {
                let n = stream.read(&mut chunk).await.expect("read");
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    let received = &text[split + 4..];
                    if received.len() >= length || n == 0 {
                        break received.to_string();
                    }
                }
                if n == 0 {
                    break String::new();
                }
            };
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.expect("write");
            stream.shutdown().await.ok();
            request_body
        });
        (url, server)
    }

    fn request() -> AiRequest {
        AiRequest {
            task: AiTask::MissedDoseAdvice,
            context: json!({ "medicineName": "Metformin" }),
        }
    }

    #[tokio::test]
    async fn posts_task_and_context() {
        let (url, server) = serve_once("200 OK", ADVICE).await;
        let endpoint = HttpEndpoint::new(url, Duration::from_secs(5)).expect("client");

        let response = endpoint.complete(&request()).await.expect("response");
        assert_eq!(response.confidence, Confidence::High);

        let sent: serde_json::Value =
            serde_json::from_str(&server.await.expect("server")).expect("json body");
        assert_eq!(
            sent,
            json!({ "task": "missed_dose_advice", "context": { "medicineName": "Metformin" } })
        );
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let (url, _server) = serve_once("429 Too Many Requests", "").await;
        let endpoint = HttpEndpoint::new(url, Duration::from_secs(5)).expect("client");
        assert!(matches!(
            endpoint.complete(&request()).await,
            Err(EndpointError::RateLimited)
        ));
    }

    #[tokio::test]
    async fn unavailable_is_status() {
        let (url, _server) =
            serve_once("503 Service Unavailable", r#"{"error":"AI unavailable"}"#).await;
        let endpoint = HttpEndpoint::new(url, Duration::from_secs(5)).expect("client");
        assert!(matches!(
            endpoint.complete(&request()).await,
            Err(EndpointError::Status(503))
        ));
    }

    #[test]
    fn parse_tolerates_code_fence() {
        let fenced = format!("```json\n{ADVICE}\n```");
        assert_eq!(parse_response(&fenced).expect("parses").suggestion, "s");
        assert!(matches!(
            parse_response("I cannot help with that."),
            Err(EndpointError::Parse(_))
        ));
    }
}
