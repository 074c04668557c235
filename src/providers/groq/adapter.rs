use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::models::*;
use crate::models::{Role, NO_CONTENT_FALLBACK};
use crate::providers::traits::CompletionProvider;
use crate::providers::types::{CompletionRequest, ProviderError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct GroqProvider {
    client: Client,
    url: String,
}

impl GroqProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    fn build_auth_header(api_key: &str) -> String {
        format!("Bearer {}", api_key)
    }

    fn build_request(request: &CompletionRequest) -> GroqRequest {
        GroqRequest {
            model: request.model.clone(),
            messages: vec![GroqMessage {
                role: Role::User.as_str().to_string(),
                content: request.prompt.clone(),
            }],
        }
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let body = Self::build_request(&request);

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", Self::build_auth_header(&request.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Completion endpoint answered {}", status.as_u16());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await.map_err(ProviderError::from_reqwest)?;
        let parsed: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(first_content(&parsed)
            .unwrap_or(NO_CONTENT_FALLBACK)
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;

    use super::*;
    use crate::models::FailureKind;

    const PATH: &str = "/openai/v1/chat/completions";

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Answers exactly one request with the given status line and body, and
    /// hands back the raw request it received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let _ = tx.send(request);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        (format!("http://{}{}", addr, PATH), rx)
    }

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            api_key: "gsk_test".to_string(),
            model: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            prompt: prompt.to_string(),
        }
    }

    fn provider(url: &str) -> GroqProvider {
        GroqProvider::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_returns_first_choice_content() {
        let (url, _rx) = serve_once("200 OK", r#"{"choices":[{"message":{"content":"X"}}]}"#).await;

        let content = provider(&url).complete(request("hello")).await.unwrap();
        assert_eq!(content, "X");
    }

    #[tokio::test]
    async fn test_sends_model_prompt_and_bearer_token() {
        let (url, rx) = serve_once("200 OK", r#"{"choices":[{"message":{"content":"ok"}}]}"#).await;

        provider(&url).complete(request("3 bed house")).await.unwrap();
        let raw = rx.await.unwrap();

        assert!(raw.starts_with(&format!("POST {} HTTP/1.1", PATH)));
        let lower = raw.to_ascii_lowercase();
        assert!(lower.contains("authorization: bearer gsk_test"));
        assert!(lower.contains("content-type: application/json"));

        let body = &raw[raw.find("\r\n\r\n").unwrap() + 4..];
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["model"], "meta-llama/llama-4-scout-17b-16e-instruct");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "3 bed house");
    }

    #[tokio::test]
    async fn test_empty_choices_fall_back() {
        let (url, _rx) = serve_once("200 OK", r#"{"choices":[]}"#).await;

        let content = provider(&url).complete(request("hello")).await.unwrap();
        assert_eq!(content, NO_CONTENT_FALLBACK);
    }

    #[tokio::test]
    async fn test_missing_keys_fall_back() {
        let (url, _rx) = serve_once("200 OK", r#"{"choices":[{"index":0}]}"#).await;
        assert_eq!(
            provider(&url).complete(request("a")).await.unwrap(),
            NO_CONTENT_FALLBACK
        );

        let (url, _rx) = serve_once("200 OK", r#"{"id":"chatcmpl-1"}"#).await;
        assert_eq!(
            provider(&url).complete(request("b")).await.unwrap(),
            NO_CONTENT_FALLBACK
        );
    }

    #[tokio::test]
    async fn test_wrong_value_types_fall_back() {
        for body in [
            r#"{"choices":[{"message":{"content":42}}]}"#,
            r#"{"choices":null}"#,
            r#"{"choices":[{"message":"hi"}]}"#,
        ] {
            let (url, _rx) = serve_once("200 OK", body).await;
            let content = provider(&url).complete(request("c")).await.unwrap();
            assert_eq!(content, NO_CONTENT_FALLBACK, "body: {}", body);
        }
    }

    #[tokio::test]
    async fn test_non_200_carries_status_and_body() {
        let (url, _rx) = serve_once("403 Forbidden", "forbidden").await;

        let err = provider(&url).complete(request("hello")).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Status(403));
        let text = err.user_text();
        assert!(text.contains("403"));
        assert!(text.contains("forbidden"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_failure() {
        let (url, _rx) = serve_once("200 OK", "<html>gateway</html>").await;

        let err = provider(&url).complete(request("hello")).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Decode);
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let provider =
            GroqProvider::new(format!("http://{}{}", addr, PATH), Duration::from_millis(300))
                .unwrap();
        let err = provider.complete(request("hello")).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Timeout);
    }

    #[tokio::test]
    async fn test_closed_port_is_connect_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(&format!("http://{}{}", addr, PATH))
            .complete(request("hello"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Connect);
        assert!(err.user_text().starts_with("An error occurred:"));
    }
}
