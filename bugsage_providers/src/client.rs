use async_trait::async_trait;
use bugsage_core::{CompletionProvider, CompletionReply, PromptMessage};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use crate::retry::retry_attempts;

const DEFAULT_BASE_URL: &str = "https://api.aimlapi.com/v1";

/// Total attempts per `complete` call, including the first.
const MAX_ATTEMPTS: usize = 3;

// Generation parameters are fixed per the service contract and are not
// caller-configurable.
const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 1024;
const TOP_P: f64 = 0.8;
const FREQUENCY_PENALTY: f64 = 0.5;
const PRESENCE_PENALTY: f64 = 0.1;

/// Client for an OpenAI-compatible chat completion endpoint.
///
/// The credential and model are resolved once at construction; each
/// `complete` call is independent and may run concurrently with others.
pub struct CompletionClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl CompletionClient {
    pub fn new(api_key: String, model: String) -> Self {
        info!("Creating CompletionClient for model: {model}");
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn build_request(&self, messages: &[PromptMessage]) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
            "top_p": TOP_P,
            "frequency_penalty": FREQUENCY_PENALTY,
            "presence_penalty": PRESENCE_PENALTY,
        })
    }

    /// Send a single request. Transport errors, non-2xx statuses, and
    /// unparseable bodies all surface as errors and count as a failed
    /// attempt.
    async fn try_send(&self, request: &serde_json::Value) -> anyhow::Result<CompletionReply> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        Ok(parse_reply(&response))
    }
}

/// Extract the reply text from the provider's first choice.
///
/// An absent or non-string content field is not an error here: the
/// orchestrator maps it to its fallback string.
fn parse_reply(response: &serde_json::Value) -> CompletionReply {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string);
    CompletionReply { content }
}

#[async_trait]
impl CompletionProvider for CompletionClient {
    async fn complete(&self, messages: &[PromptMessage]) -> anyhow::Result<CompletionReply> {
        let request = self.build_request(messages);

        debug!(
            "Sending completion request: model={}, messages={}",
            self.model,
            messages.len()
        );

        let reply = retry_attempts(|| self.try_send(&request), MAX_ATTEMPTS).await?;

        debug!("Received completion response");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugsage_core::Role;

    fn client() -> CompletionClient {
        CompletionClient::new(
            "test-key".to_string(),
            "mistralai/Mistral-7B-Instruct-v0.2".to_string(),
        )
    }

    #[test]
    fn request_carries_fixed_generation_parameters() {
        let messages = vec![PromptMessage {
            role: Role::User,
            content: "help".to_string(),
        }];
        let request = client().build_request(&messages);

        assert_eq!(request["model"], "mistralai/Mistral-7B-Instruct-v0.2");
        assert_eq!(request["temperature"], 0.3);
        assert_eq!(request["max_tokens"], 1024);
        assert_eq!(request["top_p"], 0.8);
        assert_eq!(request["frequency_penalty"], 0.5);
        assert_eq!(request["presence_penalty"], 0.1);
        assert_eq!(request["messages"][0]["role"], "user");
        assert_eq!(request["messages"][0]["content"], "help");
    }

    #[test]
    fn parse_reply_extracts_first_choice() {
        let response = serde_json::json!({
            "choices": [{"message": {"content": "Check for null before dereferencing."}}]
        });
        let reply = parse_reply(&response);
        assert_eq!(
            reply.content.as_deref(),
            Some("Check for null before dereferencing.")
        );
    }

    #[test]
    fn parse_reply_tolerates_missing_content() {
        let empty_choices = serde_json::json!({"choices": []});
        assert!(parse_reply(&empty_choices).content.is_none());

        let no_text = serde_json::json!({"choices": [{"message": {}}]});
        assert!(parse_reply(&no_text).content.is_none());

        let wrong_type = serde_json::json!({"choices": [{"message": {"content": 42}}]});
        assert!(parse_reply(&wrong_type).content.is_none());
    }

    mod end_to_end {
        use super::*;
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        const OK_BODY: &str = r#"{"choices":[{"message":{"content":"retry worked"}}]}"#;

        /// Minimal HTTP stub on a loopback port, answering with one
        /// scripted `(status, body)` per request and counting requests.
        /// Responses carry `connection: close` so every attempt is a
        /// fresh connection.
        async fn spawn_stub(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let calls = Arc::new(AtomicUsize::new(0));

            let counter = calls.clone();
            tokio::spawn(async move {
                let mut responses = responses.into_iter();
                loop {
                    let Ok((mut socket, _)) = listener.accept().await else {
                        break;
                    };
                    counter.fetch_add(1, Ordering::SeqCst);

                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;

                    let (status, body) = responses.next().unwrap_or((500, ""));
                    let reason = if status == 200 { "OK" } else { "Error" };
                    let response = format!(
                        "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                }
            });

            (format!("http://{addr}"), calls)
        }

        fn user_prompt() -> Vec<PromptMessage> {
            vec![PromptMessage {
                role: Role::User,
                content: "fix this null pointer".to_string(),
            }]
        }

        #[tokio::test]
        async fn complete_succeeds_on_the_third_attempt() {
            let (base_url, calls) = spawn_stub(vec![(500, ""), (502, ""), (200, OK_BODY)]).await;
            let client = client().with_base_url(base_url);

            let reply = client.complete(&user_prompt()).await.unwrap();

            assert_eq!(reply.content.as_deref(), Some("retry worked"));
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn complete_gives_up_after_three_attempts() {
            let (base_url, calls) = spawn_stub(vec![(500, ""), (500, ""), (500, "")]).await;
            let client = client().with_base_url(base_url);

            let result = client.complete(&user_prompt()).await;

            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn unparseable_body_counts_as_a_failed_attempt() {
            let (base_url, calls) =
                spawn_stub(vec![(200, "this is not json"), (200, OK_BODY)]).await;
            let client = client().with_base_url(base_url);

            let reply = client.complete(&user_prompt()).await.unwrap();

            assert_eq!(reply.content.as_deref(), Some("retry worked"));
            assert_eq!(calls.load(Ordering::SeqCst), 2);
        }
    }
}
