use serde::{Deserialize, Serialize};

use super::{http_client, ProviderError};
use crate::config::GptSettings;

/// Client for the GPT forwarding service.
///
/// The service receives the prompt, a model selector and an optional proxy hint, and answers
/// with the model text either as a raw body or wrapped as `{"response": "..."}`.
#[derive(Debug, Clone)]
pub struct GptClient {
    settings: GptSettings,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ForwardRequest<'a> {
    message: &'a str,
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy: Option<&'a str>,
}

#[derive(Deserialize)]
struct ForwardResponse {
    response: String,
}

impl GptClient {
    pub fn new(settings: GptSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            settings,
            client: http_client()?,
        })
    }

    pub fn model(&self) -> &str {
        self.settings.model()
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = ForwardRequest {
            message: prompt,
            model: self.settings.model(),
            proxy: self.settings.proxy(),
        };

        let response = self
            .client
            .post(self.settings.server_url())
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::Transport)?;

        let status = response.status();
        let text = response.text().await.map_err(ProviderError::Transport)?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let text = unwrap_forwarded(text);
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}

fn unwrap_forwarded(body: String) -> String {
    match serde_json::from_str::<ForwardResponse>(&body) {
        Ok(wrapped) => wrapped.response,
        Err(_) => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_response_envelope() {
        let body = r#"{"response": "[]", "model": "gpt-4o-mini"}"#.to_string();
        assert_eq!(unwrap_forwarded(body), "[]");
    }

    #[test]
    fn keeps_raw_body() {
        let body = "```json\n[]\n```".to_string();
        assert_eq!(unwrap_forwarded(body.clone()), body);

        let array = r#"[{"disease": null}]"#.to_string();
        assert_eq!(unwrap_forwarded(array.clone()), array);
    }

    #[test]
    fn proxy_is_omitted_when_unset() {
        let body = ForwardRequest {
            message: "hi",
            model: "gpt-4o-mini",
            proxy: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("proxy").is_none());
        assert_eq!(json["model"], "gpt-4o-mini");
    }
}
