use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tarot_core::model::ProviderSettings;

use crate::error::ProviderError;
use crate::lesson::provider::LessonProvider;
use crate::lesson::request::GenerationRequest;

/// `LessonProvider` backed by the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    #[must_use]
    pub fn new(settings: &ProviderSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.base_url().to_string(),
            api_key: settings.api_key().unwrap_or_default().to_string(),
            model: settings.model().to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl LessonProvider for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let payload = build_payload(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = cap_body(response.text().await.unwrap_or_default());
            return Err(ProviderError::HttpStatus { status, body });
        }

        let body: GenerateContentResponse = response.json().await?;
        extract_text(body)
    }
}

fn build_payload(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part {
                text: &request.prompt,
            }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: request.system_instruction,
            }],
        },
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: &request.response_schema,
        },
    }
}

/// Largest error body kept in `ProviderError::HttpStatus`, in bytes.
const MAX_ERROR_BODY: usize = 2048;

/// Truncate an error body to `MAX_ERROR_BODY` on a char boundary.
fn cap_body(mut body: String) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body;
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body.truncate(end);
    body.push('…');
    body
}

/// Concatenate the text parts of the first candidate.
fn extract_text(body: GenerateContentResponse) -> Result<String, ProviderError> {
    let Some(candidate) = body.candidates.into_iter().next() else {
        return Err(match body.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => ProviderError::Blocked(reason),
            None => ProviderError::EmptyResponse,
        });
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(text)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tarot_core::model::{CardName, ProviderSettingsDraft};

    fn parse(body: Value) -> GenerateContentResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let body = parse(json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "{\"name\":" }, { "text": "\"El Mago\"}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }));
        assert_eq!(extract_text(body).unwrap(), "{\"name\":\"El Mago\"}");
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let body = parse(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
        assert!(matches!(extract_text(body), Err(ProviderError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn missing_text_is_empty_response() {
        let body = parse(json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] }));
        assert!(matches!(extract_text(body), Err(ProviderError::EmptyResponse)));
        let body = parse(json!({}));
        assert!(matches!(extract_text(body), Err(ProviderError::EmptyResponse)));
    }

    #[test]
    fn long_error_bodies_are_capped() {
        assert_eq!(cap_body("quota exceeded".into()), "quota exceeded");

        let page = "<html>".repeat(1000);
        let capped = cap_body(page);
        assert_eq!(capped.len(), MAX_ERROR_BODY + "…".len());
        assert!(capped.ends_with('…'));

        let accented = "ñ".repeat(MAX_ERROR_BODY);
        let capped = cap_body(accented);
        assert!(capped.len() <= MAX_ERROR_BODY + "…".len());
        assert!(capped.trim_end_matches('…').chars().all(|c| c == 'ñ'));
    }

    #[test]
    fn endpoint_uses_model_and_base_url() {
        let settings = ProviderSettingsDraft {
            api_key: Some("k".into()),
            base_url: Some("http://localhost:9000/v1beta/".into()),
            model: Some("gemini-test".into()),
            ..ProviderSettingsDraft::default()
        }
        .validate()
        .unwrap();
        let provider = GeminiProvider::new(&settings);
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn request_body_uses_camel_case_keys() {
        let request = GenerationRequest::for_card(&CardName::from("El Mago"));
        let payload = build_payload(&request);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(
            value["generationConfig"]["responseSchema"]["type"],
            "OBJECT"
        );
    }
}
