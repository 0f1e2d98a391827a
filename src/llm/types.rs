use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Pull the generated text out of a chat response payload.
///
/// Accepts the OpenAI shape (`choices[0].message.content`, either a string or
/// an array of content parts), a bare object with a `content` field, or a bare
/// JSON string.
pub fn extract_message_content(payload: &Value) -> Option<String> {
    if let Some(text) = payload.as_str() {
        return Some(text.to_string());
    }

    let content = payload
        .pointer("/choices/0/message/content")
        .or_else(|| payload.get("content"))?;

    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let text: String = parts
                .iter()
                .filter_map(|part| match part {
                    Value::String(s) => Some(s.as_str()),
                    other => other.get("text").and_then(|t| t.as_str()),
                })
                .collect();
            Some(text)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_openai_string_content() {
        let payload = json!({"choices": [{"message": {"role": "assistant", "content": "weather"}}]});
        assert_eq!(extract_message_content(&payload).as_deref(), Some("weather"));
    }

    #[test]
    fn extracts_content_parts() {
        let payload = json!({"choices": [{"message": {"content": [
            {"type": "text", "text": "It is "},
            {"type": "text", "text": "sunny."}
        ]}}]});
        assert_eq!(extract_message_content(&payload).as_deref(), Some("It is sunny."));
    }

    #[test]
    fn extracts_top_level_content_and_plain_string() {
        assert_eq!(
            extract_message_content(&json!({"content": "rag"})).as_deref(),
            Some("rag")
        );
        assert_eq!(
            extract_message_content(&json!("plain text")).as_deref(),
            Some("plain text")
        );
    }

    #[test]
    fn missing_content_is_none() {
        assert!(extract_message_content(&json!({"choices": []})).is_none());
        assert!(extract_message_content(&json!({"content": 42})).is_none());
    }

    #[test]
    fn chat_request_skips_unset_options() {
        let request = ChatRequest::new("gpt-4o-mini", vec![ChatMessage::user("hi")]);
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("temperature").is_none());
        assert_eq!(body["messages"][0]["role"], "user");

        let body = serde_json::to_value(request.with_temperature(0.0)).unwrap();
        assert_eq!(body["temperature"], 0.0);
    }
}
