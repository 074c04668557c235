use serde::Serialize;
use serde_json::Value;

// --- Request types ---

#[derive(Debug, Serialize)]
pub struct GroqRequest {
    pub model: String,
    pub messages: Vec<GroqMessage>,
}

#[derive(Debug, Serialize)]
pub struct GroqMessage {
    pub role: String,
    pub content: String,
}

// --- Response types ---
//
// The reply is walked as a loose JSON value: a missing key or a value of the
// wrong type at any level means "no content", not a failure.

pub fn first_content(response: &Value) -> Option<&str> {
    response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
}
