//! Fulfillment webhook wire format (Dialogflow ES v2).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body POSTed by the NLU platform for each matched turn.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub response_id: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub query_result: QueryResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub query_text: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub intent: Option<IntentRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    #[serde(default)]
    pub display_name: String,
}

impl WebhookRequest {
    /// Display name of the matched intent, empty when absent.
    pub fn intent_name(&self) -> &str {
        self.query_result
            .intent
            .as_ref()
            .map(|i| i.display_name.as_str())
            .unwrap_or_default()
    }

    pub fn parameters(&self) -> &Map<String, Value> {
        &self.query_result.parameters
    }
}

/// Reply carrying the fulfillment text back to the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
    pub fulfillment_messages: Vec<FulfillmentMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentMessage {
    pub text: TextMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessage {
    pub text: Vec<String>,
}

impl WebhookResponse {
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            fulfillment_messages: vec![FulfillmentMessage {
                text: TextMessage {
                    text: vec![text.clone()],
                },
            }],
            fulfillment_text: text,
        }
    }
}
