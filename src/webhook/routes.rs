//! HTTP surface: the fulfillment endpoint plus health and banner routes.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::FutureExt;
use tower_http::cors::CorsLayer;
use tracing::Instrument;
use uuid::Uuid;

use super::router::IntentRouter;
use super::types::{WebhookRequest, WebhookResponse};
use crate::error::WebhookError;

pub const UNAVAILABLE_REPLY: &str =
    "Sorry, the donation service is temporarily unavailable. Please try again later.";

/// Shared state for webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub router: Arc<IntentRouter>,
}

/// Build the service routes.
pub fn webhook_routes(router: Arc<IntentRouter>) -> Router {
    let state = WebhookState { router };

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/webhook", post(fulfill))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Roti Bank fulfillment webhook",
        "status": "running",
        "webhook": "/webhook",
    }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "roti-bank"
    }))
}

/// POST /webhook
///
/// Always answers with a fulfillment payload. A body that does not parse,
/// or a handler that panics, yields the "temporarily unavailable" reply.
async fn fulfill(
    State(state): State<WebhookState>,
    body: Result<Json<WebhookRequest>, JsonRejection>,
) -> Json<WebhookResponse> {
    let span = tracing::info_span!("webhook", request_id = %Uuid::new_v4());

    async move {
        let request = match body {
            Ok(Json(request)) => request,
            Err(rejection) => {
                let err = WebhookError::InvalidRequest(rejection.body_text());
                tracing::warn!(error = %err, "Rejected fulfillment request");
                return Json(WebhookResponse::text(UNAVAILABLE_REPLY));
            }
        };

        let reply = match AssertUnwindSafe(state.router.dispatch(&request))
            .catch_unwind()
            .await
        {
            Ok(reply) => reply,
            Err(_) => {
                tracing::error!(intent = request.intent_name(), "Intent handler panicked");
                UNAVAILABLE_REPLY.to_string()
            }
        };

        Json(WebhookResponse::text(reply))
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::channels::{EmailSender, MessagingSender, SANDBOX_SENDER};
    use crate::donation::{DonationNotifier, DonationPolicy, NotifierSettings, ValidationPolicy};
    use crate::error::NotifyError;

    struct PanickingEmail;

    #[async_trait]
    impl EmailSender for PanickingEmail {
        async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), NotifyError> {
            panic!("transport exploded");
        }
    }

    struct OkMessaging;

    #[async_trait]
    impl MessagingSender for OkMessaging {
        fn sender_id(&self) -> &str {
            SANDBOX_SENDER
        }

        async fn send(&self, _to: &str, _body: &str) -> Result<String, NotifyError> {
            Ok("SM1".into())
        }
    }

    fn app() -> Router {
        let notifier = DonationNotifier::new(
            Arc::new(PanickingEmail),
            Arc::new(OkMessaging),
            NotifierSettings {
                org_name: "Saylani Roti Bank".into(),
                sandbox_join_code: None,
            },
            DonationPolicy {
                validation: ValidationPolicy::Lenient,
                ..DonationPolicy::default()
            },
        );
        webhook_routes(Arc::new(IntentRouter::new(
            "Saylani Roti Bank",
            Arc::new(notifier),
        )))
    }

    async fn post_webhook(body: &str) -> (StatusCode, WebhookResponse) {
        let response = app()
            .oneshot(
                Request::post("/webhook")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn static_intent_round_trip() {
        let (status, reply) = post_webhook(
            r#"{"queryResult":{"intent":{"displayName":"Meal Timings"},"parameters":{}}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(reply.fulfillment_text.starts_with("Meals are served daily"));
        assert_eq!(reply.fulfillment_messages[0].text.text[0], reply.fulfillment_text);
    }

    #[tokio::test]
    async fn malformed_body_still_gets_a_reply() {
        let (status, reply) = post_webhook("{not json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply.fulfillment_text, UNAVAILABLE_REPLY);
    }

    #[tokio::test]
    async fn panicking_handler_gets_unavailable_reply() {
        let (status, reply) = post_webhook(
            r#"{"queryResult":{"intent":{"displayName":"Donate"},"parameters":{}}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply.fulfillment_text, UNAVAILABLE_REPLY);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
