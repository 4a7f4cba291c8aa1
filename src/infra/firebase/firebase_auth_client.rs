// Firebase Authentication (Identity Toolkit) client.
//
// Only the sign-up endpoint is used, and only with an empty body: a valid
// web API key gets a 400 `MISSING_EMAIL`, an invalid one gets
// `API_KEY_INVALID`. Nothing is ever created.

use reqwest::Client;

use crate::config::FirebaseSettings;
use crate::core::harness::CheckError;
use crate::infra::google_api::{self, ApiReply};

pub struct FirebaseAuthClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl FirebaseAuthClient {
    pub fn new(settings: &FirebaseSettings) -> Result<Self, CheckError> {
        Ok(Self {
            client: google_api::build_client(settings.timeout)?,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
        })
    }

    /// POSTs `{}` to `accounts:signUp`.
    pub async fn empty_sign_up(&self) -> Result<ApiReply<serde_json::Value>, CheckError> {
        let key = google_api::require_key(self.api_key.as_deref(), "FIREBASE_API_KEY")?;
        let url = google_api::endpoint(&self.base_url, &["v1", "accounts:signUp"])?;

        let response = self
            .client
            .post(url)
            .query(&[("key", key)])
            .json(&serde_json::json!({}))
            .send()
            .await?;

        google_api::read_reply(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::time::Duration;

    fn client(base_url: &str) -> FirebaseAuthClient {
        FirebaseAuthClient::new(&FirebaseSettings {
            api_key: Some("fb-key".to_string()),
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn sends_empty_object_with_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/accounts:signUp")
            .match_query(Matcher::UrlEncoded("key".into(), "fb-key".into()))
            .match_body(Matcher::Json(serde_json::json!({})))
            .with_status(400)
            .with_body(r#"{"error":{"code":400,"message":"MISSING_EMAIL"}}"#)
            .create_async()
            .await;

        let reply = client(&server.url()).empty_sign_up().await.unwrap();

        mock.assert_async().await;
        match reply {
            ApiReply::Failure(failure) => {
                assert_eq!(failure.status, 400);
                assert!(failure.error_mentions("MISSING_EMAIL"));
            }
            ApiReply::Success(body) => panic!("unexpected success {}", body),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // Port 1 is reserved and nothing listens there.
        let result = client("http://127.0.0.1:1").empty_sign_up().await;
        assert!(matches!(result, Err(CheckError::Transport(_))));
    }

    #[tokio::test]
    async fn transport_errors_do_not_expose_the_key() {
        let client = FirebaseAuthClient::new(&FirebaseSettings {
            api_key: Some("SECRET-KEY-123".to_string()),
            base_url: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        let err = client.empty_sign_up().await.unwrap_err();
        assert!(!err.to_string().contains("SECRET-KEY-123"));

        let reason: crate::core::harness::FailureReason = err.into();
        let rendered = reason.to_string();
        assert!(rendered.starts_with("transport error"));
        assert!(!rendered.contains("SECRET-KEY-123"));
        assert!(!rendered.contains("key="));
    }
}
