// src/backend/http_client.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use crate::{
    backend::{BackendLogin, CrmBackend, RetryPolicy},
    common::error::AppError,
    models::{
        auth::UserPayload,
        lead::{LeadPage, LeadQuery},
    },
};

/// reqwest-backed client for the CRM REST API.
#[derive(Clone)]
pub struct HttpCrmBackend {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

// Some listings come wrapped in `{ "data": [...] }`, others as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Wrapped { data } => data,
            Listing::Bare(items) => items,
        }
    }
}

impl HttpCrmBackend {
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, AppError> {
        let url = self.url(path);
        let url = url.as_str();
        self.retry
            .run(|| async move {
                let response = self
                    .client
                    .get(url)
                    .bearer_auth(token)
                    .query(query)
                    .send()
                    .await?;
                handle_response(response).await
            })
            .await
    }
}

/// Maps backend statuses onto `AppError`: 401 is the session-expiry signal,
/// other failures keep the backend's own message.
async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(AppError::AuthenticationExpired);
    }
    if !status.is_success() {
        return Err(backend_error(response).await);
    }
    Ok(response.json::<T>().await?)
}

async fn backend_error(response: Response) -> AppError {
    let status = response.status();
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| {
            body.get("message")
                .or_else(|| body.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("HTTP error").to_string());

    AppError::Backend { status: status.as_u16(), message }
}

#[async_trait]
impl CrmBackend for HttpCrmBackend {
    async fn login(&self, email: &str, password: &str) -> Result<BackendLogin, AppError> {
        // Not retried: a failed credential exchange is answered immediately.
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => {
                Err(AppError::InvalidCredentials)
            }
            status if status.is_success() => Ok(response.json::<BackendLogin>().await?),
            _ => Err(backend_error(response).await),
        }
    }

    async fn logout(&self, token: &str) -> Result<(), AppError> {
        let response = self
            .client
            .post(self.url("/auth/logout"))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(backend_error(response).await)
        }
    }

    async fn current_user(&self, token: &str) -> Result<UserPayload, AppError> {
        self.get_json(token, "/auth/me", &[]).await
    }

    async fn list_leads(&self, token: &str, query: &LeadQuery) -> Result<LeadPage, AppError> {
        self.get_json(token, "/leads", &query.to_pairs()).await
    }

    async fn list_users(&self, token: &str) -> Result<Vec<UserPayload>, AppError> {
        let listing: Listing<UserPayload> = self.get_json(token, "/users", &[]).await?;
        Ok(listing.into_vec())
    }
}
