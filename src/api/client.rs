//! Typed HTTP client for the DATUS service.
//!
//! One `reqwest::Client` behind a fixed base URL. Every outgoing call
//! attaches the stored session token as `Authorization: Token <token>`
//! when one is present. Calls are single-shot: no retry, no backoff.

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::{extract_message, ApiError, ErrorContext};
use crate::api::observer::{ObserverRegistry, SessionObserver};
use crate::models::{DashboardStats, Profile, ProfileUpdate, SalesSummary};
use crate::session::SessionStore;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
    observers: ObserverRegistry,
}

impl ApiClient {
    /// Build a client for the given service base URL.
    ///
    /// The session store is injected rather than looked up globally so
    /// tests can run against a scratch session.
    pub fn new(base_url: impl Into<String>, session: SessionStore, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to create HTTP client");

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            http,
            base_url,
            session,
            observers: ObserverRegistry::new(),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn register_observer(&self, observer: Arc<dyn SessionObserver>) {
        self.observers.register(observer).await;
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.endpoint(path));
        if let Some(token) = self.session.get().await {
            builder = builder.header("Authorization", format!("Token {}", token));
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        builder.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            ApiError::Network(e.to_string())
        })
    }

    /// Turn a non-2xx response into a classified [`ApiError`].
    ///
    /// A 401/403 on an authenticated call additionally notifies the
    /// registered session observers; that is the single place auth
    /// rejection is handled.
    async fn check(
        &self,
        response: Response,
        ctx: ErrorContext,
        fallback: &str,
    ) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body, fallback);
        tracing::warn!("API error: {} -> {}", status, message);

        let rejected_token = (status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN)
            && !matches!(ctx, ErrorContext::Login | ErrorContext::Register);
        if rejected_token {
            self.observers.notify_auth_rejected().await;
        }

        Err(ApiError::classify(status.as_u16(), message, ctx))
    }

    async fn parse<T: serde::de::DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Network(format!("Invalid response body: {}", e)))
    }

    /// Client-side precheck shared by the profile/dashboard calls: the
    /// original service rejects them anyway, so skip the round trip.
    async fn require_token(&self) -> Result<(), ApiError> {
        if self.session.get().await.is_none() {
            return Err(ApiError::Auth("No authentication token found".to_string()));
        }
        Ok(())
    }

    async fn store_token(&self, token: &str) -> Result<(), ApiError> {
        self.session
            .set(token)
            .await
            .map_err(|e| ApiError::Network(format!("Failed to persist session token: {}", e)))
    }

    /// `POST api/login/` — exchange credentials for a session token.
    ///
    /// The token is stored in the session on success, so the very next
    /// call already carries it.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        tracing::info!("Logging in as {}", username);
        let builder = self
            .request(Method::POST, "api/login/")
            .await
            .json(&json!({ "username": username, "password": password }));
        let response = self.send(builder).await?;
        let response = self
            .check(
                response,
                ErrorContext::Login,
                "Login failed. Please check your credentials.",
            )
            .await?;
        let body: TokenResponse = self.parse(response).await?;
        self.store_token(&body.token).await?;
        Ok(body.token)
    }

    /// `POST api/signup/` — create an account; stores the returned token.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        tracing::info!("Registering account {}", username);
        let builder = self
            .request(Method::POST, "api/signup/")
            .await
            .json(&json!({ "username": username, "email": email, "password": password }));
        let response = self.send(builder).await?;
        let response = self
            .check(
                response,
                ErrorContext::Register,
                "Registration failed. Please try again.",
            )
            .await?;
        let body: TokenResponse = self.parse(response).await?;
        self.store_token(&body.token).await?;
        Ok(body.token)
    }

    /// `GET api/data/` — generic data fetch; the shape is undocumented, so
    /// the raw JSON is returned.
    pub async fn get_data(&self) -> Result<serde_json::Value, ApiError> {
        let builder = self.request(Method::GET, "api/data/").await;
        let response = self.send(builder).await?;
        let response = self
            .check(response, ErrorContext::General, "Failed to fetch data.")
            .await?;
        self.parse(response).await
    }

    /// `POST /upload/` — submit a sales file as the multipart field `file`
    /// and receive the server-computed summary.
    pub async fn upload_sales_file(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<SalesSummary, ApiError> {
        tracing::info!("Uploading {} ({} bytes)", filename, bytes.len());
        let part = Part::bytes(bytes).file_name(filename.to_string());
        let form = Form::new().part("file", part);
        let builder = self.request(Method::POST, "upload/").await.multipart(form);
        let response = self.send(builder).await?;
        let response = self
            .check(
                response,
                ErrorContext::Upload,
                "Upload failed. Please try again.",
            )
            .await?;
        self.parse(response).await
    }

    /// `GET /get/summary/{id}/` — fetch one summary by identifier.
    pub async fn fetch_summary(&self, summary_id: &str) -> Result<SalesSummary, ApiError> {
        let path = format!("get/summary/{}/", summary_id);
        let builder = self.request(Method::GET, &path).await;
        let response = self.send(builder).await?;
        let response = self
            .check(response, ErrorContext::General, "Failed to fetch summary.")
            .await?;
        self.parse(response).await
    }

    /// `GET api/summary/` — latest summary for the session, or `None`
    /// when nothing has been uploaded yet.
    pub async fn get_summary(&self) -> Result<Option<SalesSummary>, ApiError> {
        let builder = self.request(Method::GET, "api/summary/").await;
        let response = self.send(builder).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = self
            .check(response, ErrorContext::General, "Failed to fetch summary.")
            .await?;
        Ok(Some(self.parse(response).await?))
    }

    /// `GET profile/` — fetch the account profile.
    ///
    /// Fails with `Auth` before any network I/O when no token is stored.
    pub async fn get_profile(&self) -> Result<Profile, ApiError> {
        self.require_token().await?;
        let builder = self.request(Method::GET, "profile/").await;
        let response = self.send(builder).await?;
        let response = self
            .check(response, ErrorContext::General, "Failed to fetch profile.")
            .await?;
        self.parse(response).await
    }

    /// `PATCH profile/update/` — partial update; only the fields present
    /// in the draft are transmitted, as multipart form data (the picture
    /// rides along as a file part).
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        self.require_token().await?;

        let mut form = Form::new();
        for (name, value) in update.text_fields() {
            form = form.text(name, value);
        }
        if let Some((filename, bytes)) = &update.profile_picture {
            let part = Part::bytes(bytes.clone()).file_name(filename.clone());
            form = form.part("profile_picture", part);
        }

        let builder = self
            .request(Method::PATCH, "profile/update/")
            .await
            .multipart(form);
        let response = self.send(builder).await?;
        let response = self
            .check(response, ErrorContext::General, "Profile update failed.")
            .await?;
        self.parse(response).await
    }

    /// `GET api/dashboard/stats/` — aggregate figures and chart series.
    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.require_token().await?;
        let builder = self.request(Method::GET, "api/dashboard/stats/").await;
        let response = self.send(builder).await?;
        let response = self
            .check(
                response,
                ErrorContext::General,
                "Failed to fetch dashboard stats.",
            )
            .await?;
        self.parse(response).await
    }
}
