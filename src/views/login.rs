use crate::api::{ApiClient, ApiError};
use crate::routes::Route;
use crate::views::{LifetimeHandle, Outcome};

/// Sign-in form state.
#[derive(Debug, Default)]
pub struct LoginView {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
    pub error: Option<String>,
    in_flight: bool,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub async fn submit(&mut self, api: &ApiClient, lifetime: &mut LifetimeHandle) -> Outcome {
        if self.in_flight {
            return Outcome::Ignored;
        }
        self.error = None;

        if self.username.trim().is_empty() || self.password.is_empty() {
            self.error = Some("Username and password are required".to_string());
            return Outcome::Stay;
        }

        self.in_flight = true;
        let result = lifetime
            .scope(api.login(self.username.trim(), &self.password))
            .await;
        self.in_flight = false;

        match result {
            Ok(_) => {
                // The token persists either way; remember-me has no extra
                // client-side effect in the current service.
                tracing::debug!(remember_me = self.remember_me, "Login succeeded");
                Outcome::Navigate(Route::Home)
            }
            Err(ApiError::Cancelled) => Outcome::Stay,
            Err(e) => {
                self.error = Some(e.user_message());
                Outcome::Stay
            }
        }
    }
}
