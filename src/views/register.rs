use std::sync::OnceLock;

use regex::Regex;

use crate::api::{ApiClient, ApiError};
use crate::routes::Route;
use crate::views::{LifetimeHandle, Outcome};

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

/// Sign-up form state.
#[derive(Debug, Default)]
pub struct RegisterView {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub error: Option<String>,
    in_flight: bool,
}

impl RegisterView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Local shape check; full validation stays server-side.
    fn validate(&self) -> Option<String> {
        if self.email.trim().is_empty()
            || self.username.trim().is_empty()
            || self.password.is_empty()
        {
            return Some("All fields are required".to_string());
        }
        if !email_pattern().is_match(self.email.trim()) {
            return Some("Enter a valid email address".to_string());
        }
        if self.password != self.confirm_password {
            return Some("Passwords do not match".to_string());
        }
        None
    }

    pub async fn submit(&mut self, api: &ApiClient, lifetime: &mut LifetimeHandle) -> Outcome {
        if self.in_flight {
            return Outcome::Ignored;
        }
        self.error = None;

        if let Some(message) = self.validate() {
            self.error = Some(message);
            return Outcome::Stay;
        }

        self.in_flight = true;
        let result = lifetime
            .scope(api.register(self.email.trim(), self.username.trim(), &self.password))
            .await;
        self.in_flight = false;

        match result {
            Ok(_) => Outcome::Navigate(Route::Home),
            Err(ApiError::Cancelled) => Outcome::Stay,
            Err(e) => {
                self.error = Some(e.user_message());
                Outcome::Stay
            }
        }
    }
}
