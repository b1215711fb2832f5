use std::sync::OnceLock;

use regex::Regex;

use crate::api::{ApiClient, ApiError};
use crate::models::{Profile, ProfileUpdate};
use crate::views::{LifetimeHandle, Outcome};

fn mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Digits with optional separators, e.g. "555-1234" or "+1 555 123 4567".
    PATTERN.get_or_init(|| {
        Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").expect("valid mobile regex")
    })
}

/// Account settings form: the loaded profile plus a partial draft.
#[derive(Debug, Default)]
pub struct SettingsView {
    pub profile: Option<Profile>,
    pub draft: ProfileUpdate,
    pub error: Option<String>,
    pub success: Option<String>,
    in_flight: bool,
}

impl SettingsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Fetch the profile for display.
    pub async fn load(&mut self, api: &ApiClient, lifetime: &mut LifetimeHandle) -> Outcome {
        if self.in_flight {
            return Outcome::Ignored;
        }
        self.error = None;

        self.in_flight = true;
        let result = lifetime.scope(api.get_profile()).await;
        self.in_flight = false;

        match result {
            Ok(profile) => {
                self.profile = Some(profile);
                Outcome::Stay
            }
            Err(ApiError::Cancelled) => Outcome::Stay,
            Err(e) => {
                self.error = Some(e.user_message());
                Outcome::Stay
            }
        }
    }

    /// Send only the fields the user changed.
    pub async fn submit(&mut self, api: &ApiClient, lifetime: &mut LifetimeHandle) -> Outcome {
        if self.in_flight {
            return Outcome::Ignored;
        }
        self.error = None;
        self.success = None;

        if self.draft.is_empty() {
            self.error = Some("No changes to save".to_string());
            return Outcome::Stay;
        }
        if let Some(mobile) = &self.draft.mobile_number {
            if !mobile_pattern().is_match(mobile.trim()) {
                self.error = Some("Enter a valid mobile number".to_string());
                return Outcome::Stay;
            }
        }

        self.in_flight = true;
        let result = lifetime.scope(api.update_profile(&self.draft)).await;
        self.in_flight = false;

        match result {
            Ok(profile) => {
                self.profile = Some(profile);
                self.draft = ProfileUpdate::default();
                self.success = Some("Profile updated successfully!".to_string());
                Outcome::Stay
            }
            Err(ApiError::Cancelled) => Outcome::Stay,
            Err(e) => {
                self.error = Some(e.user_message());
                Outcome::Stay
            }
        }
    }
}
