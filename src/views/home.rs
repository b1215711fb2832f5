use crate::api::{ApiClient, ApiError};
use crate::models::DashboardStats;
use crate::views::{LifetimeHandle, Outcome};

/// Message shown while nothing has been uploaded yet.
pub const NO_DATA_MESSAGE: &str =
    "No data available. Please upload sales data to view analytics.";

/// Dashboard home: a read-only stats snapshot.
#[derive(Debug, Default)]
pub struct HomeView {
    pub stats: Option<DashboardStats>,
    pub error: Option<String>,
    in_flight: bool,
}

impl HomeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub async fn refresh(&mut self, api: &ApiClient, lifetime: &mut LifetimeHandle) -> Outcome {
        if self.in_flight {
            return Outcome::Ignored;
        }
        self.error = None;

        self.in_flight = true;
        let result = lifetime.scope(api.get_dashboard_stats()).await;
        self.in_flight = false;

        match result {
            Ok(stats) => {
                self.stats = Some(stats);
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
