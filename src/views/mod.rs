//! Form view models.
//!
//! Every form follows the same shape: draft fields, an inline error
//! string, and an in-flight flag that makes a second submit a no-op while
//! the first call is still outstanding (the UI analog is a disabled
//! submit button). Rendering is not this crate's concern; the CLI and
//! any future UI shell drive these.

pub mod home;
pub mod login;
pub mod register;
pub mod settings;
pub mod upload;

pub use home::{HomeView, NO_DATA_MESSAGE};
pub use login::LoginView;
pub use register::RegisterView;
pub use settings::SettingsView;
pub use upload::{SelectedFile, UploadView};

use std::future::Future;

use tokio::sync::watch;

use crate::api::ApiError;
use crate::routes::Route;

/// What a view does after a submit completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Navigate to another view.
    Navigate(Route),
    /// Stay on the view; error or success state was recorded inline.
    Stay,
    /// Submission ignored because another call is already in flight.
    Ignored,
}

/// Cancellation scope tying requests to a view's lifetime.
///
/// A response that arrives after the view unmounted must not be applied.
/// Calls are raced against the unmount signal and resolve to
/// [`ApiError::Cancelled`] when the view goes away first.
pub struct ViewLifetime {
    unmounted: watch::Sender<bool>,
}

impl ViewLifetime {
    pub fn new() -> Self {
        let (unmounted, _) = watch::channel(false);
        Self { unmounted }
    }

    pub fn handle(&self) -> LifetimeHandle {
        LifetimeHandle {
            unmounted: self.unmounted.subscribe(),
        }
    }

    /// Mark the view unmounted; scoped calls resolve to `Cancelled`.
    pub fn unmount(&self) {
        let _ = self.unmounted.send(true);
    }
}

impl Default for ViewLifetime {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LifetimeHandle {
    unmounted: watch::Receiver<bool>,
}

impl LifetimeHandle {
    /// Run a request future within this view's lifetime.
    pub async fn scope<T, F>(&mut self, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        tokio::select! {
            // Check the unmount signal first so an already-dead view never
            // applies a result.
            biased;
            _ = self.unmounted.wait_for(|u| *u) => Err(ApiError::Cancelled),
            res = fut => res,
        }
    }
}
