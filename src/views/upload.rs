use crate::api::{ApiClient, ApiError};
use crate::models::SalesSummary;
use crate::views::{LifetimeHandle, Outcome};

/// Client-side size hint only; the server enforces the real limit and
/// does all format validation.
pub const MAX_UPLOAD_HINT_BYTES: usize = 10 * 1024 * 1024;

/// File the user picked for upload.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Sales file upload form state.
#[derive(Debug, Default)]
pub struct UploadView {
    pub file: Option<SelectedFile>,
    /// Last successfully computed summary; a failed upload leaves it
    /// untouched.
    pub summary: Option<SalesSummary>,
    pub error: Option<String>,
    pub success: Option<String>,
    in_flight: bool,
}

impl UploadView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn select_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.file = Some(SelectedFile {
            name: name.into(),
            bytes,
        });
        self.error = None;
        self.success = None;
    }

    pub async fn submit(&mut self, api: &ApiClient, lifetime: &mut LifetimeHandle) -> Outcome {
        if self.in_flight {
            return Outcome::Ignored;
        }
        self.error = None;
        self.success = None;

        let Some(file) = &self.file else {
            self.error = Some("Please select a file to upload".to_string());
            return Outcome::Stay;
        };
        if file.bytes.len() > MAX_UPLOAD_HINT_BYTES {
            self.error = Some("File is too large to upload (limit 10 MB)".to_string());
            return Outcome::Stay;
        }

        let name = file.name.clone();
        let bytes = file.bytes.clone();

        self.in_flight = true;
        let result = lifetime.scope(api.upload_sales_file(&name, bytes)).await;
        self.in_flight = false;

        match result {
            Ok(summary) => {
                self.summary = Some(summary);
                self.success = Some("File uploaded and analyzed successfully!".to_string());
                Outcome::Stay
            }
            Err(ApiError::Cancelled) => Outcome::Stay,
            Err(e) => {
                self.error = Some(e.user_message());
                Outcome::Stay
            }
        }
    }

    /// In-flight gate used by `submit`; a second submission while one is
    /// outstanding must not issue a request.
    #[cfg(test)]
    fn set_in_flight(&mut self, value: bool) {
        self.in_flight = value;
    }
}
