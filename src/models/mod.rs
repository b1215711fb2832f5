pub mod profile;
pub mod summary;
pub mod upload;

pub use profile::{Profile, ProfileUpdate};
pub use summary::{DashboardStats, SalesSummary};
pub use upload::UploadRecord;
