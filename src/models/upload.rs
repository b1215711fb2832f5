use serde::{Deserialize, Serialize};

use crate::models::SalesSummary;

/// Local history row for a completed upload.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UploadRecord {
    pub id: String,
    pub filename: String,
    pub size_bytes: i64,
    pub total_rows: i64,
    pub total_sales: f64,
    pub uploaded_at: i64,
}

impl UploadRecord {
    pub fn new(filename: &str, size_bytes: i64, summary: &SalesSummary) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            size_bytes,
            total_rows: summary.summary.total_rows,
            total_sales: summary.summary.total_sales,
            uploaded_at: chrono::Utc::now().timestamp(),
        }
    }
}
