//! Server-computed sales analytics, deserialized as-is.
//!
//! The aggregation semantics (what "best month" or the trend message mean)
//! live entirely on the server; the client never recomputes any of this.

use serde::{Deserialize, Serialize};

/// Header figures for one uploaded dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SummaryTotals {
    #[serde(default)]
    pub total_rows: i64,
    #[serde(default)]
    pub total_sales: f64,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthSummary {
    #[serde(default)]
    pub best_month: String,
    #[serde(default)]
    pub avg_sales_by_month: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductSummary {
    #[serde(default)]
    pub highest_selling_product: String,
    #[serde(default)]
    pub best_selling_quantity: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalesFigures {
    #[serde(default)]
    pub highest_sale_recorded: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrendSummary {
    #[serde(default)]
    pub summary_message: Option<String>,
}

/// Full summary returned by `/upload/` and the summary endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalesSummary {
    #[serde(default)]
    pub summary: SummaryTotals,
    #[serde(default)]
    pub summary_month: MonthSummary,
    #[serde(default)]
    pub summary_products: ProductSummary,
    #[serde(default)]
    pub summary_sales: SalesFigures,
    #[serde(default)]
    pub summary_trends: TrendSummary,
}

/// Aggregates plus chart series from `GET api/dashboard/stats/`.
///
/// The x/y pairs feed the month, product and cumulative charts; the
/// client treats them as opaque parallel arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_sales: f64,
    #[serde(default)]
    pub best_selling_product: Option<String>,
    #[serde(default)]
    pub avg_sales_by_month: f64,
    #[serde(default)]
    pub sales_by_month_x: Vec<String>,
    #[serde(default)]
    pub sales_by_month_y: Vec<f64>,
    #[serde(default)]
    pub product_sales_x: Vec<String>,
    #[serde(default)]
    pub product_sales_y: Vec<f64>,
    #[serde(default)]
    pub total_sales_x: Vec<String>,
    #[serde(default)]
    pub total_sales_y: Vec<f64>,
}

impl DashboardStats {
    /// True when the service has nothing to chart yet.
    pub fn is_empty(&self) -> bool {
        self.sales_by_month_x.is_empty()
            && self.product_sales_x.is_empty()
            && self.total_sales_x.is_empty()
    }
}
