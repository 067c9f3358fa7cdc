use serde::{Deserialize, Serialize};

pub const SUCCESS_STATUS: &str = "success";

/// One monitored platform as reported by `/api/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformStatus {
    pub platform: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub last_post: Option<String>,
    #[serde(default)]
    pub last_checked: Option<String>,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub check_count: u64,
    #[serde(default)]
    pub has_new_post: bool,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl PlatformStatus {
    pub fn error(&self) -> Option<&str> {
        self.error_message.as_deref().filter(|msg| !msg.is_empty())
    }

    pub fn last_post_text(&self) -> &str {
        self.last_post.as_deref().unwrap_or("")
    }

    pub fn row_status(&self) -> RowStatus {
        if self.error().is_some() {
            RowStatus::Error
        } else if self.check_count == 0 {
            RowStatus::Pending
        } else {
            RowStatus::Active
        }
    }

    pub fn rate_color(&self) -> RateColor {
        RateColor::for_rate(self.success_rate)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<PlatformStatus>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Error,
    Pending,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateColor {
    Green,
    Amber,
    Red,
}

impl RateColor {
    pub fn for_rate(rate: f64) -> Self {
        if rate >= 80.0 {
            RateColor::Green
        } else if rate >= 60.0 {
            RateColor::Amber
        } else {
            RateColor::Red
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            RateColor::Green => "#28a745",
            RateColor::Amber => "#ffc107",
            RateColor::Red => "#dc3545",
        }
    }
}
