use crate::domain::{status::SUCCESS_STATUS, DashboardResponse, PlatformStatus};

use super::client::FetchError;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred while fetching data";
const UNKNOWN_ERROR: &str = "Unknown error";
const MISSING_DATA: &str = "response did not include platform data";

/// What a single poll produced, after classification.
#[derive(Debug)]
pub enum PollOutcome {
    Success(Vec<PlatformStatus>),
    /// The server answered but reported a failure; carries the server's message.
    Failure(String),
    Transport(FetchError),
}

impl PollOutcome {
    pub fn classify(result: Result<DashboardResponse, FetchError>) -> Self {
        match result {
            Ok(response) if response.status == SUCCESS_STATUS => match response.data {
                Some(data) => PollOutcome::Success(data),
                None => PollOutcome::Failure(MISSING_DATA.to_string()),
            },
            Ok(response) => PollOutcome::Failure(
                response
                    .message
                    .filter(|msg| !msg.is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ),
            Err(err) => PollOutcome::Transport(err),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PollOutcome::Success(_) => "success",
            PollOutcome::Failure(_) => "failure",
            PollOutcome::Transport(_) => "transport",
        }
    }
}

pub fn failure_text(message: &str) -> String {
    format!("Failed to load data: {message}")
}
