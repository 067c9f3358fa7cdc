pub mod client;
pub mod response;

pub use client::{StatusClient, StatusSource};
pub use response::PollOutcome;
