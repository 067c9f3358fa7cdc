pub mod input;
pub mod poller;
pub mod refresh;
