pub mod env;
mod loader;

pub use env::{ApiConfig, AppConfig, DirectoryConfig};
pub use loader::load_config;
